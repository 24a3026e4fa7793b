//! Plain document records. Field names match the exported JSON (camelCase).

use serde::{Deserialize, Serialize};

use crate::geom2::{Perimeter, Point};

/// Reference line of known length that fixes the pixel scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meters: Option<f64>,
}

impl ScaleLine {
    /// `meters / |end - start|`, or `None` unless both endpoints are set, `meters > 0`
    /// and the line has non-zero length.
    pub fn meters_per_pixel(&self) -> Option<f64> {
        let (start, end, meters) = (self.start?, self.end?, self.meters?);
        if !(meters.is_finite() && meters > 0.0) {
            return None;
        }
        let px = start.distance(end);
        if !px.is_finite() || px == 0.0 {
            return None;
        }
        Some(meters / px)
    }
}

/// Axis-aligned coverage zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub label: String,
    pub ceiling_height: f64,
    pub shelf_height: f64,
    /// Meters; derived from ceiling/shelf by the placement rules.
    pub coverage_radius: f64,
    pub show_coverage: bool,
    pub color_index: usize,
    /// Explicit antenna spacing (m) for the scored policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dist: Option<f64>,
}

impl Zone {
    pub fn contains(&self, p: Point) -> bool {
        crate::geom2::point_in_rect(
            p,
            Point::new(self.x, self.y),
            Point::new(self.x + self.w, self.y + self.h),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Antenna {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub label: String,
    /// Owning zone; `None` for manually placed antennas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<u32>,
}

impl Antenna {
    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Ad hoc distance annotation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub id: u32,
    pub start: Point,
    pub end: Point,
}

impl Measure {
    pub fn length_px(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Exported document shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    pub perimeter: Perimeter,
    pub scale: ScaleLine,
    pub zones: Vec<Zone>,
    pub antennas: Vec<Antenna>,
    pub measures: Vec<Measure>,
}
