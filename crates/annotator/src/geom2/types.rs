//! Value types: `Point` and `Perimeter`.
//!
//! Field names follow the exported document shape (`{x, y}`, `{points, closed}`).

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// World-space point in image pixels (pre pan/zoom).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_vec(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (self.to_vec() - other.to_vec()).norm()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vector2<f64>> for Point {
    #[inline]
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Point> for Vector2<f64> {
    #[inline]
    fn from(p: Point) -> Self {
        p.to_vec()
    }
}

/// User-traced site boundary.
///
/// Invariant: acts as a polygon only when `closed && points.len() >= 3`
/// (see `is_polygon`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Perimeter {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub closed: bool,
}

impl Perimeter {
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Closed polygon from vertices.
    pub fn closed(points: Vec<Point>) -> Self {
        Self::new(points, true)
    }

    #[inline]
    pub fn is_polygon(&self) -> bool {
        self.closed && self.points.len() >= 3
    }

    pub fn contains(&self, p: Point) -> bool {
        super::point_in_polygon(p.x, p.y, &self.points, self.closed)
    }

    pub fn distance_to_boundary(&self, p: Point) -> Option<f64> {
        super::distance_to_boundary(p.x, p.y, &self.points, self.closed)
    }

    pub fn coverage_efficiency(&self, center: Point, radius_px: f64) -> f64 {
        super::coverage_efficiency(center, radius_px, &self.points, self.closed)
    }

    /// Iterate polygon edges, wrapping last→first.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}
