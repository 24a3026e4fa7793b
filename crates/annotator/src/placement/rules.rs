//! Rule-based grid placement (ceiling/shelf lookup).

use serde::{Deserialize, Serialize};

use super::{zone_grid, PlannerCfg};
use crate::document::{Antenna, Zone};
use crate::geom2::{Perimeter, Point};

/// Distance limits for one ceiling/shelf class, all in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRules {
    pub max_horizontal_distance: f64,
    pub max_vertical_distance: f64,
    pub max_horizontal_wall_distance: f64,
    pub max_vertical_wall_distance: f64,
    pub coverage_radius: f64,
}

impl PlacementRules {
    fn class(h: f64, v: f64, wall_h: f64, wall_v: f64) -> Self {
        let max_distance = h.max(v);
        Self {
            max_horizontal_distance: h,
            max_vertical_distance: v,
            max_horizontal_wall_distance: wall_h,
            max_vertical_wall_distance: wall_v,
            coverage_radius: (max_distance / 2.0) * 1.15,
        }
    }

    /// Rule lookup:
    /// - ceiling ≤ 3 and shelf ≤ 2.1 → 10/12 m, walls 5/6 m
    /// - ceiling ≥ 4 and shelf ≤ 2.1 → 12/14 m, walls 6/7 m
    /// - anything else → same as the low-ceiling class
    pub fn for_heights(ceiling_height: f64, shelf_height: f64) -> Self {
        if ceiling_height <= 3.0 && shelf_height <= 2.1 {
            Self::class(10.0, 12.0, 5.0, 6.0)
        } else if ceiling_height >= 4.0 && shelf_height <= 2.1 {
            Self::class(12.0, 14.0, 6.0, 7.0)
        } else {
            Self::class(10.0, 12.0, 5.0, 6.0)
        }
    }

    /// Larger of the horizontal and vertical antenna distances.
    pub fn max_distance(&self) -> f64 {
        self.max_horizontal_distance.max(self.max_vertical_distance)
    }

    pub fn min_wall_distance(&self) -> f64 {
        self.max_horizontal_wall_distance.min(self.max_vertical_wall_distance)
    }
}

/// Coverage radius (m) a zone gets for its ceiling/shelf parameters.
pub fn coverage_radius_for(ceiling_height: f64, shelf_height: f64) -> f64 {
    PlacementRules::for_heights(ceiling_height, shelf_height).coverage_radius
}

pub(super) fn plan(
    zone: &Zone,
    perimeter: &Perimeter,
    meters_per_px: f64,
    existing: &[Antenna],
    cfg: &PlannerCfg,
) -> Vec<Point> {
    let rules = PlacementRules::for_heights(zone.ceiling_height, zone.shelf_height);
    let spacing_x = rules.max_horizontal_distance * cfg.grid_factor / meters_per_px;
    let spacing_y = rules.max_vertical_distance * cfg.grid_factor / meters_per_px;
    let min_wall_px = rules.min_wall_distance() / meters_per_px * cfg.wall_factor;
    let min_sep_px = spacing_x.min(spacing_y) * cfg.min_spacing_factor;

    let grid = zone_grid(zone, spacing_x, spacing_y);
    tracing::debug!(
        zone = zone.id,
        candidates = grid.len(),
        spacing_x,
        spacing_y,
        "rule grid candidates"
    );

    // accepted points take part in later spacing checks of the same pass
    let mut occupied: Vec<Point> = existing.iter().map(Antenna::position).collect();
    let mut placed = Vec::new();
    for g in grid {
        let p = Point::new(g.x.round(), g.y.round());
        if !perimeter.contains(p) {
            continue;
        }
        if perimeter.distance_to_boundary(p).is_some_and(|d| d < min_wall_px) {
            continue;
        }
        if occupied.iter().any(|q| p.distance(*q) < min_sep_px) {
            continue;
        }
        occupied.push(p);
        placed.push(p);
    }
    placed
}
