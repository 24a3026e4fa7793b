//! Scored-candidate placement with greedy spaced selection.

use super::{zone_grid, PlacementRules, PlannerCfg};
use crate::document::Zone;
use crate::geom2::{Perimeter, Point};

/// Boundary distance used in the score when the perimeter is not a polygon.
pub const NO_BOUNDARY_DISTANCE: f64 = 1000.0;

#[derive(Clone, Copy, Debug)]
struct Candidate {
    at: Point,
    score: f64,
}

pub(super) fn plan(
    zone: &Zone,
    perimeter: &Perimeter,
    meters_per_px: f64,
    cfg: &PlannerCfg,
) -> Vec<Point> {
    // zones without an explicit max distance fall back to their rule class
    let max_dist = zone.max_dist.unwrap_or_else(|| {
        PlacementRules::for_heights(zone.ceiling_height, zone.shelf_height).max_distance()
    });
    let spacing_px = max_dist / meters_per_px;
    let radius_px = zone.coverage_radius / meters_per_px;
    if !(radius_px.is_finite() && radius_px > 0.0) {
        tracing::debug!(zone = zone.id, "zero coverage radius, nothing to score");
        return Vec::new();
    }

    let grid = zone_grid(zone, spacing_px, spacing_px);
    let total = grid.len();
    let mut candidates: Vec<Candidate> = grid
        .into_iter()
        .filter_map(|p| {
            if !perimeter.contains(p) {
                return None;
            }
            let boundary = perimeter.distance_to_boundary(p);
            if boundary.is_some_and(|d| d < cfg.boundary_factor * radius_px) {
                return None;
            }
            let efficiency = perimeter.coverage_efficiency(p, radius_px);
            if efficiency <= cfg.efficiency_threshold {
                return None;
            }
            let boundary = boundary.unwrap_or(NO_BOUNDARY_DISTANCE);
            let score =
                cfg.efficiency_weight * efficiency + cfg.boundary_weight * (boundary / radius_px);
            Some(Candidate { at: p, score })
        })
        .collect();
    tracing::debug!(zone = zone.id, total, kept = candidates.len(), "scored candidates");

    // stable: equal scores keep grid order
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let min_sep = cfg.selection_spacing_factor * spacing_px;
    let mut selected: Vec<Point> = Vec::new();
    for c in candidates {
        if selected.len() >= cfg.max_selected {
            break;
        }
        if selected.iter().all(|s| s.distance(c.at) >= min_sep) {
            selected.push(c.at);
        }
    }
    selected
}
