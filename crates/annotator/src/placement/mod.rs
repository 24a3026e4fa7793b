//! Antenna auto-placement inside a zone.
//!
//! Purpose
//! - Turn a zone rectangle, the site perimeter and the pixel scale into a set of
//!   antenna positions. Two policies coexist and both stay supported, because
//!   exported documents were produced with either:
//!   - `PlacementPolicy::RuleGrid`: ceiling/shelf lookup, regular grid, wall and
//!     spacing rejection against every antenna already in the document.
//!   - `PlacementPolicy::ScoredCandidates`: regular grid, coverage-efficiency
//!     scoring, greedy spaced selection capped per run.
//!
//! Contract
//! - `plan_zone` is pure: it returns positions and never touches the document.
//!   `Document::populate_antennas_in_zone` clears the zone's antennas first, then
//!   hands the remaining antennas to `plan_zone`, so re-running is a replacement.
//! - Positions are world-space pixels; distances in `PlacementRules` are meters.

mod rules;
mod scored;

pub use rules::{coverage_radius_for, PlacementRules};

use serde::{Deserialize, Serialize};

use crate::document::{Antenna, Zone};
use crate::geom2::{Perimeter, Point};

/// Placement tuning constants.
///
/// `Default` reproduces the reference behavior; tests and the CLI may override.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannerCfg {
    /// Grid spacing as a fraction of the max antenna distance.
    pub grid_factor: f64,
    /// Rule grid: minimum wall clearance as a fraction of the smaller wall distance.
    pub wall_factor: f64,
    /// Rule grid: minimum antenna separation as a fraction of the smaller spacing.
    pub min_spacing_factor: f64,
    /// Scored: minimum wall clearance as a fraction of the coverage radius.
    pub boundary_factor: f64,
    /// Scored: candidates need strictly more coverage efficiency than this.
    pub efficiency_threshold: f64,
    pub efficiency_weight: f64,
    pub boundary_weight: f64,
    /// Scored: selected antennas keep at least this fraction of the spacing apart.
    pub selection_spacing_factor: f64,
    /// Scored: maximum antennas per run.
    pub max_selected: usize,
}

impl Default for PlannerCfg {
    fn default() -> Self {
        Self {
            grid_factor: 0.8,
            wall_factor: 0.5,
            min_spacing_factor: 0.7,
            boundary_factor: 0.7,
            efficiency_threshold: 0.7,
            efficiency_weight: 0.7,
            boundary_weight: 0.3,
            selection_spacing_factor: 0.8,
            max_selected: 25,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlacementPolicy {
    /// Ceiling/shelf rule table with incremental spacing checks.
    #[default]
    RuleGrid,
    /// Coverage-scored candidates with greedy spaced selection.
    ScoredCandidates,
}

impl PlacementPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RuleGrid => "rules",
            Self::ScoredCandidates => "scored",
        }
    }
}

impl std::str::FromStr for PlacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rules" | "rule-grid" => Ok(Self::RuleGrid),
            "scored" | "scored-candidates" => Ok(Self::ScoredCandidates),
            other => Err(format!("unknown placement policy `{other}` (rules|scored)")),
        }
    }
}

/// Plan antenna positions for `zone`.
///
/// `existing` are the antennas that stay in the document (the zone's own have
/// already been removed by the caller). Returns an empty plan for a non-positive
/// or non-finite scale.
pub fn plan_zone(
    policy: PlacementPolicy,
    zone: &Zone,
    perimeter: &Perimeter,
    meters_per_px: f64,
    existing: &[Antenna],
    cfg: &PlannerCfg,
) -> Vec<Point> {
    if !(meters_per_px.is_finite() && meters_per_px > 0.0) {
        return Vec::new();
    }
    match policy {
        PlacementPolicy::RuleGrid => rules::plan(zone, perimeter, meters_per_px, existing, cfg),
        PlacementPolicy::ScoredCandidates => scored::plan(zone, perimeter, meters_per_px, cfg),
    }
}

/// Upper bound on grid candidates for one zone; larger grids yield an empty plan.
pub const MAX_GRID_POINTS: usize = 250_000;

/// Regular grid over the zone rectangle, offset by half a step from the top-left
/// corner. Points are generated column by column (outer loop over x).
///
/// Coordinates come from the index (`x + step/2 + i*step`), so far-off zones and
/// tiny steps cannot stall; grids above `MAX_GRID_POINTS` come back empty.
fn zone_grid(zone: &Zone, step_x: f64, step_y: f64) -> Vec<Point> {
    let counts = (axis_count(zone.w, step_x), axis_count(zone.h, step_y));
    let (Some(cols), Some(rows)) = counts else {
        tracing::warn!(zone = zone.id, step_x, step_y, "unusable grid step");
        return Vec::new();
    };
    match cols.checked_mul(rows) {
        Some(n) if n <= MAX_GRID_POINTS => {}
        _ => {
            tracing::warn!(zone = zone.id, cols, rows, "grid too dense, skipping zone");
            return Vec::new();
        }
    }
    let mut out = Vec::with_capacity(cols * rows);
    for i in 0..cols {
        let x = zone.x + step_x / 2.0 + i as f64 * step_x;
        for j in 0..rows {
            out.push(Point::new(x, zone.y + step_y / 2.0 + j as f64 * step_y));
        }
    }
    out
}

/// Number of `step/2 + k*step` offsets below `extent`.
fn axis_count(extent: f64, step: f64) -> Option<usize> {
    if !(step.is_finite() && step > 0.0 && extent.is_finite()) {
        return None;
    }
    let n = ((extent - step / 2.0) / step).ceil();
    if !n.is_finite() || n > MAX_GRID_POINTS as f64 {
        return Some(MAX_GRID_POINTS + 1);
    }
    Some(n.max(0.0) as usize)
}

#[cfg(test)]
mod tests;
