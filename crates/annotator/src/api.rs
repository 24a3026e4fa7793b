//! Curated surface for front-ends (canvas layer, CLI, import/export wrappers).
//!
//! Important
//! - Everything here is a plain re-export; the owning modules stay authoritative.
//! - Front-ends call the pure predicates directly (e.g. to validate an antenna
//!   drag target) and go through `Document` for every mutation.

// Pure geometry on the perimeter
pub use crate::geom2::{
    coverage_efficiency, distance_to_boundary, point_in_polygon as is_point_in_perimeter,
    point_in_rect, point_to_segment_distance, Perimeter, Point,
};
// Interactive drawing helpers
pub use crate::snap::{GridSnapper, SnapResult, SnapSettings, SnapSettingsPatch, SnapType};
pub use crate::view::{ViewLimits, Viewport};
// Document and planner
pub use crate::document::{Document, DocumentData, DocumentEvent, ImportError};
pub use crate::placement::{plan_zone, PlacementPolicy, PlannerCfg};

/// Populate `zone_id` with the document's configured policy.
///
/// Returns the number of antennas placed, or `None` when the zone is unknown or
/// the scale is unset (both leave the document unchanged).
pub fn populate_antennas_in_zone(doc: &mut Document, zone_id: u32) -> Option<usize> {
    doc.populate_antennas_in_zone(zone_id)
}

/// Snap `end` relative to `start` under `settings` for live preview.
pub fn snap_line(settings: &SnapSettings, start: Point, end: Point) -> SnapResult {
    GridSnapper::new(*settings).snap_line(start, end)
}
