//! Floor-plan annotation core: perimeter geometry, line snapping and antenna placement.
//!
//! Layout
//! - `geom2`: world-space points, the site perimeter and the pure predicates on it
//!   (ray casting, boundary distance, sampled coverage efficiency).
//! - `snap`: angle quantization for interactively drawn lines.
//! - `placement`: the two antenna placement policies behind `PlacementPolicy`.
//! - `document`: the session aggregate (zones, antennas, measures, scale) with
//!   id counters, cascade delete, change events and JSON import/export.
//! - `view`: screen↔world mapping under pan/zoom.
//!
//! All coordinates handed to the library are world-space pixels of the uploaded
//! image. Conversion to meters goes through `ScaleLine::meters_per_pixel`.

pub mod api;
pub mod document;
pub mod geom2;
pub mod placement;
pub mod snap;
pub mod view;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::document::{
        Antenna, Document, DocumentData, DocumentEvent, ImportError, Measure, ScaleLine, Zone,
    };
    pub use crate::geom2::{
        coverage_efficiency, distance_to_boundary, point_in_polygon, point_in_rect,
        point_to_segment_distance, Perimeter, Point,
    };
    pub use crate::placement::{PlacementPolicy, PlacementRules, PlannerCfg};
    pub use crate::snap::{GridSnapper, SnapResult, SnapSettings, SnapSettingsPatch, SnapType};
    pub use crate::view::{ViewLimits, Viewport};
}
