//! World-space 2D geometry on the site perimeter.
//!
//! Purpose
//! - Hold the `Point`/`Perimeter` value types shared by the document, planner and
//!   snapper, and the pure predicates the planner is built on.
//!
//! Conventions
//! - A perimeter only acts as a boundary when it is closed and has at least three
//!   points. Otherwise containment is vacuously true, boundary distance is `None`
//!   and coverage efficiency is 1.
//! - Edges are `(points[i], points[(i + 1) % n])`; no repair of self-intersecting
//!   input is attempted.
//! - Every function is total on finite input: degenerate edges fall back to point
//!   distance instead of dividing by zero.

mod polygon;
pub mod rand;
mod types;

pub use polygon::{
    coverage_efficiency, distance_to_boundary, point_in_polygon, point_in_rect,
    point_to_segment_distance, COVERAGE_RINGS, COVERAGE_SAMPLES_PER_RING,
};
pub use types::{Perimeter, Point};
