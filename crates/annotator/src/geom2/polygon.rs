//! Predicates on the perimeter polygon.
//!
//! - `point_in_polygon`: even-odd ray casting.
//! - `point_to_segment_distance`, `distance_to_boundary`: clamped projection.
//! - `coverage_efficiency`: deterministic ring/angle sampling of a disc.
//! - `point_in_rect`: containment in the rectangle spanned by two corners.

use nalgebra::Vector2;

use super::types::Point;

/// Number of non-degenerate sample rings in `coverage_efficiency`.
pub const COVERAGE_RINGS: usize = 8;
/// Angularly equal samples per non-degenerate ring.
pub const COVERAGE_SAMPLES_PER_RING: usize = 16;

#[inline]
fn has_boundary(points: &[Point], closed: bool) -> bool {
    closed && points.len() >= 3
}

/// Ray-casting parity test of `(x, y)` against the polygon `points`.
///
/// Returns `true` whenever there is no boundary (open or fewer than 3 points).
/// Points exactly on an edge get whatever the crossing rule yields; the result
/// is deterministic for a given input.
pub fn point_in_polygon(x: f64, y: f64, points: &[Point], closed: bool) -> bool {
    if !has_boundary(points, closed) {
        return true;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (pi, pj) = (points[i], points[j]);
        // straddle test guarantees pj.y != pi.y, so the division is safe
        if (pi.y > y) != (pj.y > y) && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Euclidean distance from `p` to the closed segment `a–b`.
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (p, a, b): (Vector2<f64>, Vector2<f64>, Vector2<f64>) = (p.into(), a.into(), b.into());
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Minimum distance from `(x, y)` to any polygon edge, or `None` without a boundary.
pub fn distance_to_boundary(x: f64, y: f64, points: &[Point], closed: bool) -> Option<f64> {
    if !has_boundary(points, closed) {
        return None;
    }
    let p = Point::new(x, y);
    let n = points.len();
    let d = (0..n)
        .map(|i| point_to_segment_distance(p, points[i], points[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min);
    Some(d)
}

/// Sampled fraction of the disc `(center, radius_px)` that lies inside the polygon.
///
/// Ring `k` of `COVERAGE_RINGS` has radius `k / COVERAGE_RINGS * radius_px`; ring 0
/// is the center and contributes one sample, every other ring contributes
/// `COVERAGE_SAMPLES_PER_RING`. Returns 1.0 without a boundary.
pub fn coverage_efficiency(center: Point, radius_px: f64, points: &[Point], closed: bool) -> f64 {
    if !has_boundary(points, closed) {
        return 1.0;
    }
    let mut inside = 0usize;
    let mut total = 0usize;
    for ring in 0..=COVERAGE_RINGS {
        let r = (ring as f64 / COVERAGE_RINGS as f64) * radius_px;
        let samples = if ring == 0 { 1 } else { COVERAGE_SAMPLES_PER_RING };
        for i in 0..samples {
            let angle = (i as f64 / samples as f64) * std::f64::consts::TAU;
            let x = center.x + r * angle.cos();
            let y = center.y + r * angle.sin();
            total += 1;
            if point_in_polygon(x, y, points, closed) {
                inside += 1;
            }
        }
    }
    inside as f64 / total as f64
}

/// True iff `p` lies in the axis-aligned rectangle spanned by corners `a` and `b`
/// (boundary included, corner order irrelevant).
pub fn point_in_rect(p: Point, a: Point, b: Point) -> bool {
    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
    p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
}
