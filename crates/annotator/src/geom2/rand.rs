//! Seeded random site perimeters (star-shaped, radial jitter).
//!
//! Used by property tests and benchmarks to get irregular but simple polygons.
//! Vertex `k` sits at angle `k·Δ ± jitter·Δ` around `center`, with the jitter
//! clamped below Δ/2, so angles stay in order and the outline never
//! self-intersects.

use super::types::{Perimeter, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    /// Vertex count; values below 3 are raised to 3.
    pub vertices: usize,
    /// Angular jitter as a fraction of the base spacing 2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii are `base_radius * (1 + u)` with `u ∈ [-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    /// Mean distance from `center` to a vertex, in pixels.
    pub base_radius: f64,
    pub center: Point,
}

impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertices: 10,
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 400.0,
            center: Point::new(500.0, 500.0),
        }
    }
}

/// `(seed, index)` pair; the same token always draws the same perimeter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    fn rng(self) -> StdRng {
        // SplitMix64 finalizer
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        StdRng::seed_from_u64(mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15))))
    }
}

/// Draw a closed star-shaped perimeter.
pub fn draw_perimeter_radial(cfg: RadialCfg, tok: ReplayToken) -> Perimeter {
    let mut rng = tok.rng();
    let n = cfg.vertices.max(3);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.9);
    let r0 = cfg.base_radius.max(1.0);
    let delta = std::f64::consts::TAU / n as f64;
    let points = (0..n)
        .map(|k| {
            let th = k as f64 * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj) * r0;
            Point::new(cfg.center.x + r * th.cos(), cfg.center.y + r * th.sin())
        })
        .collect();
    Perimeter::closed(points)
}
