//! Criterion benchmarks for the placement hot paths.
//! - coverage efficiency (129 samples × edge count)
//! - both placement policies on seeded random perimeters
//!
//! Results land under target/criterion.

use annotator::geom2::rand::{draw_perimeter_radial, RadialCfg, ReplayToken};
use annotator::geom2::{coverage_efficiency, Point};
use annotator::placement::{coverage_radius_for, plan_zone, PlacementPolicy, PlannerCfg};
use annotator::prelude::Zone;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

const MPP: f64 = 0.05;

fn zone() -> Zone {
    Zone {
        id: 1,
        x: 100.0,
        y: 100.0,
        w: 800.0,
        h: 800.0,
        label: "Zone 1".into(),
        ceiling_height: 3.0,
        shelf_height: 2.1,
        coverage_radius: coverage_radius_for(3.0, 2.1),
        show_coverage: false,
        color_index: 0,
        max_dist: Some(5.0),
    }
}

fn bench_efficiency(c: &mut Criterion) {
    let mut group = c.benchmark_group("coverage_efficiency");
    for &n in &[4usize, 10, 40, 100] {
        let cfg = RadialCfg {
            vertices: n,
            ..RadialCfg::default()
        };
        let per = draw_perimeter_radial(cfg, ReplayToken { seed: 11, index: 0 });
        group.bench_with_input(BenchmarkId::new("vertices", n), &per, |b, per| {
            b.iter(|| coverage_efficiency(Point::new(480.0, 520.0), 150.0, &per.points, true))
        });
    }
    group.finish();
}

fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_zone");
    let z = zone();
    let cfg = PlannerCfg::default();
    for policy in [PlacementPolicy::RuleGrid, PlacementPolicy::ScoredCandidates] {
        group.bench_function(BenchmarkId::new(policy.name(), "radial-10"), |b| {
            b.iter_batched(
                || draw_perimeter_radial(RadialCfg::default(), ReplayToken { seed: 3, index: 1 }),
                |per| plan_zone(policy, &z, &per, MPP, &[], &cfg),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_efficiency, bench_policies);
criterion_main!(benches);
