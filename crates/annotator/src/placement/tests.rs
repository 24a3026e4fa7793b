use super::*;
use crate::geom2::rand::{draw_perimeter_radial, RadialCfg, ReplayToken};
use proptest::prelude::*;

const MPP: f64 = 0.1;

fn zone(x: f64, y: f64, w: f64, h: f64) -> Zone {
    Zone {
        id: 1,
        x,
        y,
        w,
        h,
        label: "Zone 1".into(),
        ceiling_height: 3.0,
        shelf_height: 2.1,
        coverage_radius: coverage_radius_for(3.0, 2.1),
        show_coverage: false,
        color_index: 0,
        max_dist: None,
    }
}

fn square(side: f64) -> Perimeter {
    Perimeter::closed(vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, side),
        Point::new(side, side),
        Point::new(side, 0.0),
    ])
}

fn l_shape() -> Perimeter {
    Perimeter::closed(vec![
        Point::new(0.0, 0.0),
        Point::new(1000.0, 0.0),
        Point::new(1000.0, 400.0),
        Point::new(400.0, 400.0),
        Point::new(400.0, 1000.0),
        Point::new(0.0, 1000.0),
    ])
}

fn antenna(id: u32, x: f64, y: f64) -> Antenna {
    Antenna {
        id,
        x,
        y,
        label: format!("A{id}"),
        zone_id: Some(99),
    }
}

fn min_pairwise(points: &[Point]) -> f64 {
    let mut best = f64::INFINITY;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            best = best.min(a.distance(*b));
        }
    }
    best
}

#[test]
fn rule_table() {
    let low = PlacementRules::for_heights(3.0, 2.1);
    assert_eq!(low.max_horizontal_distance, 10.0);
    assert_eq!(low.max_vertical_distance, 12.0);
    assert_eq!(low.max_horizontal_wall_distance, 5.0);
    assert_eq!(low.max_vertical_wall_distance, 6.0);
    assert!((low.coverage_radius - 6.9).abs() < 1e-12);

    let high = PlacementRules::for_heights(4.0, 2.1);
    assert_eq!(high.max_horizontal_distance, 12.0);
    assert_eq!(high.max_vertical_distance, 14.0);
    assert_eq!(high.min_wall_distance(), 6.0);
    assert!((high.coverage_radius - 8.05).abs() < 1e-12);

    // gap between 3 and 4 m, and tall shelves, fall back to the low class
    assert_eq!(PlacementRules::for_heights(3.5, 2.0), low);
    assert_eq!(PlacementRules::for_heights(5.0, 3.0), low);
    assert_eq!(coverage_radius_for(6.0, 1.0), high.coverage_radius);
}

#[test]
fn rule_grid_on_open_perimeter_fills_zone() {
    let z = zone(100.0, 100.0, 600.0, 500.0);
    let plan = plan_zone(
        PlacementPolicy::RuleGrid,
        &z,
        &Perimeter::default(),
        MPP,
        &[],
        &PlannerCfg::default(),
    );
    // 80 px × 96 px grid: 7 columns × 5 rows
    assert_eq!(plan.len(), 35);
    assert_eq!(plan[0], Point::new(140.0, 148.0));
    assert!(plan.iter().all(|p| z.contains(*p)));
}

#[test]
fn rule_grid_respects_perimeter_and_walls() {
    let z = zone(0.0, 0.0, 1000.0, 1000.0);
    let per = l_shape();
    let plan = plan_zone(PlacementPolicy::RuleGrid, &z, &per, MPP, &[], &PlannerCfg::default());
    assert!(!plan.is_empty());
    // min wall distance is 5 m → 50 px, half of it enforced
    for p in &plan {
        assert!(per.contains(*p), "{p:?} outside perimeter");
        assert!(per.distance_to_boundary(*p).unwrap() >= 25.0 - 1e-9);
        assert!(!(p.x > 400.0 && p.y > 400.0), "{p:?} in the cut-out");
    }
    assert!(min_pairwise(&plan) >= 56.0);
}

#[test]
fn rule_grid_wall_rejection_is_configurable() {
    // single grid point (10, 18), 10 px from the wall
    let z = zone(-30.0, -30.0, 100.0, 100.0);
    let per = square(1000.0);
    let cfg = PlannerCfg::default();
    assert!(plan_zone(PlacementPolicy::RuleGrid, &z, &per, MPP, &[], &cfg).is_empty());
    let loose = PlannerCfg {
        wall_factor: 0.0,
        ..cfg
    };
    let plan = plan_zone(PlacementPolicy::RuleGrid, &z, &per, MPP, &[], &loose);
    assert_eq!(plan, vec![Point::new(10.0, 18.0)]);
}

#[test]
fn rule_grid_avoids_existing_antennas() {
    let z = zone(100.0, 100.0, 600.0, 500.0);
    let existing = vec![antenna(1, 140.0, 148.0), antenna(2, 400.0, 400.0)];
    let plan = plan_zone(
        PlacementPolicy::RuleGrid,
        &z,
        &square(1000.0),
        MPP,
        &existing,
        &PlannerCfg::default(),
    );
    for p in &plan {
        for a in &existing {
            assert!(p.distance(a.position()) >= 56.0);
        }
    }
    assert!(!plan.contains(&Point::new(140.0, 148.0)));
    assert!(plan.len() < 35);
}

#[test]
fn rule_grid_rounds_positions() {
    let z = zone(0.3, 0.7, 300.0, 300.0);
    let plan = plan_zone(
        PlacementPolicy::RuleGrid,
        &z,
        &Perimeter::default(),
        MPP,
        &[],
        &PlannerCfg::default(),
    );
    assert!(plan.iter().all(|p| p.x.fract() == 0.0 && p.y.fract() == 0.0));
}

#[test]
fn invalid_scale_yields_empty_plan() {
    let z = zone(0.0, 0.0, 500.0, 500.0);
    let cfg = PlannerCfg::default();
    for mpp in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        for policy in [PlacementPolicy::RuleGrid, PlacementPolicy::ScoredCandidates] {
            assert!(plan_zone(policy, &z, &Perimeter::default(), mpp, &[], &cfg).is_empty());
        }
    }
}

#[test]
fn scored_cap_is_enforced() {
    let mut z = zone(0.0, 0.0, 2000.0, 2000.0);
    z.max_dist = Some(1.0); // 10 px grid, 40 000 candidates
    let plan = plan_zone(
        PlacementPolicy::ScoredCandidates,
        &z,
        &Perimeter::default(),
        MPP,
        &[],
        &PlannerCfg::default(),
    );
    assert_eq!(plan.len(), 25);
    // equal scores keep grid order: the first column
    assert!(plan.iter().all(|p| p.x == 5.0));
}

#[test]
fn scored_prefers_interior_and_keeps_spacing() {
    let mut z = zone(0.0, 0.0, 1000.0, 1000.0);
    z.max_dist = Some(10.0); // 100 px grid
    let per = square(1000.0);
    let cfg = PlannerCfg::default();
    let plan = plan_zone(PlacementPolicy::ScoredCandidates, &z, &per, MPP, &[], &cfg);
    assert!(!plan.is_empty() && plan.len() <= 25);
    // the best candidate is the most interior grid point
    let d0 = per.distance_to_boundary(plan[0]).unwrap();
    for p in &plan {
        assert!(per.distance_to_boundary(*p).unwrap() <= d0 + 1e-9);
        assert!(per.distance_to_boundary(*p).unwrap() >= 0.7 * 69.0);
    }
    assert!(min_pairwise(&plan) >= 80.0);
}

#[test]
fn scored_rejects_low_efficiency() {
    // single candidate at (10, 10), a corner of the site
    let mut z = zone(0.0, 0.0, 20.0, 20.0);
    z.max_dist = Some(2.0);
    z.coverage_radius = 6.0;
    let per = square(1000.0);
    let cfg = PlannerCfg {
        boundary_factor: 0.0,
        ..PlannerCfg::default()
    };
    assert!(plan_zone(PlacementPolicy::ScoredCandidates, &z, &per, MPP, &[], &cfg).is_empty());
    let lax = PlannerCfg {
        efficiency_threshold: 0.0,
        ..cfg
    };
    let plan = plan_zone(PlacementPolicy::ScoredCandidates, &z, &per, MPP, &[], &lax);
    assert_eq!(plan, vec![Point::new(10.0, 10.0)]);
}

#[test]
fn scored_zero_radius_is_empty() {
    let mut z = zone(0.0, 0.0, 500.0, 500.0);
    z.coverage_radius = 0.0;
    let plan = plan_zone(
        PlacementPolicy::ScoredCandidates,
        &z,
        &Perimeter::default(),
        MPP,
        &[],
        &PlannerCfg::default(),
    );
    assert!(plan.is_empty());
}

#[test]
fn grid_far_from_origin_terminates() {
    // step far below one ulp of x: indices still bound the loop
    let z = zone(1e20, 0.0, 1e6, 1000.0);
    let grid = zone_grid(&z, 80.0, 96.0);
    assert_eq!(grid.len(), 12_500 * 10);
    let plan = plan_zone(
        PlacementPolicy::RuleGrid,
        &z,
        &Perimeter::default(),
        MPP,
        &[],
        &PlannerCfg::default(),
    );
    assert!(!plan.is_empty());
}

#[test]
fn dense_grid_is_refused() {
    let mut z = zone(0.0, 0.0, 2000.0, 2000.0);
    z.max_dist = Some(1e-4); // 0.001 px step
    let plan = plan_zone(
        PlacementPolicy::ScoredCandidates,
        &z,
        &Perimeter::default(),
        MPP,
        &[],
        &PlannerCfg::default(),
    );
    assert!(plan.is_empty());
    assert!(zone_grid(&z, 1e-3, 1e-3).is_empty());
    assert!(zone_grid(&z, f64::NAN, 10.0).is_empty());
}

#[test]
fn grid_counts_match_half_step_offsets() {
    assert_eq!(axis_count(600.0, 80.0), Some(7));
    assert_eq!(axis_count(500.0, 96.0), Some(5));
    assert_eq!(axis_count(30.0, 80.0), Some(0));
    assert_eq!(axis_count(f64::INFINITY, 80.0), None);
    assert_eq!(axis_count(1e12, 1.0), Some(MAX_GRID_POINTS + 1));
}

#[test]
fn policy_names_parse() {
    assert_eq!("rules".parse::<PlacementPolicy>(), Ok(PlacementPolicy::RuleGrid));
    assert_eq!(
        "scored".parse::<PlacementPolicy>(),
        Ok(PlacementPolicy::ScoredCandidates)
    );
    assert!("greedy".parse::<PlacementPolicy>().is_err());
    assert_eq!(PlacementPolicy::default(), PlacementPolicy::RuleGrid);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn scored_never_exceeds_cap(seed in 0u64..1000, max_dist in 2.0f64..8.0) {
        let per = draw_perimeter_radial(RadialCfg::default(), ReplayToken { seed, index: 0 });
        let mut z = zone(100.0, 100.0, 800.0, 800.0);
        z.max_dist = Some(max_dist);
        let cfg = PlannerCfg::default();
        let plan = plan_zone(PlacementPolicy::ScoredCandidates, &z, &per, MPP, &[], &cfg);
        prop_assert!(plan.len() <= cfg.max_selected);
        for p in &plan {
            prop_assert!(per.contains(*p));
        }
        if plan.len() > 1 {
            prop_assert!(min_pairwise(&plan) >= 0.8 * max_dist / MPP - 1e-9);
        }
    }

    #[test]
    fn rule_grid_points_are_valid(seed in 0u64..1000) {
        let per = draw_perimeter_radial(RadialCfg::default(), ReplayToken { seed, index: 1 });
        let z = zone(100.0, 100.0, 800.0, 800.0);
        let cfg = PlannerCfg::default();
        let plan = plan_zone(PlacementPolicy::RuleGrid, &z, &per, MPP, &[], &cfg);
        for p in &plan {
            prop_assert!(per.contains(*p));
            prop_assert!(per.distance_to_boundary(*p).unwrap() >= 25.0 - 1e-9);
        }
        if plan.len() > 1 {
            prop_assert!(min_pairwise(&plan) >= 56.0);
        }
    }
}
