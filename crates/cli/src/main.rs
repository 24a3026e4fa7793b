use annotator::prelude::*;
use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod store;

#[derive(Parser)]
#[command(name = "annotator-cli")]
#[command(about = "Batch operations on floor-plan annotation documents")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Replace a zone's antennas with a fresh placement plan
    Populate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        zone: u32,
        /// rules | scored
        #[arg(long, default_value = "rules")]
        policy: PlacementPolicy,
        /// Output path; defaults to rewriting the input
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        planner: PlannerArgs,
    },
    /// Delete a zone together with its antennas
    DeleteZone {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        zone: u32,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Snap a line end point and print the result as JSON
    Snap {
        #[arg(long, value_parser = parse_point)]
        start: Point,
        #[arg(long, value_parser = parse_point)]
        end: Point,
        /// Orthogonal tolerance in degrees
        #[arg(long)]
        orthogonal: Option<f64>,
        /// Diagonal tolerance in degrees
        #[arg(long)]
        diagonal: Option<f64>,
        #[arg(long)]
        no_diagonal: bool,
        #[arg(long)]
        disabled: bool,
    },
    /// Evaluate the perimeter predicates at a world point
    Query {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        /// Coverage radius in meters (needs a scale)
        #[arg(long, default_value_t = 6.0)]
        radius_m: f64,
    },
    /// Print a JSON summary of a document
    Report {
        #[arg(long)]
        input: PathBuf,
    },
}

/// Planner tuning; every default matches `PlannerCfg::default()`.
#[derive(Args, Debug)]
struct PlannerArgs {
    #[arg(long, default_value_t = PlannerCfg::default().grid_factor)]
    grid_factor: f64,
    #[arg(long, default_value_t = PlannerCfg::default().wall_factor)]
    wall_factor: f64,
    #[arg(long, default_value_t = PlannerCfg::default().min_spacing_factor)]
    min_spacing_factor: f64,
    #[arg(long, default_value_t = PlannerCfg::default().boundary_factor)]
    boundary_factor: f64,
    #[arg(long, default_value_t = PlannerCfg::default().efficiency_threshold)]
    efficiency_threshold: f64,
    #[arg(long, default_value_t = PlannerCfg::default().efficiency_weight)]
    efficiency_weight: f64,
    #[arg(long, default_value_t = PlannerCfg::default().boundary_weight)]
    boundary_weight: f64,
    #[arg(long, default_value_t = PlannerCfg::default().selection_spacing_factor)]
    selection_spacing_factor: f64,
    #[arg(long, default_value_t = PlannerCfg::default().max_selected)]
    max_selected: usize,
}

impl From<PlannerArgs> for PlannerCfg {
    fn from(a: PlannerArgs) -> Self {
        Self {
            grid_factor: a.grid_factor,
            wall_factor: a.wall_factor,
            min_spacing_factor: a.min_spacing_factor,
            boundary_factor: a.boundary_factor,
            efficiency_threshold: a.efficiency_threshold,
            efficiency_weight: a.efficiency_weight,
            boundary_weight: a.boundary_weight,
            selection_spacing_factor: a.selection_spacing_factor,
            max_selected: a.max_selected,
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Populate {
            input,
            zone,
            policy,
            out,
            planner,
        } => populate(&input, zone, policy, planner.into(), out.as_deref()),
        Action::DeleteZone { input, zone, out } => delete_zone(&input, zone, out.as_deref()),
        Action::Snap {
            start,
            end,
            orthogonal,
            diagonal,
            no_diagonal,
            disabled,
        } => {
            let patch = SnapSettingsPatch {
                enabled: disabled.then_some(false),
                orthogonal_snap_angle: orthogonal,
                diagonal_snap_angle: diagonal,
                enable_diagonal_snap: no_diagonal.then_some(false),
            };
            snap(start, end, patch)
        }
        Action::Query {
            input,
            x,
            y,
            radius_m,
        } => query(&input, Point::new(x, y), radius_m),
        Action::Report { input } => report(&input),
    }
}

fn populate(
    input: &Path,
    zone: u32,
    policy: PlacementPolicy,
    planner: PlannerCfg,
    out: Option<&Path>,
) -> Result<()> {
    tracing::info!(input = %input.display(), zone, policy = policy.name(), "populate");
    let mut doc = store::load_document(input)?;
    doc.planner = planner;
    if doc.zone(zone).is_none() {
        bail!("zone {zone} not found in {}", input.display());
    }
    let placed = doc
        .populate_antennas_in_zone_with(zone, policy)
        .ok_or_else(|| anyhow!("scale is not set in {}; cannot place antennas", input.display()))?;
    let written = store::save_document(&doc, input, out)?;
    tracing::info!(placed, out = %written.display(), "populate done");
    println!("{placed}");
    Ok(())
}

fn delete_zone(input: &Path, zone: u32, out: Option<&Path>) -> Result<()> {
    tracing::info!(input = %input.display(), zone, "delete-zone");
    let mut doc = store::load_document(input)?;
    let removed = doc
        .delete_zone(zone)
        .ok_or_else(|| anyhow!("zone {zone} not found in {}", input.display()))?;
    let written = store::save_document(&doc, input, out)?;
    tracing::info!(antennas_removed = removed, out = %written.display(), "zone deleted");
    Ok(())
}

fn snap(start: Point, end: Point, patch: SnapSettingsPatch) -> Result<()> {
    let mut snapper = GridSnapper::new(SnapSettings::default());
    snapper.update_settings(patch);
    let res = snapper.snap_line(start, end);
    println!("{}", serde_json::to_string_pretty(&res)?);
    Ok(())
}

fn query(input: &Path, p: Point, radius_m: f64) -> Result<()> {
    let doc = store::load_document(input)?;
    let per = doc.perimeter();
    let efficiency = doc
        .meters_per_pixel()
        .map(|mpp| per.coverage_efficiency(p, radius_m / mpp));
    let obj = serde_json::json!({
        "x": p.x,
        "y": p.y,
        "inside": per.contains(p),
        "boundaryDistance": per.distance_to_boundary(p),
        "coverageEfficiency": efficiency,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn report(input: &Path) -> Result<()> {
    let doc = store::load_document(input)?;
    let mut per_zone: BTreeMap<String, usize> = doc
        .zones()
        .iter()
        .map(|z| (z.label.clone(), doc.antennas_in_zone(z.id).count()))
        .collect();
    let manual = doc.antennas().iter().filter(|a| a.zone_id.is_none()).count();
    if manual > 0 {
        per_zone.insert("(manual)".into(), manual);
    }
    let obj = serde_json::json!({
        "perimeter": {
            "points": doc.perimeter().points.len(),
            "closed": doc.perimeter().closed,
        },
        "metersPerPixel": doc.meters_per_pixel(),
        "zones": doc.zones().len(),
        "antennas": doc.antennas().len(),
        "measures": doc.measures().len(),
        "antennasPerZone": per_zone,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate `{v}`: {e}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn points_parse() {
        assert_eq!(parse_point("3.5, -2").unwrap(), Point::new(3.5, -2.0));
        assert!(parse_point("3.5").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn snap_flags_build_patch() {
        let cmd = Cmd::try_parse_from([
            "annotator-cli",
            "snap",
            "--start",
            "0,0",
            "--end",
            "100,3",
            "--orthogonal",
            "5",
            "--no-diagonal",
        ])
        .unwrap();
        match cmd.action {
            Action::Snap {
                start,
                orthogonal,
                no_diagonal,
                disabled,
                ..
            } => {
                assert_eq!(start, Point::new(0.0, 0.0));
                assert_eq!(orthogonal, Some(5.0));
                assert!(no_diagonal);
                assert!(!disabled);
            }
            _ => panic!("expected snap"),
        }
    }

    #[test]
    fn populate_policy_parses() {
        let cmd = Cmd::try_parse_from([
            "annotator-cli",
            "populate",
            "--input",
            "site.json",
            "--zone",
            "2",
            "--policy",
            "scored",
            "--max-selected",
            "10",
        ])
        .unwrap();
        match cmd.action {
            Action::Populate {
                zone,
                policy,
                out,
                planner,
                ..
            } => {
                assert_eq!(zone, 2);
                assert_eq!(policy, PlacementPolicy::ScoredCandidates);
                assert!(out.is_none());
                let cfg = PlannerCfg::from(planner);
                assert_eq!(cfg.max_selected, 10);
                assert_eq!(
                    cfg,
                    PlannerCfg {
                        max_selected: 10,
                        ..PlannerCfg::default()
                    }
                );
            }
            _ => panic!("expected populate"),
        }
    }
}
