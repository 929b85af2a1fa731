//! # Slab CLI
//!
//! Batch driver for `slab_core`: designs every panel of a project file and
//! prints a summary plus the JSON report.
//!
//! ```text
//! slab_cli [PROJECT.json] [--tables DIR] [--out REPORT.json]
//! ```
//!
//! Without a project file a built-in demo floor is designed. Log level
//! comes from `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use slab_core::calculations::SlabType;
use slab_core::engine::{DesignEngine, DesignReport, PanelOutcome, PanelResult};
use slab_core::errors::CalcResult;
use slab_core::file_io::{load_project, save_report};
use slab_core::loads::{LiveLoad, LoadInput, Occupancy};
use slab_core::materials::MaterialGrade;
use slab_core::panel::{PanelEdge, PanelEdges, SlabPanel};
use slab_core::project::{PanelInput, Project};
use slab_core::tables::{self, TableSet};
use slab_core::units::Mm2PerM;

/// Design every slab panel of a project file
#[derive(Parser, Debug)]
#[command(name = "slab_cli")]
#[command(version, about, long_about = None)]
struct Args {
    /// Project file (JSON); the demo floor is designed when omitted
    project: Option<PathBuf>,

    /// Directory of code table JSON files replacing the builtin set
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Write the report here instead of printing it
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Three panels of a small residential floor
fn demo_project() -> Project {
    let mut project = Project::new("Demo Engineer", "DEMO-001", "Demo Client");
    let grade = MaterialGrade::default();
    let residential = LoadInput::new(1.5, LiveLoad::Occupancy(Occupancy::Residential));

    project.add_panel(PanelInput::new(
        SlabPanel::new(
            "D1",
            4.2,
            5.4,
            120.0,
            PanelEdges {
                south: PanelEdge::discontinuous(250.0),
                north: PanelEdge::continuous(250.0),
                west: PanelEdge::discontinuous(250.0),
                east: PanelEdge::continuous(250.0),
            },
        )
        .with_story_height(3.0),
        grade,
        residential,
    ));
    project.add_panel(PanelInput::new(
        SlabPanel::new("D2", 4.2, 5.4, 120.0, PanelEdges::uniform(PanelEdge::continuous(250.0)))
            .with_story_height(3.0),
        grade,
        residential,
    ));
    project.add_panel(PanelInput::new(
        SlabPanel::new(
            "B1",
            1.5,
            5.4,
            100.0,
            PanelEdges {
                west: PanelEdge::continuous(250.0),
                ..PanelEdges::uniform(PanelEdge::discontinuous(250.0))
            },
        )
        .trafficable()
        .with_story_height(3.0),
        grade,
        LoadInput::new(2.0, LiveLoad::Occupancy(Occupancy::Balcony)),
    ));
    project
}

fn print_result(r: &PanelResult) {
    let c = &r.classification;
    println!("───────────────────────────────────────");
    println!("  PANEL {}  ({})", r.panel.id, r.grade);
    println!("───────────────────────────────────────");
    match (c.slab_type, c.support_condition, c.span_position) {
        (SlabType::TwoWay, Some(condition), _) => {
            println!("  Type:      two-way, m = {:.2}, {}", c.m, condition)
        }
        (SlabType::OneWay, _, Some(span)) => {
            println!("  Type:      one-way, m = {:.2}, {:?}", c.m, span)
        }
        _ => println!("  Type:      {}, m = {:.2}", c.slab_type, c.m),
    }
    println!(
        "  Spans:     short {} = {:.2} m (net {:.2}), long {} = {:.2} m",
        r.axes.short, c.geometry.l_short_m, c.geometry.net_short_m, r.axes.long, c.geometry.l_long_m
    );

    let t = &r.thickness;
    if t.overridden {
        println!(
            "  h:         {:.0} mm [RAISED from {:.0} mm, {:?}]",
            t.h_mm, t.input_h_mm, t.governing
        );
    } else {
        println!("  h:         {:.0} mm (min {:.1} mm)", t.h_mm, t.h_min_mm);
    }
    println!(
        "  Loads:     g = {:.2}, q = {:.2}, pd = {:.2} kN/m² ({})",
        r.load.g_kn_m2, r.load.q_kn_m2, r.load.pd_kn_m2, r.load.combination
    );
    println!();

    for p in &r.reinforcement.positions {
        println!(
            "  {:<15} α = {:.4}  Md = {:6.2} kNm/m  K = {:6.2}  As = {:5.2} cm²/m  {}",
            p.position().display_name(),
            r.moments
                .iter()
                .find(|m| m.position == p.position())
                .map_or(0.0, |m| m.alpha),
            p.section.md_knm_per_m,
            p.section.k,
            Mm2PerM(p.as_design_mm2_per_m).to_cm2_per_m(),
            p.bars
        );
    }
    if let Some(dist) = &r.reinforcement.distribution {
        println!(
            "  {:<15} As = {:5.2} cm²/m  {}",
            "Distribution",
            Mm2PerM(dist.as_design_mm2_per_m).to_cm2_per_m(),
            dist.bars
        );
    }
    for raised in &r.reinforcement.applied_minimums {
        println!(
            "  [RAISED] {:?}: {:.1} -> {:.1} mm²/m ({})",
            raised.rule,
            raised.from_mm2_per_m,
            raised.to_mm2_per_m,
            raised.rule.clause()
        );
    }
    println!();
}

fn print_summary(report: &DesignReport) {
    println!("═══════════════════════════════════════");
    println!("  SLAB DESIGN RUN {}", report.run_id);
    println!("═══════════════════════════════════════");
    for table in &report.tables {
        println!("  table {} ({})", table.name, table.version);
    }
    println!();

    for outcome in &report.outcomes {
        match outcome {
            PanelOutcome::Complete(r) => print_result(r),
            PanelOutcome::Failed { panel_id, failure } => {
                println!("  PANEL {}: [FAIL] {}", panel_id, failure);
                println!();
            }
        }
    }

    println!("═══════════════════════════════════════");
    println!("  RESULT: {} complete, {} failed", report.completed(), report.failed());
    println!("═══════════════════════════════════════");
}

fn run(args: Args) -> CalcResult<bool> {

    if let Some(dir) = &args.tables {
        tables::install(TableSet::load_from_dir(dir)?)?;
    }

    let project = match &args.project {
        Some(path) => load_project(path)?,
        None => {
            println!("No project file given. Designing the demo floor...");
            println!();
            demo_project()
        }
    };

    let engine = DesignEngine::global(project.settings.clone())?;
    let report = engine.run_project(&project)?;
    print_summary(&report);

    match &args.out {
        Some(path) => {
            save_report(&report, path)?;
            println!("Report written to {}", path.display());
        }
        None => {
            println!();
            println!("JSON Output:");
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(report.failed() == 0)
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_project_and_flags() {
        let argv = ["slab_cli", "floor.json", "--tables", "tables", "--out", "report.json"];
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.project, Some(PathBuf::from("floor.json")));
        assert_eq!(args.tables, Some(PathBuf::from("tables")));
        assert_eq!(args.out, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_parse_no_arguments_uses_demo() {
        let args = Args::try_parse_from(["slab_cli"]).unwrap();
        assert!(args.project.is_none());
        assert!(args.tables.is_none());
    }

    #[test]
    fn test_flag_needs_value_and_unknown_flags_rejected() {
        assert!(Args::try_parse_from(["slab_cli", "--out"]).is_err());
        assert!(Args::try_parse_from(["slab_cli", "--verbose"]).is_err());
    }

    #[test]
    fn test_demo_project_has_three_panels() {
        let project = demo_project();
        assert_eq!(project.panels.len(), 3);
    }
}
