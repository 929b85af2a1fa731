//! # slab_core - Reinforced-Concrete Slab Design Engine
//!
//! `slab_core` designs floor slab panels with the TS500 coefficient method:
//! it classifies each panel, enforces minimum thickness, combines loads,
//! resolves moment coefficients from versioned code tables, computes
//! design moments, inverts the K→ks table for the required steel and
//! details bars against minimum-steel and spacing rules.
//!
//! ## Design Philosophy
//!
//! - **Pure stages**: every stage is a function of its inputs and the tables
//! - **JSON-First**: inputs, results and errors implement Serialize/Deserialize
//! - **Rich Errors**: each failure names the pipeline stage and a typed cause
//! - **Shared tables**: code tables load once per process and are read-only
//!
//! ## Quick Start
//!
//! ```rust
//! use slab_core::engine::DesignEngine;
//! use slab_core::loads::{LiveLoad, LoadInput, Occupancy};
//! use slab_core::materials::MaterialGrade;
//! use slab_core::panel::{PanelEdge, PanelEdges, SlabPanel};
//! use slab_core::project::DesignSettings;
//!
//! let engine = DesignEngine::global(DesignSettings::default()).unwrap();
//! let edges = PanelEdges::uniform(PanelEdge::continuous(250.0));
//! let panel = SlabPanel::new("D1", 4.0, 5.0, 120.0, edges);
//! let loads = LoadInput::new(1.5, LiveLoad::Occupancy(Occupancy::Office));
//!
//! let outcome = engine.design_panel(&panel, &MaterialGrade::default(), &loads);
//! let json = serde_json::to_string_pretty(&outcome).unwrap();
//! assert!(json.contains("\"status\""));
//! ```
//!
//! ## Modules
//!
//! - [`panel`] - Panel geometry, edges and short/long normalization
//! - [`materials`] - Concrete and steel grades, rebar catalog
//! - [`loads`] - Load types, occupancy live loads, factored combination
//! - [`tables`] - Versioned code tables and the process-wide table set
//! - [`calculations`] - The design stages
//! - [`engine`] - Pipeline orchestration and batch runs
//! - [`project`] - Project container and design settings
//! - [`file_io`] - Atomic project and report files
//! - [`ts500`] - Code constants and clause references
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod engine;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod materials;
pub mod panel;
pub mod project;
pub mod tables;
pub mod ts500;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use engine::{
    DesignEngine, DesignReport, PanelOutcome, PanelResult, PipelineStage, StageFailure,
};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project, save_report};
pub use project::{DesignSettings, PanelInput, Project, ProjectMetadata};
