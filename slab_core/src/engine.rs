//! # Design Engine
//!
//! Chains the design stages for one panel:
//!
//! ```text
//! Classified → ThicknessChecked → Loaded → CoefficientResolved
//!            → MomentComputed → ReinforcementComputed → Detailed → Complete
//! ```
//!
//! Any stage may fail instead of advancing. The failure names the stage and
//! carries the typed error; nothing is retried. Panels of a batch are
//! independent, so one failure never stops the others.
//!
//! ## Example
//!
//! ```rust
//! use slab_core::engine::DesignEngine;
//! use slab_core::loads::{LiveLoad, LoadInput, Occupancy};
//! use slab_core::materials::MaterialGrade;
//! use slab_core::panel::{PanelEdge, PanelEdges, SlabPanel};
//! use slab_core::project::DesignSettings;
//!
//! let engine = DesignEngine::global(DesignSettings::default()).unwrap();
//! let edges = PanelEdges::uniform(PanelEdge::continuous(0.0));
//! let panel = SlabPanel::new("D1", 4.0, 6.0, 120.0, edges);
//! let loads = LoadInput::new(1.5, LiveLoad::Occupancy(Occupancy::Residential));
//!
//! let outcome = engine.design_panel(&panel, &MaterialGrade::default(), &loads);
//! assert!(outcome.is_complete());
//! ```

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{
    apply_thickness, check_thickness, classify, compute_moments, design_reinforcement, detail,
    effective_depth, resolve_coefficients, Classification, CoefficientSet, DesignMoment,
    ReinforcementDesign, SupportConditionMap, ThicknessCheck,
};
use crate::errors::{CalcError, CalcResult};
use crate::loads::{combine, FactoredLoad, LoadInput};
use crate::materials::MaterialGrade;
use crate::panel::{SlabPanel, SpanAxis};
use crate::project::{DesignSettings, PanelInput, Project};
use crate::tables::{self, TableSet, TableVersion};

// ============================================================================
// Pipeline state
// ============================================================================

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PipelineStage {
    Classified,
    ThicknessChecked,
    Loaded,
    CoefficientResolved,
    MomentComputed,
    ReinforcementComputed,
    Detailed,
    Complete,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 8] = [
        PipelineStage::Classified,
        PipelineStage::ThicknessChecked,
        PipelineStage::Loaded,
        PipelineStage::CoefficientResolved,
        PipelineStage::MomentComputed,
        PipelineStage::ReinforcementComputed,
        PipelineStage::Detailed,
        PipelineStage::Complete,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PipelineStage::Classified => "Classification",
            PipelineStage::ThicknessChecked => "Thickness check",
            PipelineStage::Loaded => "Load combination",
            PipelineStage::CoefficientResolved => "Coefficient resolution",
            PipelineStage::MomentComputed => "Moment calculation",
            PipelineStage::ReinforcementComputed => "Reinforcement design",
            PipelineStage::Detailed => "Detailing",
            PipelineStage::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A stage that could not be reached and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageFailure {
    pub stage: PipelineStage,
    pub error: CalcError,
}

impl std::fmt::Display for StageFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

fn failed_at(stage: PipelineStage) -> impl FnOnce(CalcError) -> StageFailure {
    move |error| StageFailure { stage, error }
}

/// Plan axes the design directions run along
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionAxes {
    pub short: SpanAxis,
    pub long: SpanAxis,
}

/// Complete design of one panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelResult {
    /// Panel with the final thickness and any override record
    pub panel: SlabPanel,
    pub grade: MaterialGrade,
    pub classification: Classification,
    pub axes: DirectionAxes,
    pub thickness: ThicknessCheck,
    pub load: FactoredLoad,
    pub coefficients: CoefficientSet,
    pub moments: Vec<DesignMoment>,
    pub reinforcement: ReinforcementDesign,
}

impl PanelResult {
    /// True when any automatic override (thickness or steel) was applied
    pub fn has_overrides(&self) -> bool {
        self.thickness.overridden || self.reinforcement.raised()
    }
}

/// Result of one panel run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum PanelOutcome {
    Complete(Box<PanelResult>),
    Failed { panel_id: String, failure: StageFailure },
}

impl PanelOutcome {
    pub fn panel_id(&self) -> &str {
        match self {
            PanelOutcome::Complete(r) => &r.panel.id,
            PanelOutcome::Failed { panel_id, .. } => panel_id,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, PanelOutcome::Complete(_))
    }

    /// `Complete`, or the stage that failed
    pub fn stage(&self) -> PipelineStage {
        match self {
            PanelOutcome::Complete(_) => PipelineStage::Complete,
            PanelOutcome::Failed { failure, .. } => failure.stage,
        }
    }

    pub fn result(&self) -> Option<&PanelResult> {
        match self {
            PanelOutcome::Complete(r) => Some(r),
            PanelOutcome::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&StageFailure> {
        match self {
            PanelOutcome::Complete(_) => None,
            PanelOutcome::Failed { failure, .. } => Some(failure),
        }
    }
}

/// Outcomes of one batch run, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub tables: Vec<TableVersion>,
    pub outcomes: Vec<PanelOutcome>,
}

impl DesignReport {
    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_complete()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.completed()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Runs the design pipeline against a shared, read-only table set
#[derive(Debug, Clone)]
pub struct DesignEngine<'t> {
    tables: &'t TableSet,
    settings: DesignSettings,
    support_map: SupportConditionMap,
}

impl<'t> DesignEngine<'t> {
    /// Engine over `tables` with the standard support condition mapping
    pub fn new(tables: &'t TableSet, settings: DesignSettings) -> CalcResult<Self> {
        settings.validate()?;
        Ok(DesignEngine {
            tables,
            settings,
            support_map: SupportConditionMap::standard(),
        })
    }

    /// Replace the support condition mapping; it must cover every edge pattern
    pub fn with_support_map(mut self, map: SupportConditionMap) -> CalcResult<Self> {
        if !map.is_total() {
            return Err(CalcError::invalid_input(
                "support_map",
                format!("{} entries", map.entries.len()),
                "Mapping must cover all 16 edge patterns",
            ));
        }
        self.support_map = map;
        Ok(self)
    }

    pub fn settings(&self) -> &DesignSettings {
        &self.settings
    }

    pub fn tables(&self) -> &TableSet {
        self.tables
    }

    /// Design one panel. The caller's panel is not modified.
    pub fn design_panel(
        &self,
        panel: &SlabPanel,
        grade: &MaterialGrade,
        loads: &LoadInput,
    ) -> PanelOutcome {
        match self.run(panel, grade, loads) {
            Ok(result) => {
                info!("Panel {} complete: {}", panel.id, result.classification.slab_type);
                PanelOutcome::Complete(Box::new(result))
            }
            Err(failure) => {
                warn!("Panel {} stopped: {}", panel.id, failure);
                PanelOutcome::Failed {
                    panel_id: panel.id.clone(),
                    failure,
                }
            }
        }
    }

    /// Design every panel in parallel; outcomes keep input order
    pub fn design_batch(&self, inputs: &[PanelInput]) -> Vec<PanelOutcome> {
        inputs
            .par_iter()
            .map(|input| self.design_panel(&input.panel, &input.grade, &input.loads))
            .collect()
    }

    fn run(
        &self,
        panel: &SlabPanel,
        grade: &MaterialGrade,
        loads: &LoadInput,
    ) -> Result<PanelResult, StageFailure> {
        panel.validate().map_err(failed_at(PipelineStage::Classified))?;
        let classification =
            classify(panel, &self.support_map).map_err(failed_at(PipelineStage::Classified))?;
        debug!(
            "Panel {}: {} (m = {:.3}, αs = {:.3})",
            panel.id, classification.slab_type, classification.m, classification.alpha_s
        );

        let thickness = check_thickness(panel, &classification, &self.settings)
            .map_err(failed_at(PipelineStage::ThicknessChecked))?;
        let panel = apply_thickness(panel, &thickness);
        if thickness.overridden {
            info!(
                "Panel {}: h raised {:.1} -> {:.1} mm ({})",
                panel.id,
                thickness.input_h_mm,
                thickness.h_mm,
                thickness.governing.clause()
            );
        }

        let load = combine(panel.h_mm, loads).map_err(failed_at(PipelineStage::Loaded))?;
        debug!(
            "Panel {}: g = {:.2}, q = {:.2}, pd = {:.2} kN/m²",
            panel.id, load.g_kn_m2, load.q_kn_m2, load.pd_kn_m2
        );

        let coefficients = resolve_coefficients(&panel, &classification, &load, self.tables)
            .map_err(failed_at(PipelineStage::CoefficientResolved))?;
        for c in coefficients.coefficients.iter().filter(|c| c.clamped) {
            warn!(
                "Panel {}: {} coefficient clamped to the edge of {}",
                panel.id, c.position, c.table
            );
        }

        let lsn_m = classification.geometry.net_short_m;
        let moments = compute_moments(&coefficients.coefficients, load.pd_kn_m2, lsn_m)
            .map_err(failed_at(PipelineStage::MomentComputed))?;

        let cover = panel.cover_mm.unwrap_or(self.settings.cover_mm);
        let d_mm = effective_depth(panel.h_mm, cover)
            .map_err(failed_at(PipelineStage::ReinforcementComputed))?;
        let sections =
            design_reinforcement(&moments, panel.h_mm, cover, grade, &self.tables.k_to_ks)
                .map_err(failed_at(PipelineStage::ReinforcementComputed))?;

        let slab_type = classification.slab_type;
        let reinforcement = detail(slab_type, &sections, panel.h_mm, d_mm, grade, &self.settings)
            .map_err(failed_at(PipelineStage::Detailed))?;
        for raised in &reinforcement.applied_minimums {
            info!(
                "Panel {}: As raised {:.1} -> {:.1} mm²/m ({:?}, {})",
                panel.id,
                raised.from_mm2_per_m,
                raised.to_mm2_per_m,
                raised.rule,
                raised.rule.clause()
            );
        }

        let geometry = &classification.geometry;
        let axes = DirectionAxes {
            short: geometry.short_axis,
            long: geometry.long_axis(),
        };

        Ok(PanelResult {
            panel,
            grade: *grade,
            axes,
            thickness,
            load,
            coefficients,
            moments,
            reinforcement,
            classification,
        })
    }

    /// Validate and design every panel of a project
    pub fn run_project(&self, project: &Project) -> CalcResult<DesignReport> {
        project.validate()?;
        let run_id = Uuid::new_v4();
        info!(
            "Run {}: designing {} panels of job {}",
            run_id,
            project.panel_count(),
            project.meta.job_id
        );

        let outcomes = self.design_batch(&project.panels);
        let report = DesignReport {
            run_id,
            generated_at: Utc::now(),
            tables: self.tables.versions(),
            outcomes,
        };
        info!("Run {}: {} complete, {} failed", run_id, report.completed(), report.failed());
        Ok(report)
    }
}

impl DesignEngine<'static> {
    /// Engine over the process-wide table set
    pub fn global(settings: DesignSettings) -> CalcResult<Self> {
        DesignEngine::new(tables::global()?, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{MomentPosition, SlabType};
    use crate::loads::{LiveLoad, Occupancy};
    use crate::panel::{PanelEdge, PanelEdges};

    fn engine() -> DesignEngine<'static> {
        DesignEngine::global(DesignSettings::default()).unwrap()
    }

    fn loads() -> LoadInput {
        LoadInput::new(1.5, LiveLoad::Occupancy(Occupancy::Residential))
    }

    #[test]
    fn test_two_way_complete() {
        let edges = PanelEdges::uniform(PanelEdge::continuous(0.0));
        let panel = SlabPanel::new("D1", 4.0, 6.0, 120.0, edges);
        let outcome = engine().design_panel(&panel, &MaterialGrade::default(), &loads());
        let r = outcome.result().unwrap();
        assert_eq!(outcome.stage(), PipelineStage::Complete);
        assert_eq!(r.classification.slab_type, SlabType::TwoWay);
        assert_eq!(r.moments.len(), r.coefficients.coefficients.len());
        assert!(r.reinforcement.get(MomentPosition::ShortPositive).is_some());
        assert!(r.reinforcement.min_reinforcement_satisfied);
        assert!(r.reinforcement.spacing_satisfied);
        assert_eq!(r.axes.short, SpanAxis::X);
        assert_eq!(r.axes.long, SpanAxis::Y);
    }

    #[test]
    fn test_failure_names_stage() {
        let panel = SlabPanel::new("D2", -1.0, 6.0, 120.0, PanelEdges::default());
        let outcome = engine().design_panel(&panel, &MaterialGrade::default(), &loads());
        assert_eq!(outcome.stage(), PipelineStage::Classified);
        assert_eq!(outcome.panel_id(), "D2");
        assert!(matches!(
            outcome.failure().unwrap().error,
            CalcError::InvalidGeometry { .. }
        ));
    }

    #[test]
    fn test_bad_load_fails_at_load_stage() {
        let panel = SlabPanel::new("D3", 4.0, 6.0, 120.0, PanelEdges::default());
        let bad = LoadInput::new(1.0, LiveLoad::Explicit(-2.0));
        let outcome = engine().design_panel(&panel, &MaterialGrade::default(), &bad);
        assert_eq!(outcome.stage(), PipelineStage::Loaded);
    }

    #[test]
    fn test_batch_keeps_order() {
        let inputs: Vec<PanelInput> = (0..12)
            .map(|i| {
                let lx = if i % 3 == 0 { -1.0 } else { 3.0 + i as f64 * 0.1 };
                let edges = PanelEdges::uniform(PanelEdge::continuous(0.0));
                PanelInput::new(
                    SlabPanel::new(format!("D{}", i), lx, 6.0, 150.0, edges),
                    MaterialGrade::default(),
                    loads(),
                )
            })
            .collect();
        let outcomes = engine().design_batch(&inputs);
        assert_eq!(outcomes.len(), inputs.len());
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.panel_id(), format!("D{}", i));
            assert_eq!(outcome.is_complete(), i % 3 != 0);
        }
    }

    #[test]
    fn test_partial_support_map_rejected() {
        let mut map = SupportConditionMap::standard();
        map.entries.pop();
        assert!(engine().with_support_map(map).is_err());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = DesignSettings {
            cover_mm: -5.0,
            ..Default::default()
        };
        assert!(DesignEngine::global(settings).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let mut project = Project::new("Engineer", "26-001", "Client");
        project.add_panel(PanelInput::new(
            SlabPanel::new("D1", 4.0, 6.0, 120.0, PanelEdges::uniform(PanelEdge::continuous(0.0))),
            MaterialGrade::default(),
            loads(),
        ));
        let report = engine().run_project(&project).unwrap();
        assert_eq!(report.completed(), 1);
        assert_eq!(report.tables.len(), 4);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"status\":\"Complete\""));
        let back: DesignReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.run_id, report.run_id);
        assert_eq!(back.outcomes.len(), 1);
    }
}
