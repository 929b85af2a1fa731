//! End-to-end runs of the design pipeline.

use approx::assert_relative_eq;

use slab_core::calculations::{
    classify, compute_moments, resolve_coefficients, MomentPosition, SlabType, SpanPosition,
    SupportCondition, SupportConditionMap,
};
use slab_core::engine::{DesignEngine, PipelineStage};
use slab_core::errors::CalcError;
use slab_core::loads::{combine, FactoredLoad, LiveLoad, LoadInput, Occupancy};
use slab_core::materials::{ConcreteClass, MaterialGrade, SteelClass};
use slab_core::panel::{PanelEdge, PanelEdges, SlabPanel};
use slab_core::project::{DesignSettings, PanelInput, Project};
use slab_core::tables::{self, TableKey};

fn engine() -> DesignEngine<'static> {
    DesignEngine::global(DesignSettings::default()).unwrap()
}

fn grade() -> MaterialGrade {
    MaterialGrade::new(ConcreteClass::C30, SteelClass::S420)
}

fn continuous() -> PanelEdges {
    PanelEdges::uniform(PanelEdge::continuous(0.0))
}

/// Only the west edge continuous (a long edge when lx ≤ ly)
fn end_span_edges() -> PanelEdges {
    PanelEdges {
        west: PanelEdge::continuous(0.0),
        ..PanelEdges::default()
    }
}

#[test]
fn slab_type_follows_span_ratio() {
    let map = SupportConditionMap::standard();
    for lx in [2.0, 2.5, 2.9, 3.0, 3.1, 4.0, 6.0] {
        let panel = SlabPanel::new("P", lx, 6.0, 150.0, continuous());
        let c = classify(&panel, &map).unwrap();
        let m = 6.0 / lx;
        assert_eq!(c.slab_type == SlabType::OneWay, m > 2.0, "lx = {}", lx);
    }
}

#[test]
fn thickness_never_decreases() {
    let e = engine();
    for h in [60.0, 90.0, 120.0, 180.0] {
        let panel = SlabPanel::new("P", 4.5, 10.0, h, end_span_edges());
        let loads = LoadInput::new(1.0, LiveLoad::Occupancy(Occupancy::Office));
        let outcome = e.design_panel(&panel, &grade(), &loads);
        let r = outcome.result().unwrap();
        assert!(r.panel.h_mm >= h);
        assert_eq!(r.panel.h_mm == h, !r.thickness.overridden);
        assert_eq!(r.panel.thickness_override.is_some(), r.thickness.overridden);
    }
}

#[test]
fn table_interpolation_is_exact_and_linear() {
    let set = tables::global().unwrap();
    let key = ["C30", "S420"];

    let at_row = set.k_to_ks.lookup(&TableKey::new(key).at(2.037)).unwrap();
    assert_eq!(at_row.value, 3.3189);
    assert!(!at_row.clamped);

    let mid = set.k_to_ks.lookup(&TableKey::new(key).at((2.037 + 2.084) / 2.0)).unwrap();
    assert_relative_eq!(mid.value, (3.3189 + 3.2989) / 2.0, epsilon = 1e-9);
}

#[test]
fn two_way_round_trip_example() {
    // four continuous edges, m = 1.5, pd = 10 kN/m², Lsn = 4 m
    let set = tables::global().unwrap();
    let panel = SlabPanel::new("P", 4.0, 6.0, 120.0, continuous());
    let c = classify(&panel, &SupportConditionMap::standard()).unwrap();
    assert_eq!(c.support_condition, Some(SupportCondition::AllContinuous));
    assert_eq!(c.m, 1.5);

    let load = FactoredLoad {
        pd_kn_m2: 10.0,
        ..combine(120.0, &LoadInput::new(0.0, LiveLoad::Explicit(2.0))).unwrap()
    };
    let coefficients = resolve_coefficients(&panel, &c, &load, set).unwrap();
    let lsn = c.geometry.net_short_m;
    let moments = compute_moments(&coefficients.coefficients, 10.0, lsn).unwrap();

    let short = moments.iter().find(|m| m.position == MomentPosition::ShortPositive).unwrap();
    assert_eq!(short.alpha, 0.045);
    assert_relative_eq!(short.md_knm_per_m, 7.2, epsilon = 1e-12);
}

#[test]
fn one_way_end_span_reference() {
    // Ln = 3.5 m, trafficable, h 100 -> 120 mm; finishes 3.0, q = 5.0
    let panel = SlabPanel::new("E2E", 3.5, 8.0, 100.0, end_span_edges()).trafficable();
    let loads = LoadInput::new(3.0, LiveLoad::Explicit(5.0));
    let outcome = engine().design_panel(&panel, &grade(), &loads);
    let r = outcome.result().unwrap();

    assert_eq!(r.classification.slab_type, SlabType::OneWay);
    assert_eq!(r.classification.span_position, Some(SpanPosition::EndSpan));
    assert_eq!(r.panel.h_mm, 120.0);
    assert!(r.thickness.overridden);
    assert_eq!(r.panel.thickness_override.as_ref().unwrap().original_h_mm, 100.0);

    // g = 0.12 × 25 + 3.0, pd = 1.4 × 6.0 + 1.6 × 5.0
    assert_eq!(r.load.g_kn_m2, 6.0);
    assert_relative_eq!(r.load.pd_kn_m2, 16.4, epsilon = 1e-12);

    // Md = pd Ln² / 11 = 16.4 × 12.25 / 11
    let positive = r
        .moments
        .iter()
        .find(|m| m.position == MomentPosition::ShortPositive)
        .unwrap();
    assert_eq!(positive.lsn_m, 3.5);
    assert_relative_eq!(positive.md_knm_per_m, 18.263636363636362, epsilon = 1e-12);

    let section = r.reinforcement.get(MomentPosition::ShortPositive).unwrap();
    assert_eq!(section.section.d_mm, 100.0);
    assert!(section.bars.as_provided_mm2_per_m >= section.as_design_mm2_per_m);
    assert!(r.reinforcement.distribution.is_some());
}

#[test]
fn light_one_way_slab_gets_minimum_steel() {
    // simple span, generous thickness: required As below 0.002 b d
    let panel = SlabPanel::new("MIN", 2.6, 6.0, 140.0, PanelEdges::default());
    let loads = LoadInput::new(0.0, LiveLoad::Occupancy(Occupancy::Residential));
    let outcome = engine().design_panel(&panel, &grade(), &loads);
    let r = outcome.result().unwrap();

    let main = r.reinforcement.get(MomentPosition::ShortPositive).unwrap();
    let as_min = 0.002 * (1000.0 * 120.0);
    assert!(main.section.as_required_mm2_per_m < as_min);
    assert_eq!(main.as_design_mm2_per_m, as_min);
    assert!(r.reinforcement.raised());
    assert!(r.has_overrides());
}

#[test]
fn emitted_spacings_respect_cap() {
    let e = engine();
    for (lx, h) in [(3.0, 100.0), (4.0, 120.0), (5.0, 150.0)] {
        for edges in [PanelEdges::default(), PanelEdges::uniform(PanelEdge::continuous(250.0))] {
            let panel = SlabPanel::new("S", lx, lx * 1.3, h, edges);
            let loads = LoadInput::new(1.5, LiveLoad::Occupancy(Occupancy::Office));
            let outcome = e.design_panel(&panel, &grade(), &loads);
            let r = outcome.result().unwrap();
            let cap = (1.5 * r.panel.h_mm).min(200.0);
            for p in &r.reinforcement.positions {
                assert!(p.bars.spacing_mm as f64 <= cap, "{} > {}", p.bars, cap);
            }
            assert!(r.reinforcement.spacing_satisfied);
        }
    }
}

#[test]
fn thick_two_way_panels_keep_long_bars_within_cap() {
    let e = engine();
    let mut completed = 0;
    for h in [180.0, 200.0] {
        for lx in [4.0, 4.5, 5.0] {
            for q in [2.0, 3.5, 5.0] {
                let panel = SlabPanel::new("T", lx, lx * 1.4, h, continuous());
                let loads = LoadInput::new(1.5, LiveLoad::Explicit(q));
                let outcome = e.design_panel(&panel, &grade(), &loads);
                let Some(r) = outcome.result() else {
                    continue;
                };
                completed += 1;
                let cap = (1.5 * r.panel.h_mm).min(200.0);
                for p in &r.reinforcement.positions {
                    assert!(p.bars.spacing_mm as f64 <= cap, "h = {}, lx = {}: {}", h, lx, p.bars);
                }
                assert!(r.reinforcement.spacing_satisfied);
            }
        }
    }
    assert!(completed > 0);
}

#[test]
fn k_beyond_table_is_a_typed_failure() {
    let set = tables::global().unwrap();
    let err = set
        .k_to_ks
        .lookup(&TableKey::new(["C30", "S420"]).at(10_000.0))
        .unwrap_err();
    assert!(matches!(err, CalcError::OutOfRange { .. }));

    // heavily loaded two-way panel: K falls below the balanced limit
    let panel = SlabPanel::new("HEAVY", 4.0, 6.0, 120.0, continuous());
    let loads = LoadInput::new(1.0, LiveLoad::Explicit(200.0));
    let outcome = engine().design_panel(&panel, &grade(), &loads);
    assert_eq!(outcome.stage(), PipelineStage::ReinforcementComputed);
    assert!(outcome.failure().unwrap().error.is_table_miss());
}

#[test]
fn high_live_load_leaves_coefficient_method() {
    let panel = SlabPanel::new("QG", 3.5, 8.0, 120.0, end_span_edges());
    let loads = LoadInput::new(0.0, LiveLoad::Explicit(20.0));
    let outcome = engine().design_panel(&panel, &grade(), &loads);
    assert_eq!(outcome.stage(), PipelineStage::CoefficientResolved);
    assert_eq!(
        outcome.failure().unwrap().error.error_code(),
        "COEFFICIENT_METHOD_NOT_APPLICABLE"
    );
}

#[test]
fn failed_panel_does_not_stop_batch() {
    let mut project = Project::new("Engineer", "26-100", "Client");
    let loads = LoadInput::new(1.5, LiveLoad::Occupancy(Occupancy::Residential));
    project.add_panel(PanelInput::new(
        SlabPanel::new("D1", 4.0, 5.0, 120.0, PanelEdges::uniform(PanelEdge::continuous(250.0))),
        grade(),
        loads,
    ));
    project.add_panel(PanelInput::new(
        SlabPanel::new("D2", 0.0, 5.0, 120.0, PanelEdges::default()),
        grade(),
        loads,
    ));
    project.add_panel(PanelInput::new(
        SlabPanel::new("D3", 3.0, 7.0, 120.0, end_span_edges()),
        grade(),
        loads,
    ));

    let report = engine().run_project(&project).unwrap();
    let ids: Vec<&str> = report.outcomes.iter().map(|o| o.panel_id()).collect();
    assert_eq!(ids, ["D1", "D2", "D3"]);
    assert_eq!(report.completed(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.outcomes[1].stage(), PipelineStage::Classified);
}
