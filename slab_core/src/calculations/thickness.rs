//! # Minimum Slab Thickness (TS500 11.2.2, 11.4.2)
//!
//! ## Formulas
//!
//! ```text
//! One-way:  h ≥ Ln / 30
//! Two-way:  h ≥ Lsn / (15 + 20/m) × (1 - αs/4)
//! Floors:   h ≥ 80 mm, h ≥ 120 mm for trafficable slabs
//! ```
//!
//! Where:
//! - `Ln`, `Lsn` = net short span
//! - `m` = Llong / Lshort
//! - `αs` = continuous edge length / perimeter
//!
//! A supplied thickness below the binding minimum is raised to exactly
//! that minimum; a compliant thickness is never changed.

use serde::{Deserialize, Serialize};

use super::classifier::{Classification, SlabType};
use crate::errors::{CalcError, CalcResult};
use crate::panel::{SlabPanel, ThicknessOverride};
use crate::project::DesignSettings;
use crate::ts500::{self, ts500_ref};

/// Rule that produced the binding minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThicknessRule {
    OneWaySlenderness,
    TwoWaySlenderness,
    AbsoluteFloor,
    TrafficableFloor,
}

impl ThicknessRule {
    pub fn clause(&self) -> &'static str {
        match self {
            ThicknessRule::OneWaySlenderness => ts500_ref::ONE_WAY_THICKNESS,
            ThicknessRule::TwoWaySlenderness => ts500_ref::TWO_WAY_THICKNESS,
            ThicknessRule::AbsoluteFloor | ThicknessRule::TrafficableFloor => {
                ts500_ref::THICKNESS_FLOOR
            }
        }
    }
}

/// Output of the thickness stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThicknessCheck {
    /// Thickness as supplied (mm)
    pub input_h_mm: f64,
    /// Thickness carried forward (mm), never below input
    pub h_mm: f64,
    /// Slenderness minimum (mm)
    pub formula_h_mm: f64,
    /// Absolute floor (mm)
    pub floor_h_mm: f64,
    /// Binding minimum = max(formula, floor) (mm)
    pub h_min_mm: f64,
    pub governing: ThicknessRule,
    /// True when h was raised
    pub overridden: bool,
}

/// Compute the binding minimum and the thickness to carry forward.
pub fn check_thickness(
    panel: &SlabPanel,
    classification: &Classification,
    settings: &DesignSettings,
) -> CalcResult<ThicknessCheck> {
    let h = panel.h_mm;
    if !h.is_finite() || h <= 0.0 {
        return Err(CalcError::invalid_geometry(
            "h_mm",
            h.to_string(),
            "Thickness must be positive",
        ));
    }

    let net_short_mm = classification.geometry.net_short_m * 1000.0;
    let (formula_h_mm, formula_rule) = match classification.slab_type {
        SlabType::OneWay => (
            net_short_mm / ts500::ONE_WAY_SLENDERNESS,
            ThicknessRule::OneWaySlenderness,
        ),
        SlabType::TwoWay => {
            let denominator = ts500::two_way_thickness_denominator(classification.m);
            (
                net_short_mm / denominator * (1.0 - classification.alpha_s / 4.0),
                ThicknessRule::TwoWaySlenderness,
            )
        }
    };

    let floor_h_mm = settings.thickness_floor_mm(panel.trafficable);
    let floor_rule = if panel.trafficable {
        ThicknessRule::TrafficableFloor
    } else {
        ThicknessRule::AbsoluteFloor
    };

    let (h_min_mm, governing) = if formula_h_mm > floor_h_mm {
        (formula_h_mm, formula_rule)
    } else {
        (floor_h_mm, floor_rule)
    };

    let overridden = h < h_min_mm;
    Ok(ThicknessCheck {
        input_h_mm: h,
        h_mm: if overridden { h_min_mm } else { h },
        formula_h_mm,
        floor_h_mm,
        h_min_mm,
        governing,
        overridden,
    })
}

/// Copy of the panel carrying the checked thickness.
///
/// When the thickness was raised the override is recorded on the panel
/// together with the original value.
pub fn apply_thickness(panel: &SlabPanel, check: &ThicknessCheck) -> SlabPanel {
    let mut out = panel.clone();
    if check.overridden {
        out.h_mm = check.h_mm;
        out.thickness_override = Some(ThicknessOverride {
            original_h_mm: check.input_h_mm,
            raised_h_mm: check.h_mm,
            clause: check.governing.clause().to_string(),
        });
    }
    out
}
