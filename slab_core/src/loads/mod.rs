//! Slab loads and the TS500 factored load
//!
//! # Overview
//!
//! - [`LoadType`] - Dead (G) and live (Q)
//! - [`LoadCase`] - Unfactored load values for one scenario
//! - [`LoadCombination`] - Factors applied to a load case
//! - [`LoadInput`] - Raw panel loads: finishes plus an occupancy or explicit q
//! - [`combine`] - Assemble g, q and pd for a given slab thickness
//!
//! # Example
//!
//! ```
//! use slab_core::loads::{combine, LiveLoad, LoadInput, Occupancy};
//!
//! let input = LoadInput::new(1.5, LiveLoad::Occupancy(Occupancy::Office));
//! let load = combine(120.0, &input).unwrap();
//!
//! // g = 0.12 * 25 + 1.5 = 4.5, q = 2.0
//! assert!((load.g_kn_m2 - 4.5).abs() < 1e-9);
//! assert!((load.pd_kn_m2 - (1.4 * 4.5 + 1.6 * 2.0)).abs() < 1e-9);
//! ```

pub mod combinations;
pub mod load_types;
pub mod occupancy;

pub use combinations::{ts500_gravity_combination, LoadCombination};
pub use load_types::LoadType;
pub use occupancy::Occupancy;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::ts500::CONCRETE_UNIT_WEIGHT;
use crate::units::{Meters, Millimeters};

/// A collection of unfactored load values by type
///
/// # Example
/// ```
/// use slab_core::loads::{LoadCase, LoadType};
///
/// let case = LoadCase::new("Typical Floor")
///     .with_load(LoadType::Dead, 6.0)
///     .with_load(LoadType::Live, 2.0);
///
/// assert_eq!(case.get(LoadType::Dead), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    /// User-provided label for this load case
    pub label: String,

    /// Load values keyed by type (kN/m²)
    pub loads: HashMap<LoadType, f64>,
}

impl LoadCase {
    /// Create a new empty load case with a label
    pub fn new(label: impl Into<String>) -> Self {
        LoadCase {
            label: label.into(),
            loads: HashMap::new(),
        }
    }

    /// Add or update a load value (builder pattern)
    pub fn with_load(mut self, load_type: LoadType, value: f64) -> Self {
        self.loads.insert(load_type, value);
        self
    }

    /// Get the load value for a type, defaulting to 0.0 if not set
    pub fn get(&self, load_type: LoadType) -> f64 {
        self.loads.get(&load_type).copied().unwrap_or(0.0)
    }

    /// Validate the load case
    ///
    /// Slab loads are gravity loads: negative or non-finite values are rejected.
    pub fn validate(&self) -> CalcResult<()> {
        for load_type in LoadType::ALL {
            let value = self.get(load_type);
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_load(
                    load_type.code(),
                    value.to_string(),
                    format!("{} must be finite and non-negative", load_type.description()),
                ));
            }
        }
        Ok(())
    }
}

/// Live load source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LiveLoad {
    /// Tabulated value for the occupancy
    Occupancy(Occupancy),
    /// Explicit q (kN/m²)
    Explicit(f64),
}

impl Default for LiveLoad {
    fn default() -> Self {
        LiveLoad::Occupancy(Occupancy::default())
    }
}

impl LiveLoad {
    pub fn value_kn_m2(&self) -> f64 {
        match self {
            LiveLoad::Occupancy(o) => o.live_load_kn_m2(),
            LiveLoad::Explicit(q) => *q,
        }
    }
}

/// Raw loads on a panel, before self-weight is known
///
/// # JSON Format
/// ```json
/// { "finishes_kn_m2": 1.5, "live": { "Occupancy": "Office" } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadInput {
    /// Finishes, screed, plaster and other superimposed dead load (kN/m²)
    #[serde(default)]
    pub finishes_kn_m2: f64,
    pub live: LiveLoad,
}

impl LoadInput {
    pub fn new(finishes_kn_m2: f64, live: LiveLoad) -> Self {
        LoadInput { finishes_kn_m2, live }
    }
}

/// Output of the load stage (all kN/m²)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoredLoad {
    /// Self-weight h × 25 kN/m³
    pub g_self_kn_m2: f64,
    /// Superimposed dead load
    pub g_finishes_kn_m2: f64,
    /// Total dead load g
    pub g_kn_m2: f64,
    /// Live load q
    pub q_kn_m2: f64,
    /// Factored design load pd
    pub pd_kn_m2: f64,
    /// Equation used (e.g., "1.4G + 1.6Q")
    pub combination: String,
}

impl FactoredLoad {
    /// q / g, used by the one-way applicability check
    pub fn live_to_dead_ratio(&self) -> f64 {
        self.q_kn_m2 / self.g_kn_m2
    }
}

/// Assemble g and q for a slab of thickness `h_mm` and factor them.
pub fn combine(h_mm: f64, input: &LoadInput) -> CalcResult<FactoredLoad> {
    if !h_mm.is_finite() || h_mm <= 0.0 {
        return Err(CalcError::invalid_geometry(
            "h_mm",
            h_mm.to_string(),
            "Thickness must be positive",
        ));
    }

    if !input.finishes_kn_m2.is_finite() || input.finishes_kn_m2 < 0.0 {
        return Err(CalcError::invalid_load(
            "finishes_kn_m2",
            input.finishes_kn_m2.to_string(),
            "Finish load must be finite and non-negative",
        ));
    }

    let g_self = CONCRETE_UNIT_WEIGHT
        .over_thickness(Meters::from(Millimeters(h_mm)))
        .value();
    let case = LoadCase::new("Slab")
        .with_load(LoadType::Dead, g_self + input.finishes_kn_m2)
        .with_load(LoadType::Live, input.live.value_kn_m2());
    case.validate()?;

    let combination = ts500_gravity_combination();
    Ok(FactoredLoad {
        g_self_kn_m2: g_self,
        g_finishes_kn_m2: input.finishes_kn_m2,
        g_kn_m2: case.get(LoadType::Dead),
        q_kn_m2: case.get(LoadType::Live),
        pd_kn_m2: combination.apply(&case),
        combination: combination.equation,
    })
}
