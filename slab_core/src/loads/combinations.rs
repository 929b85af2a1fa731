//! TS500 Load Combinations
//!
//! Slabs designed by the coefficient method use the single gravity
//! combination of TS500 6.2.6:
//!
//! ```text
//! Fd = 1.4 G + 1.6 Q
//! ```
//!
//! The factors are code constants, not user input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::load_types::LoadType;
use super::LoadCase;
use crate::ts500::{DEAD_LOAD_FACTOR, LIVE_LOAD_FACTOR};

/// A load combination with factors for each load type
///
/// # Example
/// ```
/// use slab_core::loads::{ts500_gravity_combination, LoadCase, LoadType};
///
/// let combo = ts500_gravity_combination();
/// let case = LoadCase::new("Floor")
///     .with_load(LoadType::Dead, 5.0)
///     .with_load(LoadType::Live, 2.0);
///
/// assert!((combo.apply(&case) - 10.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier (e.g., "ULS-1")
    pub name: String,

    /// Human-readable equation for display (e.g., "1.4G + 1.6Q")
    pub equation: String,

    /// Load factors keyed by load type
    pub factors: HashMap<LoadType, f64>,
}

impl LoadCombination {
    /// Create a new load combination
    pub fn new(name: impl Into<String>, equation: impl Into<String>) -> Self {
        LoadCombination {
            name: name.into(),
            equation: equation.into(),
            factors: HashMap::new(),
        }
    }

    /// Add a load factor (builder pattern)
    pub fn with_factor(mut self, load_type: LoadType, factor: f64) -> Self {
        self.factors.insert(load_type, factor);
        self
    }

    /// Apply this combination to a LoadCase, returning the total factored load
    ///
    /// Terms are summed in `LoadType::ALL` order so the result does not
    /// depend on map iteration order.
    pub fn apply(&self, case: &LoadCase) -> f64 {
        LoadType::ALL
            .iter()
            .map(|lt| self.get_factor(*lt) * case.get(*lt))
            .sum()
    }

    /// Get the factor for a specific load type (0.0 if not in combination)
    pub fn get_factor(&self, load_type: LoadType) -> f64 {
        self.factors.get(&load_type).copied().unwrap_or(0.0)
    }
}

/// The TS500 ultimate gravity combination 1.4G + 1.6Q
pub fn ts500_gravity_combination() -> LoadCombination {
    LoadCombination::new("ULS-1", "1.4G + 1.6Q")
        .with_factor(LoadType::Dead, DEAD_LOAD_FACTOR)
        .with_factor(LoadType::Live, LIVE_LOAD_FACTOR)
}
