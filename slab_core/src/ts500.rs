//! # TS500 Code Constants
//!
//! Fixed values from TS500 (Requirements for Design and Construction of
//! Reinforced Concrete Structures) and TS498 (design loads) that the slab
//! engine applies. These are code constants, not user settings: anything an
//! engineer may legitimately change lives in
//! [`DesignSettings`](crate::project::DesignSettings) instead.
//!
//! ## Constant Summary
//!
//! | Constant                      | Value   | Clause           |
//! |-------------------------------|---------|------------------|
//! | Dead load factor              | 1.4     | TS500 6.2.6      |
//! | Live load factor              | 1.6     | TS500 6.2.6      |
//! | Reinforced concrete unit wt.  | 25 kN/m³| TS498 Table 1    |
//! | Two-way min ρx + ρy           | 0.0035  | TS500 11.4.3     |
//! | Two-way top bar min ρ         | 0.002   | TS500 11.4.3     |
//! | Distribution steel            | As / 5  | TS500 11.2.3     |
//! | Coefficient method m limit    | 2.0     | TS500 11.1       |

use crate::units::KnPerM3;

/// TS500 clause references attached to results and override flags.
pub mod ts500_ref {
    /// One-way / two-way distinction by span ratio
    pub const SLAB_TYPE: &str = "TS500 11.1";
    /// One-way slab minimum thickness
    pub const ONE_WAY_THICKNESS: &str = "TS500 11.2.2";
    /// Two-way slab minimum thickness
    pub const TWO_WAY_THICKNESS: &str = "TS500 11.4.2";
    /// Absolute thickness floors
    pub const THICKNESS_FLOOR: &str = "TS500 11.2.2";
    /// Load combination 1.4G + 1.6Q
    pub const LOAD_COMBINATION: &str = "TS500 6.2.6";
    /// One-way moment coefficients and their applicability
    pub const ONE_WAY_COEFFICIENTS: &str = "TS500 11.2.1";
    /// Two-way moment coefficients (Table 11.1)
    pub const TWO_WAY_COEFFICIENTS: &str = "TS500 11.4.1";
    /// One-way minimum reinforcement ratio
    pub const ONE_WAY_MIN_STEEL: &str = "TS500 11.2.3";
    /// Two-way combined minimum reinforcement ratio
    pub const TWO_WAY_MIN_STEEL: &str = "TS500 11.4.3";
    /// Distribution (secondary) reinforcement
    pub const DISTRIBUTION_STEEL: &str = "TS500 11.2.3";
    /// Bar spacing limits
    pub const BAR_SPACING: &str = "TS500 11.2.3";
}

/// Dead load factor in the ultimate combination
pub const DEAD_LOAD_FACTOR: f64 = 1.4;

/// Live load factor in the ultimate combination
pub const LIVE_LOAD_FACTOR: f64 = 1.6;

/// Unit weight of reinforced concrete
pub const CONCRETE_UNIT_WEIGHT: KnPerM3 = KnPerM3(25.0);

/// Span ratio above which a slab carries load one way
pub const ONE_WAY_SPAN_RATIO: f64 = 2.0;

/// One-way slab: h ≥ Ln / 30
pub const ONE_WAY_SLENDERNESS: f64 = 30.0;

/// Two-way minimum combined ratio ρx + ρy
pub const TWO_WAY_MIN_COMBINED_RATIO: f64 = 0.0035;

/// Two-way top (negative moment) bar minimum ratio
pub const TWO_WAY_MIN_TOP_RATIO: f64 = 0.002;

/// Distribution steel as a fraction of the governing main steel
pub const DISTRIBUTION_FRACTION: f64 = 0.2;

/// Design strip width in metres
pub const STRIP_WIDTH_M: f64 = 1.0;

/// Two-way minimum thickness denominator: Lsn / (15 + 20/m)
pub fn two_way_thickness_denominator(m: f64) -> f64 {
    15.0 + 20.0 / m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denominator() {
        // m = 1.25 -> 15 + 16 = 31
        assert!((two_way_thickness_denominator(1.25) - 31.0).abs() < 1e-12);
        // square panel -> 35
        assert!((two_way_thickness_denominator(1.0) - 35.0).abs() < 1e-12);
    }

    #[test]
    fn test_factors() {
        assert_eq!(DEAD_LOAD_FACTOR, 1.4);
        assert_eq!(LIVE_LOAD_FACTOR, 1.6);
        assert_eq!(CONCRETE_UNIT_WEIGHT.0, 25.0);
    }
}
