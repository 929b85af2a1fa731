//! # Unit Types
//!
//! Type-safe wrappers for the SI units used by the slab engine. These are
//! plain f64 newtypes so JSON stays clean (just numbers) while conversions
//! between millimetres and metres are explicit at the call site.
//!
//! ## Units Used
//!
//! - Length: metres (spans), millimetres (thickness, cover, bar spacing)
//! - Distributed load: kN/m²
//! - Moment per unit width: kNm/m
//! - Steel area per unit width: mm²/m
//!
//! ## Example
//!
//! ```rust
//! use slab_core::units::{Meters, Millimeters};
//!
//! let h = Millimeters(120.0);
//! let h_m: Meters = h.into();
//! assert!((h_m.0 - 0.12).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Load and Moment Units
// ============================================================================

/// Area load in kN/m²
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerM2(pub f64);

/// Moment per metre width in kNm/m
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnmPerM(pub f64);

/// Unit weight in kN/m³
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerM3(pub f64);

impl KnPerM3 {
    /// Area load of a layer with this unit weight and the given thickness
    pub fn over_thickness(self, thickness: Meters) -> KnPerM2 {
        KnPerM2(self.0 * thickness.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Steel area per metre width in mm²/m
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mm2PerM(pub f64);

impl Mm2PerM {
    /// Convert to cm²/m (the unit bar tables are usually printed in)
    pub fn to_cm2_per_m(self) -> f64 {
        self.0 / 100.0
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(KnPerM2);
impl_arithmetic!(KnmPerM);
impl_arithmetic!(KnPerM3);
impl_arithmetic!(Mm2PerM);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_m() {
        let mm = Millimeters(150.0);
        let m: Meters = mm.into();
        assert!((m.0 - 0.15).abs() < 1e-12);

        let back: Millimeters = m.into();
        assert!((back.0 - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_weight_layer() {
        let concrete = KnPerM3(25.0);
        let g = concrete.over_thickness(Millimeters(120.0).into());
        assert!((g.0 - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = KnPerM2(4.5);
        let b = KnPerM2(1.5);
        assert_eq!((a + b).0, 6.0);
        assert_eq!((a - b).0, 3.0);
        assert_eq!((a * 2.0).0, 9.0);
        assert_eq!((a / 3.0).0, 1.5);
    }

    #[test]
    fn test_area_in_cm2() {
        assert_eq!(Mm2PerM(524.0).to_cm2_per_m(), 5.24);
    }

    #[test]
    fn test_serialization() {
        let m = Meters(4.7);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "4.7");

        let roundtrip: Meters = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}
