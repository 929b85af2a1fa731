//! Reinforcing Bar Catalog
//!
//! Standard bar diameters and spacings used when turning a required steel
//! area (mm²/m) into a bar/spacing pair such as Ø10/150.
//!
//! ## Area per Metre
//!
//! ```text
//! As = (π Ø² / 4) × 1000 / s      [mm²/m]
//! ```

use serde::{Deserialize, Serialize};

/// Bar diameters stocked for slabs (mm)
pub const STANDARD_DIAMETERS_MM: [u32; 8] = [6, 8, 10, 12, 14, 16, 18, 20];

/// Standard centre-to-centre spacings, widest first (mm)
pub const STANDARD_SPACINGS_MM: [u32; 17] = [
    300, 250, 200, 180, 175, 160, 150, 140, 130, 125, 120, 110, 100, 90, 80, 75, 70,
];

/// Cross-sectional area of one bar (mm²)
pub fn bar_area_mm2(diameter_mm: u32) -> f64 {
    let d = diameter_mm as f64;
    std::f64::consts::PI * d * d / 4.0
}

/// Steel area per metre width for bars of `diameter_mm` at `spacing_mm`
pub fn area_per_meter(diameter_mm: u32, spacing_mm: u32) -> f64 {
    bar_area_mm2(diameter_mm) * 1000.0 / spacing_mm as f64
}

/// Catalog of bar diameters and standard spacings the detailer may choose from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarCatalog {
    /// Available diameters (mm), ascending
    pub diameters_mm: Vec<u32>,
    /// Available spacings (mm), descending
    pub spacings_mm: Vec<u32>,
}

impl Default for RebarCatalog {
    fn default() -> Self {
        RebarCatalog {
            diameters_mm: STANDARD_DIAMETERS_MM.to_vec(),
            spacings_mm: STANDARD_SPACINGS_MM.to_vec(),
        }
    }
}

impl RebarCatalog {
    /// Diameters at or above `min_diameter_mm`, ascending
    pub fn diameters_from(&self, min_diameter_mm: u32) -> Vec<u32> {
        let mut d: Vec<u32> = self
            .diameters_mm
            .iter()
            .copied()
            .filter(|&d| d >= min_diameter_mm)
            .collect();
        d.sort_unstable();
        d
    }

    /// Spacings inside [s_min, s_max], widest first
    pub fn spacings_within(&self, s_min_mm: f64, s_max_mm: f64) -> Vec<u32> {
        let mut s: Vec<u32> = self
            .spacings_mm
            .iter()
            .copied()
            .filter(|&s| s as f64 >= s_min_mm && s as f64 <= s_max_mm)
            .collect();
        s.sort_unstable_by(|a, b| b.cmp(a));
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_area() {
        // Ø10 = 78.54 mm²
        assert!((bar_area_mm2(10) - 78.54).abs() < 0.01);
    }

    #[test]
    fn test_area_per_meter() {
        // Ø10/150 = 523.6 mm²/m
        assert!((area_per_meter(10, 150) - 523.6).abs() < 0.1);
        // Ø8/200 = 251.3 mm²/m
        assert!((area_per_meter(8, 200) - 251.3).abs() < 0.1);
    }

    #[test]
    fn test_spacings_within() {
        let catalog = RebarCatalog::default();
        let s = catalog.spacings_within(70.0, 180.0);
        assert_eq!(s.first(), Some(&180));
        assert_eq!(s.last(), Some(&70));
        assert!(s.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_diameters_from() {
        let catalog = RebarCatalog::default();
        assert_eq!(catalog.diameters_from(8).first(), Some(&8));
        assert!(!catalog.diameters_from(8).contains(&6));
    }
}
