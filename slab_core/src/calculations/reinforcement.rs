//! # Required Reinforcement (K → ks method)
//!
//! ## Formulas
//!
//! ```text
//! d  = h - cover                      [mm]
//! K  = b d² / Md × 10⁴                [cm²/kN], b = 1.0 m, d in m
//! ks = table(concrete, steel, K)      [mm²/kN]
//! As = ks × Md / d                    [mm²/m], d in m
//! ```
//!
//! Small K means a heavily stressed section. The K→ks table stops at the
//! balanced limit, so a K below its range is an `OutOfRange` failure: the
//! slab is too thin for the moment, not a case to clamp.
//!
//! ## Example
//!
//! ```rust
//! use slab_core::calculations::reinforcement::section_constant;
//!
//! // d = 100 mm, Md = 10 kNm/m -> K = 10 cm²/kN
//! let k = section_constant(100.0, 10.0).unwrap();
//! assert!((k - 10.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use super::moments::DesignMoment;
use super::coefficients::MomentPosition;
use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialGrade;
use crate::tables::{CodeTable, TableKey};
use crate::ts500::STRIP_WIDTH_M;

/// Required steel at one moment position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDesign {
    pub position: MomentPosition,
    /// Md (kNm/m)
    pub md_knm_per_m: f64,
    /// Effective depth (mm)
    pub d_mm: f64,
    /// Section constant K (cm²/kN)
    pub k: f64,
    /// ks (mm²/kN)
    pub ks: f64,
    /// Required area before minimum rules (mm²/m)
    pub as_required_mm2_per_m: f64,
    pub table: String,
    pub version: String,
    pub clamped: bool,
}

/// d = h - cover (mm)
pub fn effective_depth(h_mm: f64, cover_mm: f64) -> CalcResult<f64> {
    let d = h_mm - cover_mm;
    if !d.is_finite() || d <= 0.0 {
        return Err(CalcError::invalid_geometry(
            "d_mm",
            d.to_string(),
            format!("Cover {} mm leaves no effective depth in a {} mm slab", cover_mm, h_mm),
        ));
    }
    Ok(d)
}

/// K = b d² / Md in cm²/kN
pub fn section_constant(d_mm: f64, md_knm_per_m: f64) -> CalcResult<f64> {
    if !md_knm_per_m.is_finite() || md_knm_per_m <= 0.0 {
        return Err(CalcError::division_by_zero(
            "K",
            format!("Design moment Md = {} kNm/m must be positive", md_knm_per_m),
        ));
    }
    let d_m = d_mm / 1000.0;
    Ok(STRIP_WIDTH_M * d_m * d_m / md_knm_per_m * 1.0e4)
}

/// Required steel for one design moment
pub fn design_section(
    moment: &DesignMoment,
    d_mm: f64,
    grade: &MaterialGrade,
    k_to_ks: &CodeTable,
) -> CalcResult<SectionDesign> {
    let k = section_constant(d_mm, moment.md_knm_per_m)?;
    let hit = k_to_ks.lookup(&TableKey::new(grade.table_key()).at(k))?;
    let as_required = hit.value * moment.md_knm_per_m / (d_mm / 1000.0);

    Ok(SectionDesign {
        position: moment.position,
        md_knm_per_m: moment.md_knm_per_m,
        d_mm,
        k,
        ks: hit.value,
        as_required_mm2_per_m: as_required,
        table: k_to_ks.name().to_string(),
        version: k_to_ks.version().to_string(),
        clamped: hit.clamped,
    })
}

/// Required steel for every design moment
pub fn design_reinforcement(
    moments: &[DesignMoment],
    h_mm: f64,
    cover_mm: f64,
    grade: &MaterialGrade,
    k_to_ks: &CodeTable,
) -> CalcResult<Vec<SectionDesign>> {
    let d = effective_depth(h_mm, cover_mm)?;
    moments.iter().map(|m| design_section(m, d, grade, k_to_ks)).collect()
}
