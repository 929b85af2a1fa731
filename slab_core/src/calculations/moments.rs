//! # Design Moments
//!
//! ```text
//! Md = α × pd × Lsn²      [kNm/m]
//! ```
//!
//! One design moment per resolved coefficient, each tagged with the α, pd
//! and span that produced it.

use serde::{Deserialize, Serialize};

use super::coefficients::{MomentPosition, ResolvedCoefficient};
use crate::errors::{CalcError, CalcResult};

/// Design moment per metre width at one position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignMoment {
    pub position: MomentPosition,
    pub alpha: f64,
    /// Factored load (kN/m²)
    pub pd_kn_m2: f64,
    /// Net short span used (m)
    pub lsn_m: f64,
    /// Md (kNm/m)
    pub md_knm_per_m: f64,
}

/// Md for every coefficient.
pub fn compute_moments(
    coefficients: &[ResolvedCoefficient],
    pd_kn_m2: f64,
    lsn_m: f64,
) -> CalcResult<Vec<DesignMoment>> {
    if !lsn_m.is_finite() || lsn_m <= 0.0 {
        return Err(CalcError::invalid_geometry(
            "lsn_m",
            lsn_m.to_string(),
            "Net short span must be positive",
        ));
    }
    if !pd_kn_m2.is_finite() || pd_kn_m2 < 0.0 {
        return Err(CalcError::invalid_load(
            "pd_kn_m2",
            pd_kn_m2.to_string(),
            "Design load must be finite and non-negative",
        ));
    }

    Ok(coefficients
        .iter()
        .map(|c| DesignMoment {
            position: c.position,
            alpha: c.alpha,
            pd_kn_m2,
            lsn_m,
            md_knm_per_m: c.alpha * pd_kn_m2 * lsn_m * lsn_m,
        })
        .collect())
}
