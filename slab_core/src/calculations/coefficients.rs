//! # Moment Coefficient Resolution
//!
//! Selects the moment coefficient α for every moment position of a panel.
//!
//! ## One-Way Slabs (TS500 11.2.1)
//!
//! Coefficients come from the one-way table keyed by span position. For a
//! strip continuous over at least one support the method only applies
//! when
//!
//! ```text
//! q / g ≤ 2.0
//! min(L, L_adj) / max(L, L_adj) ≥ 0.8   for every adjacent span
//! ```
//!
//! (limits read from the applicability table). Otherwise resolution fails
//! with `CoefficientMethodNotApplicable`. A simple span is statically
//! determinate and always resolves.
//!
//! ## Two-Way Slabs (TS500 Table 11.1)
//!
//! α is read from the two-way table at (support condition, position),
//! interpolated on m. Positions with α = 0 carry no moment and are dropped.

use log::debug;
use serde::{Deserialize, Serialize};

use super::classifier::{Classification, SlabType, SpanPosition, SupportCondition};
use crate::errors::{CalcError, CalcResult};
use crate::loads::FactoredLoad;
use crate::panel::SlabPanel;
use crate::tables::{CodeTable, TableKey, TableSet};

/// Direction a moment acts in (the span it bends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Short,
    Long,
}

/// Moment position within a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MomentPosition {
    /// Short-direction midspan (bottom bars)
    ShortPositive,
    /// Short-direction support, at continuous long edges (top bars)
    ShortNegative,
    /// Long-direction midspan (bottom bars)
    LongPositive,
    /// Long-direction support, at continuous short edges (top bars)
    LongNegative,
}

impl MomentPosition {
    pub const ALL: [MomentPosition; 4] = [
        MomentPosition::ShortPositive,
        MomentPosition::ShortNegative,
        MomentPosition::LongPositive,
        MomentPosition::LongNegative,
    ];

    /// Label used in the two-way coefficient table
    pub fn table_key(&self) -> &'static str {
        match self {
            MomentPosition::ShortPositive => "ShortPositive",
            MomentPosition::ShortNegative => "ShortNegative",
            MomentPosition::LongPositive => "LongPositive",
            MomentPosition::LongNegative => "LongNegative",
        }
    }

    /// Label used in the one-way coefficient table; one-way strips only
    /// bend in the short direction
    pub fn one_way_key(&self) -> Option<&'static str> {
        match self {
            MomentPosition::ShortPositive => Some("Positive"),
            MomentPosition::ShortNegative => Some("Negative"),
            MomentPosition::LongPositive | MomentPosition::LongNegative => None,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            MomentPosition::ShortPositive | MomentPosition::ShortNegative => Direction::Short,
            MomentPosition::LongPositive | MomentPosition::LongNegative => Direction::Long,
        }
    }

    /// Support moment (top bars)
    pub fn is_negative(&self) -> bool {
        matches!(self, MomentPosition::ShortNegative | MomentPosition::LongNegative)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MomentPosition::ShortPositive => "Short span, midspan",
            MomentPosition::ShortNegative => "Short span, support",
            MomentPosition::LongPositive => "Long span, midspan",
            MomentPosition::LongNegative => "Long span, support",
        }
    }
}

impl std::fmt::Display for MomentPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Keys of the one-way applicability table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OneWayLimit {
    MaxLiveToDeadRatio,
    MinAdjacentSpanRatio,
}

impl OneWayLimit {
    pub const ALL: [OneWayLimit; 2] = [
        OneWayLimit::MaxLiveToDeadRatio,
        OneWayLimit::MinAdjacentSpanRatio,
    ];

    pub fn table_key(&self) -> &'static str {
        match self {
            OneWayLimit::MaxLiveToDeadRatio => "MaxLiveToDeadRatio",
            OneWayLimit::MinAdjacentSpanRatio => "MinAdjacentSpanRatio",
        }
    }

    fn read(&self, table: &CodeTable) -> CalcResult<f64> {
        Ok(table.lookup(&TableKey::new([self.table_key()]))?.value)
    }
}

/// A coefficient and where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCoefficient {
    pub position: MomentPosition,
    pub alpha: f64,
    pub table: String,
    pub version: String,
    /// Lookup clamped on an extrapolable axis
    pub clamped: bool,
}

/// Evidence that the one-way coefficient method applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneWayApplicability {
    pub live_to_dead_ratio: f64,
    pub max_live_to_dead_ratio: f64,
    /// Worst neighbour ratio, `None` when no neighbours were given
    pub adjacent_span_ratio: Option<f64>,
    pub min_adjacent_span_ratio: f64,
}

/// Output of the coefficient stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientSet {
    pub coefficients: Vec<ResolvedCoefficient>,
    /// One-way continuous strips only
    pub applicability: Option<OneWayApplicability>,
}

/// Resolve α for every moment position of a classified panel.
pub fn resolve_coefficients(
    panel: &SlabPanel,
    classification: &Classification,
    load: &FactoredLoad,
    tables: &TableSet,
) -> CalcResult<CoefficientSet> {
    match classification.slab_type {
        SlabType::OneWay => {
            let span = classification
                .span_position
                .ok_or_else(|| CalcError::classification("One-way panel without a span position"))?;
            resolve_one_way(panel, classification, span, load, tables)
        }
        SlabType::TwoWay => {
            let condition = classification.support_condition.ok_or_else(|| {
                CalcError::classification("Two-way panel without a support condition")
            })?;
            resolve_two_way(condition, classification.m, tables)
        }
    }
}

fn resolve_one_way(
    panel: &SlabPanel,
    classification: &Classification,
    span: SpanPosition,
    load: &FactoredLoad,
    tables: &TableSet,
) -> CalcResult<CoefficientSet> {
    let applicability = if span.is_continuous() {
        Some(check_one_way_applicability(panel, classification, load, &tables.one_way_limits)?)
    } else {
        None
    };

    let table = &tables.one_way_coefficients;
    let mut coefficients = Vec::new();
    for position in MomentPosition::ALL {
        let Some(label) = position.one_way_key() else {
            continue;
        };
        let hit = table.lookup(&TableKey::new([span.table_key(), label]))?;
        push_nonzero(&mut coefficients, position, hit.value, hit.clamped, table);
    }

    Ok(CoefficientSet {
        coefficients,
        applicability,
    })
}

fn check_one_way_applicability(
    panel: &SlabPanel,
    classification: &Classification,
    load: &FactoredLoad,
    limits: &CodeTable,
) -> CalcResult<OneWayApplicability> {
    let max_ratio = OneWayLimit::MaxLiveToDeadRatio.read(limits)?;
    let min_adjacent = OneWayLimit::MinAdjacentSpanRatio.read(limits)?;

    let live_to_dead = load.live_to_dead_ratio();
    if live_to_dead > max_ratio {
        return Err(CalcError::not_applicable(format!(
            "q/g = {:.3} exceeds {:.2}; use an exact continuous-beam analysis",
            live_to_dead, max_ratio
        )));
    }

    let own = classification.geometry.l_short_m;
    let adjacent_ratio = panel
        .adjacent_spans_m
        .iter()
        .map(|&adj| own.min(adj) / own.max(adj))
        .fold(None, |worst: Option<f64>, r| Some(worst.map_or(r, |w| w.min(r))));

    if let Some(ratio) = adjacent_ratio {
        if ratio < min_adjacent {
            return Err(CalcError::not_applicable(format!(
                "Adjacent span ratio {:.3} is below {:.2}; use an exact continuous-beam analysis",
                ratio, min_adjacent
            )));
        }
    }

    Ok(OneWayApplicability {
        live_to_dead_ratio: live_to_dead,
        max_live_to_dead_ratio: max_ratio,
        adjacent_span_ratio: adjacent_ratio,
        min_adjacent_span_ratio: min_adjacent,
    })
}

fn resolve_two_way(
    condition: SupportCondition,
    m: f64,
    tables: &TableSet,
) -> CalcResult<CoefficientSet> {
    let table = &tables.two_way_coefficients;
    let mut coefficients = Vec::new();
    for position in MomentPosition::ALL {
        let key = TableKey::new([condition.table_key(), position.table_key()]).at(m);
        let hit = table.lookup(&key)?;
        push_nonzero(&mut coefficients, position, hit.value, hit.clamped, table);
    }
    Ok(CoefficientSet {
        coefficients,
        applicability: None,
    })
}

fn push_nonzero(
    out: &mut Vec<ResolvedCoefficient>,
    position: MomentPosition,
    alpha: f64,
    clamped: bool,
    table: &CodeTable,
) {
    if alpha == 0.0 {
        debug!("{}: α = 0 in '{}', no moment", position.table_key(), table.name());
        return;
    }
    out.push(ResolvedCoefficient {
        position,
        alpha,
        table: table.name().to_string(),
        version: table.version().to_string(),
        clamped,
    });
}
