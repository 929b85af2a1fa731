//! # Slab Classification
//!
//! Decides how a panel carries load and which boundary case applies.
//!
//! ## Rules
//!
//! - `m = Llong / Lshort` on gross spans
//! - `m > 2` → one-way, `m ≤ 2` → two-way (m = 2 is two-way)
//! - Two-way panels map their four edge flags to one of seven support
//!   conditions through an explicit 16-row table
//! - One-way strips span the short direction; the number of continuous
//!   long edges gives the span position
//!
//! ## Support Conditions (TS500 Table 11.1)
//!
//! | Case | Discontinuous edges           |
//! |------|-------------------------------|
//! | 1    | none                          |
//! | 2    | one                           |
//! | 3    | two adjacent                  |
//! | 4    | both short edges              |
//! | 5    | both long edges               |
//! | 6    | three                         |
//! | 7    | all four                      |

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::panel::{PanelGeometry, SlabPanel};
use crate::ts500::ONE_WAY_SPAN_RATIO;

/// Static behaviour of a slab panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlabType {
    OneWay,
    TwoWay,
}

impl SlabType {
    /// Classify from m = Llong / Lshort
    pub fn from_span_ratio(m: f64) -> Self {
        if m > ONE_WAY_SPAN_RATIO {
            SlabType::OneWay
        } else {
            SlabType::TwoWay
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SlabType::OneWay => "One-way",
            SlabType::TwoWay => "Two-way",
        }
    }
}

impl std::fmt::Display for SlabType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Two-way support conditions
// ============================================================================

/// Boundary case of a two-way panel, the discrete key of the coefficient table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportCondition {
    AllContinuous,
    OneEdgeDiscontinuous,
    TwoAdjacentDiscontinuous,
    TwoShortDiscontinuous,
    TwoLongDiscontinuous,
    ThreeDiscontinuous,
    AllDiscontinuous,
}

impl SupportCondition {
    pub const ALL: [SupportCondition; 7] = [
        SupportCondition::AllContinuous,
        SupportCondition::OneEdgeDiscontinuous,
        SupportCondition::TwoAdjacentDiscontinuous,
        SupportCondition::TwoShortDiscontinuous,
        SupportCondition::TwoLongDiscontinuous,
        SupportCondition::ThreeDiscontinuous,
        SupportCondition::AllDiscontinuous,
    ];

    /// Label used in the two-way coefficient table
    pub fn table_key(&self) -> &'static str {
        match self {
            SupportCondition::AllContinuous => "AllContinuous",
            SupportCondition::OneEdgeDiscontinuous => "OneEdgeDiscontinuous",
            SupportCondition::TwoAdjacentDiscontinuous => "TwoAdjacentDiscontinuous",
            SupportCondition::TwoShortDiscontinuous => "TwoShortDiscontinuous",
            SupportCondition::TwoLongDiscontinuous => "TwoLongDiscontinuous",
            SupportCondition::ThreeDiscontinuous => "ThreeDiscontinuous",
            SupportCondition::AllDiscontinuous => "AllDiscontinuous",
        }
    }

    /// Case number as printed in the code table (1-7)
    pub fn case_number(&self) -> u8 {
        match self {
            SupportCondition::AllContinuous => 1,
            SupportCondition::OneEdgeDiscontinuous => 2,
            SupportCondition::TwoAdjacentDiscontinuous => 3,
            SupportCondition::TwoShortDiscontinuous => 4,
            SupportCondition::TwoLongDiscontinuous => 5,
            SupportCondition::ThreeDiscontinuous => 6,
            SupportCondition::AllDiscontinuous => 7,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SupportCondition::AllContinuous => "All edges continuous",
            SupportCondition::OneEdgeDiscontinuous => "One edge discontinuous",
            SupportCondition::TwoAdjacentDiscontinuous => "Two adjacent edges discontinuous",
            SupportCondition::TwoShortDiscontinuous => "Both short edges discontinuous",
            SupportCondition::TwoLongDiscontinuous => "Both long edges discontinuous",
            SupportCondition::ThreeDiscontinuous => "Three edges discontinuous",
            SupportCondition::AllDiscontinuous => "All edges discontinuous",
        }
    }
}

impl std::fmt::Display for SupportCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Case {}: {}", self.case_number(), self.display_name())
    }
}

/// Continuity flags of a normalized panel (true = continuous)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgePattern {
    pub short_a: bool,
    pub short_b: bool,
    pub long_a: bool,
    pub long_b: bool,
}

impl EdgePattern {
    pub const fn new(short_a: bool, short_b: bool, long_a: bool, long_b: bool) -> Self {
        EdgePattern {
            short_a,
            short_b,
            long_a,
            long_b,
        }
    }

    pub fn from_geometry(geometry: &PanelGeometry) -> Self {
        EdgePattern {
            short_a: geometry.short_edges[0].is_continuous(),
            short_b: geometry.short_edges[1].is_continuous(),
            long_a: geometry.long_edges[0].is_continuous(),
            long_b: geometry.long_edges[1].is_continuous(),
        }
    }

    /// All 16 flag combinations
    pub fn all() -> Vec<EdgePattern> {
        (0u8..16)
            .map(|bits| {
                EdgePattern::new(bits & 8 != 0, bits & 4 != 0, bits & 2 != 0, bits & 1 != 0)
            })
            .collect()
    }
}

impl std::fmt::Display for EdgePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = |c: bool| if c { 'C' } else { 'D' };
        write!(
            f,
            "short[{}{}] long[{}{}]",
            flag(self.short_a),
            flag(self.short_b),
            flag(self.long_a),
            flag(self.long_b)
        )
    }
}

/// Edge pattern → support condition mapping.
///
/// Entries are searched in order and the first match wins, so a custom
/// map with repeated patterns still resolves deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportConditionMap {
    pub entries: Vec<(EdgePattern, SupportCondition)>,
}

impl Default for SupportConditionMap {
    fn default() -> Self {
        SupportConditionMap::standard()
    }
}

impl SupportConditionMap {
    /// The TS500 Table 11.1 mapping, one row per flag combination
    pub fn standard() -> Self {
        use SupportCondition::*;
        const C: bool = true;
        const D: bool = false;

        let entries = vec![
            //             short_a short_b long_a long_b
            (EdgePattern::new(C, C, C, C), AllContinuous),
            (EdgePattern::new(D, C, C, C), OneEdgeDiscontinuous),
            (EdgePattern::new(C, D, C, C), OneEdgeDiscontinuous),
            (EdgePattern::new(C, C, D, C), OneEdgeDiscontinuous),
            (EdgePattern::new(C, C, C, D), OneEdgeDiscontinuous),
            (EdgePattern::new(D, C, D, C), TwoAdjacentDiscontinuous),
            (EdgePattern::new(D, C, C, D), TwoAdjacentDiscontinuous),
            (EdgePattern::new(C, D, D, C), TwoAdjacentDiscontinuous),
            (EdgePattern::new(C, D, C, D), TwoAdjacentDiscontinuous),
            (EdgePattern::new(D, D, C, C), TwoShortDiscontinuous),
            (EdgePattern::new(C, C, D, D), TwoLongDiscontinuous),
            (EdgePattern::new(C, D, D, D), ThreeDiscontinuous),
            (EdgePattern::new(D, C, D, D), ThreeDiscontinuous),
            (EdgePattern::new(D, D, C, D), ThreeDiscontinuous),
            (EdgePattern::new(D, D, D, C), ThreeDiscontinuous),
            (EdgePattern::new(D, D, D, D), AllDiscontinuous),
        ];
        SupportConditionMap { entries }
    }

    /// Resolve a pattern; an unmapped pattern is a classification error
    pub fn resolve(&self, pattern: EdgePattern) -> CalcResult<SupportCondition> {
        self.entries
            .iter()
            .find(|(p, _)| *p == pattern)
            .map(|(_, condition)| *condition)
            .ok_or_else(|| {
                CalcError::classification(format!(
                    "No support condition mapped for edge pattern {}",
                    pattern
                ))
            })
    }

    /// True when every one of the 16 patterns has an entry
    pub fn is_total(&self) -> bool {
        EdgePattern::all()
            .iter()
            .all(|p| self.entries.iter().any(|(q, _)| q == p))
    }
}

// ============================================================================
// One-way span position
// ============================================================================

/// Position of a one-way strip within a continuous run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanPosition {
    /// Both supports discontinuous
    SimpleSpan,
    /// One continuous support
    EndSpan,
    /// Both supports continuous
    InteriorSpan,
}

impl SpanPosition {
    pub const ALL: [SpanPosition; 3] = [
        SpanPosition::SimpleSpan,
        SpanPosition::EndSpan,
        SpanPosition::InteriorSpan,
    ];

    /// From the number of continuous long edges (the strip's supports)
    pub fn from_continuous_supports(count: usize) -> Self {
        match count {
            0 => SpanPosition::SimpleSpan,
            1 => SpanPosition::EndSpan,
            _ => SpanPosition::InteriorSpan,
        }
    }

    /// Label used in the one-way coefficient table
    pub fn table_key(&self) -> &'static str {
        match self {
            SpanPosition::SimpleSpan => "SimpleSpan",
            SpanPosition::EndSpan => "EndSpan",
            SpanPosition::InteriorSpan => "InteriorSpan",
        }
    }

    /// Continuous over at least one support
    pub fn is_continuous(&self) -> bool {
        !matches!(self, SpanPosition::SimpleSpan)
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Output of the classification stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub slab_type: SlabType,
    /// m = Llong / Lshort (gross spans)
    pub m: f64,
    /// Two-way only
    pub support_condition: Option<SupportCondition>,
    /// One-way only
    pub span_position: Option<SpanPosition>,
    /// Continuous edge length / perimeter
    pub alpha_s: f64,
    pub geometry: PanelGeometry,
}

/// Classify a panel. Pure; no table access.
pub fn classify(panel: &SlabPanel, map: &SupportConditionMap) -> CalcResult<Classification> {
    let geometry = panel.geometry()?;
    let m = geometry.span_ratio();
    let slab_type = SlabType::from_span_ratio(m);
    let alpha_s = geometry.continuity_ratio();

    let (support_condition, span_position) = match slab_type {
        SlabType::TwoWay => (Some(map.resolve(EdgePattern::from_geometry(&geometry))?), None),
        SlabType::OneWay => (
            None,
            Some(SpanPosition::from_continuous_supports(geometry.continuous_long_edges())),
        ),
    };

    Ok(Classification {
        slab_type,
        m,
        support_condition,
        span_position,
        alpha_s,
        geometry,
    })
}
