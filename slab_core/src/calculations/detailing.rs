//! # Detailing: Minimum Steel, Distribution Steel, Bar Spacing
//!
//! ## Minimum Reinforcement
//!
//! ```text
//! One-way (each main position):  As ≥ ρmin b d,  ρmin = 0.002 (S420, B500), 0.003 (S220)
//! Two-way bottom:                ρx + ρy ≥ 0.0035 (deficit added to the weaker direction)
//! Two-way top:                   As ≥ 0.002 b d
//! ```
//!
//! An area below its minimum is raised to exactly the minimum and the raise
//! is recorded in [`ReinforcementDesign::applied_minimums`].
//!
//! ## Distribution Steel
//!
//! `As_dist = As_main / 5`, always computed. One-way slabs get a separate
//! long-direction layer; in two-way slabs the long-direction bottom steel
//! is raised to at least this area.
//!
//! ## Spacing
//!
//! ```text
//! main and top bars, both directions:  s ≤ min(1.5 h, 200 mm)
//! one-way distribution layer:          s ≤ 300 mm
//! ```
//!
//! For each catalog diameter the widest standard spacing that covers the
//! area is taken; the diameter with the least excess area wins, ties to
//! the smaller bar. No compliant pair fails with `NoCompliantSpacing`.

use serde::{Deserialize, Serialize};

use super::classifier::SlabType;
use super::coefficients::{Direction, MomentPosition};
use super::reinforcement::SectionDesign;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{area_per_meter, MaterialGrade, RebarCatalog};
use crate::project::{BarArrangement, DesignSettings};
use crate::ts500::{self, ts500_ref, STRIP_WIDTH_M};

// ============================================================================
// Bar selection
// ============================================================================

/// How the chosen bars are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarLayout {
    /// One layer of straight bars at `spacing_mm`
    Single,
    /// Straight and bent bars alternating, each set at `spacing_mm`
    StraightAndBent,
}

/// A chosen bar diameter and spacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarSelection {
    pub diameter_mm: u32,
    /// Spacing of each bar set (mm)
    pub spacing_mm: u32,
    pub layout: BarLayout,
    /// Area provided by all sets together (mm²/m)
    pub as_provided_mm2_per_m: f64,
}

impl BarSelection {
    /// Label such as "Ø10/150" or "Ø10/300 + Ø10/300 bent"
    pub fn label(&self) -> String {
        match self.layout {
            BarLayout::Single => format!("Ø{}/{}", self.diameter_mm, self.spacing_mm),
            BarLayout::StraightAndBent => format!(
                "Ø{d}/{s} + Ø{d}/{s} bent",
                d = self.diameter_mm,
                s = self.spacing_mm
            ),
        }
    }
}

impl std::fmt::Display for BarSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Limits for one bar selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingLimits {
    pub s_min_mm: f64,
    pub s_max_mm: f64,
    pub min_diameter_mm: u32,
}

/// Choose bars providing at least `as_required` (mm²/m).
pub fn select_bars(
    as_required: f64,
    limits: SpacingLimits,
    layout: BarLayout,
    catalog: &RebarCatalog,
) -> CalcResult<BarSelection> {
    let sets = match layout {
        BarLayout::Single => 1.0,
        BarLayout::StraightAndBent => 2.0,
    };
    let per_set = as_required.max(0.0) / sets;
    let spacings = catalog.spacings_within(limits.s_min_mm, limits.s_max_mm);

    let mut best: Option<(f64, BarSelection)> = None;
    for diameter in catalog.diameters_from(limits.min_diameter_mm) {
        // widest spacing that still covers the demand
        let Some(&spacing) = spacings
            .iter()
            .find(|&&s| area_per_meter(diameter, s) >= per_set)
        else {
            continue;
        };
        let provided = area_per_meter(diameter, spacing) * sets;
        let excess = if as_required > 0.0 { provided / as_required } else { provided };
        if best.as_ref().map_or(true, |(e, _)| excess < *e) {
            best = Some((
                excess,
                BarSelection {
                    diameter_mm: diameter,
                    spacing_mm: spacing,
                    layout,
                    as_provided_mm2_per_m: provided,
                },
            ));
        }
    }

    best.map(|(_, selection)| selection).ok_or(CalcError::NoCompliantSpacing {
        as_required_mm2_per_m: as_required,
        s_max_mm: limits.s_max_mm,
    })
}

// ============================================================================
// Results
// ============================================================================

/// Minimum rule that raised an area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinimumRule {
    OneWayRatio,
    TwoWayCombinedRatio,
    TwoWayTopRatio,
    Distribution,
}

impl MinimumRule {
    pub fn clause(&self) -> &'static str {
        match self {
            MinimumRule::OneWayRatio => ts500_ref::ONE_WAY_MIN_STEEL,
            MinimumRule::TwoWayCombinedRatio | MinimumRule::TwoWayTopRatio => {
                ts500_ref::TWO_WAY_MIN_STEEL
            }
            MinimumRule::Distribution => ts500_ref::DISTRIBUTION_STEEL,
        }
    }
}

/// Record of an area raised to a minimum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedMinimum {
    /// `None` for the one-way distribution layer
    pub position: Option<MomentPosition>,
    pub rule: MinimumRule,
    pub from_mm2_per_m: f64,
    pub to_mm2_per_m: f64,
}

/// Final steel at one moment position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedPosition {
    pub section: SectionDesign,
    /// Area after minimum rules (mm²/m)
    pub as_design_mm2_per_m: f64,
    pub s_max_mm: f64,
    pub bars: BarSelection,
}

impl DetailedPosition {
    pub fn position(&self) -> MomentPosition {
        self.section.position
    }
}

/// Separate long-direction layer of a one-way slab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionLayer {
    pub as_design_mm2_per_m: f64,
    pub s_max_mm: f64,
    pub bars: BarSelection,
}

/// Final reinforcement of a panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementDesign {
    pub d_mm: f64,
    pub positions: Vec<DetailedPosition>,
    /// One-way slabs only
    pub distribution: Option<DistributionLayer>,
    /// As_main / 5 (mm²/m)
    pub secondary_as_mm2_per_m: f64,
    pub applied_minimums: Vec<AppliedMinimum>,
    /// Every area meets its minimum and is covered by the chosen bars
    pub min_reinforcement_satisfied: bool,
    /// Every emitted spacing is within its cap
    pub spacing_satisfied: bool,
}

impl ReinforcementDesign {
    pub fn get(&self, position: MomentPosition) -> Option<&DetailedPosition> {
        self.positions.iter().find(|p| p.position() == position)
    }

    pub fn raised(&self) -> bool {
        !self.applied_minimums.is_empty()
    }
}

// ============================================================================
// Detailing
// ============================================================================

struct Working {
    section: SectionDesign,
    as_mm2: f64,
}

/// Apply minimum, distribution and spacing rules to the required areas.
pub fn detail(
    slab_type: SlabType,
    sections: &[SectionDesign],
    h_mm: f64,
    d_mm: f64,
    grade: &MaterialGrade,
    settings: &DesignSettings,
) -> CalcResult<ReinforcementDesign> {
    let bd = STRIP_WIDTH_M * 1000.0 * d_mm;
    let mut work: Vec<Working> = sections
        .iter()
        .map(|s| Working {
            section: s.clone(),
            as_mm2: s.as_required_mm2_per_m,
        })
        .collect();
    let mut applied = Vec::new();

    // governing short-direction bottom steel
    let main_as = |work: &[Working]| {
        work.iter()
            .filter(|w| w.section.position.direction() == Direction::Short)
            .filter(|w| !w.section.position.is_negative())
            .map(|w| w.as_mm2)
            .fold(0.0_f64, f64::max)
    };

    let secondary;
    let mut combined_unmet = false;
    match slab_type {
        SlabType::OneWay => {
            let as_min = grade.steel.one_way_min_ratio() * bd;
            for w in work.iter_mut() {
                raise(&mut applied, w, as_min, MinimumRule::OneWayRatio);
            }
            secondary = main_as(&work) * ts500::DISTRIBUTION_FRACTION;
        }
        SlabType::TwoWay => {
            secondary = main_as(&work) * ts500::DISTRIBUTION_FRACTION;
            if let Some(w) = find(&mut work, MomentPosition::LongPositive) {
                raise(&mut applied, w, secondary, MinimumRule::Distribution);
            }

            let combined_min = ts500::TWO_WAY_MIN_COMBINED_RATIO * bd;
            let short = find_as(&work, MomentPosition::ShortPositive);
            let long = find_as(&work, MomentPosition::LongPositive);
            let total = short + long;
            if total < combined_min {
                let (weaker, stronger) = if long <= short {
                    (MomentPosition::LongPositive, MomentPosition::ShortPositive)
                } else {
                    (MomentPosition::ShortPositive, MomentPosition::LongPositive)
                };
                // a direction without a section cannot carry the deficit
                let target = if has_position(&work, weaker) { weaker } else { stronger };
                match find(&mut work, target) {
                    Some(w) => {
                        let raised_to = w.as_mm2 + (combined_min - total);
                        raise(&mut applied, w, raised_to, MinimumRule::TwoWayCombinedRatio);
                    }
                    None => combined_unmet = true,
                }
            }

            let top_min = ts500::TWO_WAY_MIN_TOP_RATIO * bd;
            for w in work.iter_mut().filter(|w| w.section.position.is_negative()) {
                raise(&mut applied, w, top_min, MinimumRule::TwoWayTopRatio);
            }
        }
    }

    let s_max = settings
        .max_spacing_main_mm
        .min(settings.spacing_thickness_factor * h_mm);

    let mut positions = Vec::with_capacity(work.len());
    for w in work {
        let position = w.section.position;
        let layout = if position.is_negative() {
            BarLayout::Single
        } else {
            match settings.bottom_arrangement {
                BarArrangement::Straight => BarLayout::Single,
                BarArrangement::StraightAndBent => BarLayout::StraightAndBent,
            }
        };
        let limits = SpacingLimits {
            s_min_mm: settings.min_spacing_mm,
            s_max_mm: s_max,
            min_diameter_mm: settings.min_main_diameter_mm,
        };
        let bars = select_bars(w.as_mm2, limits, layout, &settings.catalog)?;
        positions.push(DetailedPosition {
            section: w.section,
            as_design_mm2_per_m: w.as_mm2,
            s_max_mm: s_max,
            bars,
        });
    }

    let distribution = match slab_type {
        SlabType::OneWay => {
            let limits = SpacingLimits {
                s_min_mm: settings.min_spacing_mm,
                s_max_mm: settings.max_spacing_distribution_mm,
                min_diameter_mm: settings.min_distribution_diameter_mm,
            };
            let bars = select_bars(secondary, limits, BarLayout::Single, &settings.catalog)?;
            Some(DistributionLayer {
                as_design_mm2_per_m: secondary,
                s_max_mm: limits.s_max_mm,
                bars,
            })
        }
        SlabType::TwoWay => None,
    };

    let min_reinforcement_satisfied = !combined_unmet
        && positions.iter().all(|p| {
            p.as_design_mm2_per_m >= p.section.as_required_mm2_per_m
                && p.bars.as_provided_mm2_per_m >= p.as_design_mm2_per_m
        })
        && distribution
            .as_ref()
            .map_or(true, |d| d.bars.as_provided_mm2_per_m >= d.as_design_mm2_per_m);
    let spacing_satisfied = positions.iter().all(|p| p.bars.spacing_mm as f64 <= p.s_max_mm)
        && distribution
            .as_ref()
            .map_or(true, |d| d.bars.spacing_mm as f64 <= d.s_max_mm);

    Ok(ReinforcementDesign {
        d_mm,
        positions,
        distribution,
        secondary_as_mm2_per_m: secondary,
        applied_minimums: applied,
        min_reinforcement_satisfied,
        spacing_satisfied,
    })
}

fn raise(applied: &mut Vec<AppliedMinimum>, w: &mut Working, minimum: f64, rule: MinimumRule) {
    if w.as_mm2 < minimum {
        applied.push(AppliedMinimum {
            position: Some(w.section.position),
            rule,
            from_mm2_per_m: w.as_mm2,
            to_mm2_per_m: minimum,
        });
        w.as_mm2 = minimum;
    }
}

fn find(work: &mut [Working], position: MomentPosition) -> Option<&mut Working> {
    work.iter_mut().find(|w| w.section.position == position)
}

fn has_position(work: &[Working], position: MomentPosition) -> bool {
    work.iter().any(|w| w.section.position == position)
}

fn find_as(work: &[Working], position: MomentPosition) -> f64 {
    work.iter()
        .find(|w| w.section.position == position)
        .map_or(0.0, |w| w.as_mm2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{ConcreteClass, SteelClass};
    use approx::assert_relative_eq;

    fn section(position: MomentPosition, as_required: f64) -> SectionDesign {
        SectionDesign {
            position,
            md_knm_per_m: 5.0,
            d_mm: 100.0,
            k: 20.0,
            ks: 2.8,
            as_required_mm2_per_m: as_required,
            table: "k-to-ks".to_string(),
            version: "v".to_string(),
            clamped: false,
        }
    }

    fn grade() -> MaterialGrade {
        MaterialGrade::new(ConcreteClass::C30, SteelClass::S420)
    }

    fn design(
        slab_type: SlabType,
        sections: &[SectionDesign],
        h: f64,
        d: f64,
    ) -> CalcResult<ReinforcementDesign> {
        detail(slab_type, sections, h, d, &grade(), &DesignSettings::default())
    }

    fn limits(s_max: f64) -> SpacingLimits {
        SpacingLimits {
            s_min_mm: 70.0,
            s_max_mm: s_max,
            min_diameter_mm: 8,
        }
    }

    #[test]
    fn test_select_single() {
        let catalog = RebarCatalog::default();
        let bars = select_bars(500.0, limits(180.0), BarLayout::Single, &catalog).unwrap();
        assert!(bars.as_provided_mm2_per_m >= 500.0);
        assert!(bars.spacing_mm <= 180 && bars.spacing_mm >= 70);
        assert!(bars.diameter_mm >= 8);
    }

    #[test]
    fn test_select_least_excess() {
        let catalog = RebarCatalog::default();
        // Ø10/150 = 523.6 is the tightest fit for 520
        let bars = select_bars(520.0, limits(200.0), BarLayout::Single, &catalog).unwrap();
        assert!(bars.as_provided_mm2_per_m >= 520.0);
        let excess = bars.as_provided_mm2_per_m / 520.0;
        assert!(excess < 1.01, "{} gives {}", bars, excess);
    }

    #[test]
    fn test_select_straight_and_bent() {
        let catalog = RebarCatalog::default();
        let bars = select_bars(400.0, limits(180.0), BarLayout::StraightAndBent, &catalog).unwrap();
        assert_eq!(bars.layout, BarLayout::StraightAndBent);
        assert_relative_eq!(
            bars.as_provided_mm2_per_m,
            2.0 * area_per_meter(bars.diameter_mm, bars.spacing_mm),
            epsilon = 1e-9
        );
        assert!(bars.as_provided_mm2_per_m >= 400.0);
        assert!(bars.label().contains("bent"));
    }

    #[test]
    fn test_no_compliant_spacing() {
        let catalog = RebarCatalog::default();
        // Ø20/70 = 4488 mm²/m is the catalog maximum
        let err = select_bars(6000.0, limits(180.0), BarLayout::Single, &catalog).unwrap_err();
        assert_eq!(err.error_code(), "NO_COMPLIANT_SPACING");
        // cap below the smallest catalog spacing
        let err = select_bars(100.0, limits(60.0), BarLayout::Single, &catalog).unwrap_err();
        assert!(matches!(err, CalcError::NoCompliantSpacing { s_max_mm, .. } if s_max_mm == 60.0));
    }

    #[test]
    fn test_one_way_minimum_raised_exactly() {
        let sections = [section(MomentPosition::ShortPositive, 50.0)];
        let r = design(SlabType::OneWay, &sections, 120.0, 100.0).unwrap();
        let p = r.get(MomentPosition::ShortPositive).unwrap();
        // 0.002 × 1000 × 100
        assert_eq!(p.as_design_mm2_per_m, 0.002 * 1000.0 * 100.0);
        assert_eq!(r.applied_minimums.len(), 1);
        assert_eq!(r.applied_minimums[0].rule, MinimumRule::OneWayRatio);
        assert_eq!(r.applied_minimums[0].from_mm2_per_m, 50.0);
        assert!(r.min_reinforcement_satisfied);
    }

    #[test]
    fn test_one_way_s220_minimum() {
        let g = MaterialGrade::new(ConcreteClass::C25, SteelClass::S220);
        let sections = [section(MomentPosition::ShortPositive, 50.0)];
        let settings = DesignSettings::default();
        let r = detail(SlabType::OneWay, &sections, 120.0, 100.0, &g, &settings).unwrap();
        assert_eq!(r.positions[0].as_design_mm2_per_m, 0.003 * 1000.0 * 100.0);
    }

    #[test]
    fn test_one_way_above_minimum_untouched() {
        let sections = [section(MomentPosition::ShortPositive, 450.0)];
        let r = design(SlabType::OneWay, &sections, 120.0, 100.0).unwrap();
        assert_eq!(r.positions[0].as_design_mm2_per_m, 450.0);
        assert!(!r.raised());
    }

    #[test]
    fn test_one_way_distribution_layer() {
        let sections = [
            section(MomentPosition::ShortPositive, 450.0),
            section(MomentPosition::ShortNegative, 500.0),
        ];
        let r = design(SlabType::OneWay, &sections, 120.0, 100.0).unwrap();
        // bottom main steel governs; the heavier top bars do not
        assert_relative_eq!(r.secondary_as_mm2_per_m, 90.0, epsilon = 1e-9);
        let dist = r.distribution.unwrap();
        assert!(dist.bars.as_provided_mm2_per_m >= 90.0);
        assert!(dist.bars.spacing_mm <= 300);
        assert!(dist.bars.diameter_mm >= 6);
    }

    #[test]
    fn test_two_way_combined_minimum() {
        // 150 + 100 < 0.0035 × 1000 × 100 = 350
        let sections = [
            section(MomentPosition::ShortPositive, 150.0),
            section(MomentPosition::LongPositive, 100.0),
        ];
        let r = design(SlabType::TwoWay, &sections, 120.0, 100.0).unwrap();
        let short = r.get(MomentPosition::ShortPositive).unwrap().as_design_mm2_per_m;
        let long = r.get(MomentPosition::LongPositive).unwrap().as_design_mm2_per_m;
        assert_eq!(short, 150.0);
        assert_relative_eq!(short + long, 350.0, epsilon = 1e-9);
        assert!(r.applied_minimums.iter().any(|a| {
            a.rule == MinimumRule::TwoWayCombinedRatio
                && a.position == Some(MomentPosition::LongPositive)
        }));
        assert!(r.distribution.is_none());
    }

    #[test]
    fn test_two_way_combined_minimum_without_long_section() {
        // zero long-direction coefficient: the short bottom steel takes the deficit
        let sections = [section(MomentPosition::ShortPositive, 150.0)];
        let r = design(SlabType::TwoWay, &sections, 120.0, 100.0).unwrap();
        let short = r.get(MomentPosition::ShortPositive).unwrap();
        assert_relative_eq!(short.as_design_mm2_per_m, 350.0, epsilon = 1e-9);
        assert!(short.bars.as_provided_mm2_per_m >= 350.0);
        assert!(r.applied_minimums.iter().any(|a| {
            a.rule == MinimumRule::TwoWayCombinedRatio
                && a.position == Some(MomentPosition::ShortPositive)
        }));
        assert!(r.min_reinforcement_satisfied);
    }

    #[test]
    fn test_two_way_combined_minimum_without_bottom_sections() {
        let sections = [section(MomentPosition::ShortNegative, 300.0)];
        let r = design(SlabType::TwoWay, &sections, 120.0, 100.0).unwrap();
        assert!(!r.min_reinforcement_satisfied);
    }

    #[test]
    fn test_two_way_long_raised_to_distribution() {
        let sections = [
            section(MomentPosition::ShortPositive, 600.0),
            section(MomentPosition::LongPositive, 80.0),
        ];
        let r = design(SlabType::TwoWay, &sections, 120.0, 100.0).unwrap();
        let long = r.get(MomentPosition::LongPositive).unwrap();
        assert_relative_eq!(long.as_design_mm2_per_m, 120.0, epsilon = 1e-9);
    }

    #[test]
    fn test_two_way_top_minimum() {
        let sections = [
            section(MomentPosition::ShortPositive, 300.0),
            section(MomentPosition::ShortNegative, 120.0),
            section(MomentPosition::LongPositive, 200.0),
        ];
        let r = design(SlabType::TwoWay, &sections, 120.0, 100.0).unwrap();
        let top = r.get(MomentPosition::ShortNegative).unwrap();
        assert_eq!(top.as_design_mm2_per_m, 0.002 * 1000.0 * 100.0);
        assert_eq!(top.bars.layout, BarLayout::Single);
    }

    #[test]
    fn test_spacing_law() {
        let settings = DesignSettings::default();
        for h in [80.0, 100.0, 120.0, 150.0, 200.0] {
            let sections = [
                section(MomentPosition::ShortPositive, 400.0),
                section(MomentPosition::ShortNegative, 500.0),
                section(MomentPosition::LongPositive, 200.0),
            ];
            let r = detail(SlabType::TwoWay, &sections, h, h - 20.0, &grade(), &settings).unwrap();
            let cap = (1.5 * h).min(200.0);
            for p in &r.positions {
                assert!(p.bars.spacing_mm as f64 <= cap, "h = {}, {}", h, p.bars);
                assert_eq!(p.s_max_mm, cap);
            }
            assert!(r.spacing_satisfied);
        }
    }

    #[test]
    fn test_two_way_long_direction_capped_at_200() {
        // light long steel in a thick slab would fit Ø8/250 without the cap
        let sections = [
            section(MomentPosition::ShortPositive, 600.0),
            section(MomentPosition::LongPositive, 380.0),
        ];
        let r = design(SlabType::TwoWay, &sections, 200.0, 180.0).unwrap();
        for p in &r.positions {
            assert!(p.bars.spacing_mm <= 200, "{}", p.bars);
        }
        let long = r.get(MomentPosition::LongPositive).unwrap();
        assert_eq!(long.s_max_mm, 200.0);
        assert!(long.bars.as_provided_mm2_per_m >= long.as_design_mm2_per_m);
        assert!(r.spacing_satisfied);
    }

    #[test]
    fn test_straight_bars_setting() {
        let settings = DesignSettings {
            bottom_arrangement: BarArrangement::Straight,
            ..Default::default()
        };
        let sections = [section(MomentPosition::ShortPositive, 400.0)];
        let r = detail(SlabType::OneWay, &sections, 120.0, 100.0, &grade(), &settings).unwrap();
        assert_eq!(r.positions[0].bars.layout, BarLayout::Single);
    }

    #[test]
    fn test_spacing_failure_propagates() {
        let sections = [section(MomentPosition::ShortPositive, 9000.0)];
        let err = design(SlabType::OneWay, &sections, 120.0, 100.0).unwrap_err();
        assert!(matches!(err, CalcError::NoCompliantSpacing { .. }));
    }
}
