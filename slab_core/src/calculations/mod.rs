//! # Slab Design Stages
//!
//! Each stage is a pure function from the previous stage's output to its
//! own, failing with a typed [`CalcError`](crate::errors::CalcError):
//!
//! - [`classifier`] - one-way/two-way, support condition, αs
//! - [`thickness`] - minimum thickness and override
//! - [`coefficients`] - moment coefficients from the code tables
//! - [`moments`] - Md = α pd Lsn²
//! - [`reinforcement`] - K, ks and required As
//! - [`detailing`] - minimum steel, distribution steel, bar spacing
//!
//! Loads are combined in [`crate::loads`]; the stages are chained by
//! [`crate::engine::DesignEngine`].

pub mod classifier;
pub mod coefficients;
pub mod detailing;
pub mod moments;
pub mod reinforcement;
pub mod thickness;

// Re-export commonly used types
pub use classifier::{
    classify, Classification, EdgePattern, SlabType, SpanPosition, SupportCondition,
    SupportConditionMap,
};
pub use coefficients::{
    resolve_coefficients, CoefficientSet, Direction, MomentPosition, OneWayApplicability,
    OneWayLimit, ResolvedCoefficient,
};
pub use detailing::{
    detail, select_bars, AppliedMinimum, BarLayout, BarSelection, DetailedPosition,
    DistributionLayer, MinimumRule, ReinforcementDesign, SpacingLimits,
};
pub use moments::{compute_moments, DesignMoment};
pub use reinforcement::{
    design_reinforcement, design_section, effective_depth, section_constant, SectionDesign,
};
pub use thickness::{apply_thickness, check_thickness, ThicknessCheck, ThicknessRule};
