//! # Error Types
//!
//! Structured error types for slab_core. Every pipeline stage fails with one
//! of these variants, so a caller can tell a missing table row apart from a
//! non-physical input or an unsatisfiable detailing rule without parsing
//! message strings.
//!
//! ## Example
//!
//! ```rust
//! use slab_core::errors::{CalcError, CalcResult};
//!
//! fn validate_span(span_m: f64) -> CalcResult<()> {
//!     if span_m <= 0.0 {
//!         return Err(CalcError::invalid_geometry(
//!             "lx_m",
//!             span_m.to_string(),
//!             "Span must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for slab_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for slab design operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (unknown grade label, malformed setting, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Non-physical geometry (non-positive span, NaN, net span consumed by beams)
    #[error("Invalid geometry for '{field}': {value} - {reason}")]
    InvalidGeometry {
        field: String,
        value: String,
        reason: String,
    },

    /// Non-physical load (negative or non-finite after assembly)
    #[error("Invalid load for '{field}': {value} - {reason}")]
    InvalidLoad {
        field: String,
        value: String,
        reason: String,
    },

    /// Edge continuity pattern has no entry in the support condition mapping
    #[error("Classification failed: {reason}")]
    Classification { reason: String },

    /// Coefficient method preconditions are not met; an exact analysis is required
    #[error("Coefficient method not applicable: {reason}")]
    CoefficientMethodNotApplicable { reason: String },

    /// Exact discrete key missing from a code table
    #[error("Key not found in table '{table}': {key}")]
    KeyNotFound { table: String, key: String },

    /// Continuous-axis query outside the tabulated range
    #[error("Value {value} on axis '{axis}' of table '{table}' is outside [{min}, {max}]")]
    OutOfRange {
        table: String,
        axis: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A quotient would divide by zero (e.g. K with a zero design moment)
    #[error("Division by zero computing {quantity}: {reason}")]
    DivisionByZero { quantity: String, reason: String },

    /// No bar diameter/spacing pair satisfies the spacing rules
    #[error("No compliant spacing: As = {as_required_mm2_per_m:.1} mm²/m, s ≤ {s_max_mm:.0} mm")]
    NoCompliantSpacing {
        as_required_mm2_per_m: f64,
        s_max_mm: f64,
    },

    /// A code table failed load-time validation
    #[error("Table '{table}' rejected: {reason}")]
    TableValidation { table: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Project file written by an incompatible schema version
    #[error("Version mismatch: file is {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidGeometry error
    pub fn invalid_geometry(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidGeometry {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidLoad error
    pub fn invalid_load(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidLoad {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Classification error
    pub fn classification(reason: impl Into<String>) -> Self {
        CalcError::Classification {
            reason: reason.into(),
        }
    }

    /// Create a CoefficientMethodNotApplicable error
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        CalcError::CoefficientMethodNotApplicable {
            reason: reason.into(),
        }
    }

    /// Create a KeyNotFound error
    pub fn key_not_found(table: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::KeyNotFound {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create an OutOfRange error
    pub fn out_of_range(
        table: impl Into<String>,
        axis: impl Into<String>,
        value: f64,
        min: f64,
        max: f64,
    ) -> Self {
        CalcError::OutOfRange {
            table: table.into(),
            axis: axis.into(),
            value,
            min,
            max,
        }
    }

    /// Create a DivisionByZero error
    pub fn division_by_zero(quantity: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::DivisionByZero {
            quantity: quantity.into(),
            reason: reason.into(),
        }
    }

    /// Create a TableValidation error
    pub fn table_validation(table: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::TableValidation {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error came from a code table lookup
    pub fn is_table_miss(&self) -> bool {
        matches!(self, CalcError::KeyNotFound { .. } | CalcError::OutOfRange { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CalcError::InvalidLoad { .. } => "INVALID_LOAD",
            CalcError::Classification { .. } => "CLASSIFICATION_ERROR",
            CalcError::CoefficientMethodNotApplicable { .. } => "COEFFICIENT_METHOD_NOT_APPLICABLE",
            CalcError::KeyNotFound { .. } => "KEY_NOT_FOUND",
            CalcError::OutOfRange { .. } => "OUT_OF_RANGE",
            CalcError::DivisionByZero { .. } => "DIVISION_BY_ZERO",
            CalcError::NoCompliantSpacing { .. } => "NO_COMPLIANT_SPACING",
            CalcError::TableValidation { .. } => "TABLE_VALIDATION",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::out_of_range("k-to-ks", "K", 900.0, 2.0, 706.0);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"OutOfRange\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::classification("x").error_code(), "CLASSIFICATION_ERROR");
        assert_eq!(
            CalcError::not_applicable("q/g").error_code(),
            "COEFFICIENT_METHOD_NOT_APPLICABLE"
        );
        let spacing = CalcError::NoCompliantSpacing {
            as_required_mm2_per_m: 5000.0,
            s_max_mm: 150.0,
        };
        assert_eq!(spacing.error_code(), "NO_COMPLIANT_SPACING");
    }

    #[test]
    fn test_table_miss() {
        assert!(CalcError::key_not_found("t", "C20").is_table_miss());
        assert!(!CalcError::division_by_zero("K", "Md = 0").is_table_miss());
    }

    #[test]
    fn test_display_message() {
        let e = CalcError::key_not_found("k-to-ks", "[C20, S420]");
        assert_eq!(e.to_string(), "Key not found in table 'k-to-ks': [C20, S420]");
    }
}
