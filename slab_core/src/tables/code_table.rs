//! Versioned Code Tables
//!
//! A `CodeTable` maps a tuple of discrete keys (support condition, moment
//! position, material grade, ...) to a partition. A partition is either a
//! constant or a curve tabulated along the table's single continuous axis
//! (span ratio m, section constant K, ...).
//!
//! ## Lookup Rules
//!
//! 1. Resolve the discrete key exactly (no fuzzy matching) or fail with
//!    `KeyNotFound`.
//! 2. On a curve, return the tabulated value when the query hits a row,
//!    interpolate linearly between the two bracketing rows otherwise.
//! 3. Outside `[min, max]` fail with `OutOfRange`, unless the axis is
//!    flagged extrapolable; then clamp to the nearest edge and flag the
//!    result as clamped.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "name": "k-to-ks",
//!   "version": "TS500-2000/rect-block-1",
//!   "discrete_axes": ["concrete", "steel"],
//!   "continuous_axis": { "name": "K", "unit": "cm2/kN", "extrapolable": false },
//!   "required_keys": [["C30", "S420"]],
//!   "partitions": [
//!     { "key": ["C30", "S420"], "points": [[2.04, 3.32], [588.5, 2.74]] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Continuous (monotonic) axis of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousAxis {
    /// Axis name used in error messages (e.g., "m", "K")
    pub name: String,
    /// Unit label
    #[serde(default)]
    pub unit: String,
    /// Clamp instead of failing outside the tabulated range
    #[serde(default)]
    pub extrapolable: bool,
}

/// One tabulated row on the continuous axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TablePoint {
    pub x: f64,
    pub value: f64,
}

/// Content of one discrete partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Partition {
    /// Same value for every point on the continuous axis
    Constant(f64),
    /// Rows sorted strictly increasing in `x`
    Curve(Vec<TablePoint>),
}

/// Query into a table: one label per discrete axis plus an optional
/// continuous-axis value.
#[derive(Debug, Clone, PartialEq)]
pub struct TableKey<'a> {
    pub discrete: Vec<&'a str>,
    pub continuous: Option<f64>,
}

impl<'a> TableKey<'a> {
    /// Key with discrete labels only
    pub fn new(discrete: impl IntoIterator<Item = &'a str>) -> Self {
        TableKey {
            discrete: discrete.into_iter().collect(),
            continuous: None,
        }
    }

    /// Add the continuous-axis value (builder pattern)
    pub fn at(mut self, x: f64) -> Self {
        self.continuous = Some(x);
        self
    }

    fn label(&self) -> String {
        format!("[{}]", self.discrete.join(", "))
    }
}

/// Result of a table lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lookup {
    pub value: f64,
    /// True when the query was clamped onto an extrapolable axis edge
    pub clamped: bool,
}

// ============================================================================
// On-disk representation
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableFile {
    name: String,
    version: String,
    #[serde(default)]
    source: String,
    discrete_axes: Vec<String>,
    #[serde(default)]
    continuous_axis: Option<ContinuousAxis>,
    #[serde(default)]
    required_keys: Vec<Vec<String>>,
    partitions: Vec<PartitionFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PartitionFile {
    key: Vec<String>,
    #[serde(default)]
    points: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    constant: Option<f64>,
}

// ============================================================================
// CodeTable
// ============================================================================

/// Immutable, validated, versioned lookup table
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTable {
    name: String,
    version: String,
    source: String,
    discrete_axes: Vec<String>,
    continuous_axis: Option<ContinuousAxis>,
    partitions: BTreeMap<Vec<String>, Partition>,
}

impl CodeTable {
    /// Parse and validate a table from its JSON text
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let file: TableFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    fn from_file(file: TableFile) -> CalcResult<Self> {
        let name = file.name.trim().to_string();
        if name.is_empty() {
            return Err(CalcError::table_validation("<unnamed>", "Table name is empty"));
        }
        if file.version.trim().is_empty() {
            return Err(CalcError::table_validation(&name, "Table version is empty"));
        }
        if file.discrete_axes.is_empty() {
            return Err(CalcError::table_validation(&name, "Table has no discrete axes"));
        }
        let arity = file.discrete_axes.len();

        let mut partitions = BTreeMap::new();
        for p in file.partitions {
            let label = format!("[{}]", p.key.join(", "));
            if p.key.len() != arity {
                return Err(CalcError::table_validation(
                    &name,
                    format!("Key {} has {} labels, expected {}", label, p.key.len(), arity),
                ));
            }

            let partition = match (p.points, p.constant) {
                (Some(points), None) => {
                    let axis = file.continuous_axis.as_ref().ok_or_else(|| {
                        CalcError::table_validation(
                            &name,
                            format!("Key {} has points but no continuous axis", label),
                        )
                    })?;
                    Partition::Curve(validate_curve(&name, &axis.name, &label, &points)?)
                }
                (None, Some(c)) if c.is_finite() => Partition::Constant(c),
                (None, Some(c)) => {
                    return Err(CalcError::table_validation(
                        &name,
                        format!("Key {} has non-finite constant {}", label, c),
                    ));
                }
                _ => {
                    return Err(CalcError::table_validation(
                        &name,
                        format!("Key {} must define exactly one of 'points' or 'constant'", label),
                    ));
                }
            };

            if partitions.insert(p.key, partition).is_some() {
                return Err(CalcError::table_validation(&name, format!("Duplicate key {}", label)));
            }
        }

        for key in &file.required_keys {
            if !partitions.contains_key(key) {
                return Err(CalcError::table_validation(
                    &name,
                    format!("Required key [{}] is missing", key.join(", ")),
                ));
            }
        }

        Ok(CodeTable {
            name,
            version: file.version,
            source: file.source,
            discrete_axes: file.discrete_axes,
            continuous_axis: file.continuous_axis,
            partitions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn discrete_axes(&self) -> &[String] {
        &self.discrete_axes
    }

    pub fn continuous_axis(&self) -> Option<&ContinuousAxis> {
        self.continuous_axis.as_ref()
    }

    /// Check whether an exact discrete key is present
    pub fn contains(&self, discrete: &[&str]) -> bool {
        self.partition(discrete).is_some()
    }

    /// Tabulated continuous range of a partition, `None` for constants
    pub fn range(&self, discrete: &[&str]) -> Option<(f64, f64)> {
        match self.partition(discrete)? {
            Partition::Constant(_) => None,
            Partition::Curve(points) => Some((points[0].x, points[points.len() - 1].x)),
        }
    }

    fn partition(&self, discrete: &[&str]) -> Option<&Partition> {
        let key: Vec<String> = discrete.iter().map(|s| s.to_string()).collect();
        self.partitions.get(&key)
    }

    /// Look up a value. See the module docs for the resolution rules.
    pub fn lookup(&self, key: &TableKey<'_>) -> CalcResult<Lookup> {
        if key.discrete.len() != self.discrete_axes.len() {
            return Err(CalcError::invalid_input(
                format!("{} key", self.name),
                key.label(),
                format!(
                    "Expected {} labels ({})",
                    self.discrete_axes.len(),
                    self.discrete_axes.join(", ")
                ),
            ));
        }

        let partition = self
            .partition(&key.discrete)
            .ok_or_else(|| CalcError::key_not_found(&self.name, key.label()))?;

        let points = match partition {
            Partition::Constant(value) => {
                return Ok(Lookup {
                    value: *value,
                    clamped: false,
                })
            }
            Partition::Curve(points) => points,
        };

        // Curves only exist when the continuous axis does
        let axis = match &self.continuous_axis {
            Some(axis) => axis,
            None => {
                return Err(CalcError::Internal {
                    message: format!("Table '{}' has a curve without a continuous axis", self.name),
                })
            }
        };

        let x = key.continuous.ok_or_else(|| {
            CalcError::invalid_input(
                &axis.name,
                "none",
                format!("Table '{}' needs a value on axis '{}'", self.name, axis.name),
            )
        })?;
        if !x.is_finite() {
            return Err(CalcError::invalid_input(
                &axis.name,
                x.to_string(),
                "Lookup value must be finite",
            ));
        }

        let first = points[0];
        let last = points[points.len() - 1];
        if x < first.x || x > last.x {
            if !axis.extrapolable {
                return Err(CalcError::out_of_range(&self.name, &axis.name, x, first.x, last.x));
            }
            let edge = if x < first.x { first } else { last };
            return Ok(Lookup {
                value: edge.value,
                clamped: true,
            });
        }

        // First row with x_i >= x; exists because x <= last.x
        let hi = points.partition_point(|p| p.x < x);
        let upper = points[hi];
        if upper.x == x {
            return Ok(Lookup {
                value: upper.value,
                clamped: false,
            });
        }
        let lower = points[hi - 1];
        let t = (x - lower.x) / (upper.x - lower.x);
        Ok(Lookup {
            value: lower.value + t * (upper.value - lower.value),
            clamped: false,
        })
    }
}

fn validate_curve(
    table: &str,
    axis: &str,
    label: &str,
    raw: &[[f64; 2]],
) -> CalcResult<Vec<TablePoint>> {
    if raw.len() < 2 {
        return Err(CalcError::table_validation(
            table,
            format!("Key {} needs at least two rows on axis '{}'", label, axis),
        ));
    }
    let points: Vec<TablePoint> = raw
        .iter()
        .map(|[x, value]| TablePoint { x: *x, value: *value })
        .collect();
    if points.iter().any(|p| !p.x.is_finite() || !p.value.is_finite()) {
        return Err(CalcError::table_validation(
            table,
            format!("Key {} has non-finite rows", label),
        ));
    }
    if let Some(w) = points.windows(2).find(|w| w[1].x <= w[0].x) {
        return Err(CalcError::table_validation(
            table,
            format!(
                "Key {}: axis '{}' is not strictly increasing ({} then {})",
                label, axis, w[0].x, w[1].x
            ),
        ));
    }
    Ok(points)
}
