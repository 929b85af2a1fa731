//! # Code Tables
//!
//! The design tables the engine reads: two-way and one-way moment
//! coefficients, one-way applicability limits and the K→ks reinforcement
//! table. They are loaded and validated once per process and shared
//! read-only by every panel evaluation.
//!
//! ## Sources
//!
//! The JSON files under `slab_core/tables/` are embedded at compile time
//! ([`TableSet::builtin`]). A directory containing files with the same
//! names can replace them ([`TableSet::load_from_dir`] + [`install`]).
//!
//! ## Example
//!
//! ```rust
//! use slab_core::tables::{self, TableKey};
//!
//! let set = tables::global().unwrap();
//! let alpha = set
//!     .two_way_coefficients
//!     .lookup(&TableKey::new(["AllContinuous", "ShortPositive"]).at(1.5))
//!     .unwrap();
//! assert!((alpha.value - 0.045).abs() < 1e-12);
//! ```

pub mod code_table;

pub use code_table::{CodeTable, ContinuousAxis, Lookup, Partition, TableKey, TablePoint};

use std::path::Path;

use log::info;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::calculations::classifier::{SpanPosition, SupportCondition};
use crate::calculations::coefficients::{MomentPosition, OneWayLimit};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{ConcreteClass, MaterialGrade, SteelClass};

/// File names shared by the embedded data and table directories
pub const TWO_WAY_FILE: &str = "moment_coefficients_two_way.json";
pub const ONE_WAY_FILE: &str = "moment_coefficients_one_way.json";
pub const ONE_WAY_LIMITS_FILE: &str = "one_way_applicability.json";
pub const K_TO_KS_FILE: &str = "k_to_ks.json";

const TWO_WAY_JSON: &str = include_str!("../../tables/moment_coefficients_two_way.json");
const ONE_WAY_JSON: &str = include_str!("../../tables/moment_coefficients_one_way.json");
const ONE_WAY_LIMITS_JSON: &str = include_str!("../../tables/one_way_applicability.json");
const K_TO_KS_JSON: &str = include_str!("../../tables/k_to_ks.json");

static TABLES: OnceCell<TableSet> = OnceCell::new();

/// Name and version of a table, attached to reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableVersion {
    pub name: String,
    pub version: String,
}

/// The complete set of tables the engine needs
#[derive(Debug, Clone, PartialEq)]
pub struct TableSet {
    /// Two-way α by (support condition, position) over m
    pub two_way_coefficients: CodeTable,
    /// One-way α by (span position, Positive/Negative)
    pub one_way_coefficients: CodeTable,
    /// One-way coefficient method preconditions
    pub one_way_limits: CodeTable,
    /// ks by (concrete, steel) over K
    pub k_to_ks: CodeTable,
}

impl TableSet {
    /// Tables embedded in the crate
    pub fn builtin() -> CalcResult<Self> {
        TableSet::from_tables(
            CodeTable::from_json(TWO_WAY_JSON)?,
            CodeTable::from_json(ONE_WAY_JSON)?,
            CodeTable::from_json(ONE_WAY_LIMITS_JSON)?,
            CodeTable::from_json(K_TO_KS_JSON)?,
        )
    }

    /// Load every table from a directory of JSON files
    pub fn load_from_dir(dir: impl AsRef<Path>) -> CalcResult<Self> {
        let dir = dir.as_ref();
        let read = |file: &str| -> CalcResult<CodeTable> {
            let path = dir.join(file);
            let text = std::fs::read_to_string(&path).map_err(|e| {
                CalcError::file_error("read", path.display().to_string(), e.to_string())
            })?;
            CodeTable::from_json(&text)
        };
        TableSet::from_tables(
            read(TWO_WAY_FILE)?,
            read(ONE_WAY_FILE)?,
            read(ONE_WAY_LIMITS_FILE)?,
            read(K_TO_KS_FILE)?,
        )
    }

    /// Assemble a set, checking that every key the engine can ask for exists
    pub fn from_tables(
        two_way_coefficients: CodeTable,
        one_way_coefficients: CodeTable,
        one_way_limits: CodeTable,
        k_to_ks: CodeTable,
    ) -> CalcResult<Self> {
        let set = TableSet {
            two_way_coefficients,
            one_way_coefficients,
            one_way_limits,
            k_to_ks,
        };
        set.validate()?;
        Ok(set)
    }

    fn validate(&self) -> CalcResult<()> {
        require_axis(&self.two_way_coefficients, 2, true)?;
        require_axis(&self.one_way_coefficients, 2, false)?;
        require_axis(&self.one_way_limits, 1, false)?;
        require_axis(&self.k_to_ks, 2, true)?;

        for condition in SupportCondition::ALL {
            for position in MomentPosition::ALL {
                let key = [condition.table_key(), position.table_key()];
                require_key(&self.two_way_coefficients, &key)?;
            }
        }

        for span in SpanPosition::ALL {
            for position in MomentPosition::ALL {
                if let Some(label) = position.one_way_key() {
                    require_key(&self.one_way_coefficients, &[span.table_key(), label])?;
                }
            }
        }

        for limit in OneWayLimit::ALL {
            require_key(&self.one_way_limits, &[limit.table_key()])?;
        }

        for concrete in ConcreteClass::ALL {
            for steel in SteelClass::ALL {
                let grade = MaterialGrade::new(concrete, steel);
                require_key(&self.k_to_ks, &grade.table_key())?;
            }
        }
        Ok(())
    }

    /// Names and versions of every table in the set
    pub fn versions(&self) -> Vec<TableVersion> {
        [
            &self.two_way_coefficients,
            &self.one_way_coefficients,
            &self.one_way_limits,
            &self.k_to_ks,
        ]
        .iter()
        .map(|t| TableVersion {
            name: t.name().to_string(),
            version: t.version().to_string(),
        })
        .collect()
    }
}

fn require_axis(table: &CodeTable, arity: usize, continuous: bool) -> CalcResult<()> {
    if table.discrete_axes().len() != arity {
        return Err(CalcError::table_validation(
            table.name(),
            format!("Expected {} discrete axes, found {}", arity, table.discrete_axes().len()),
        ));
    }
    if continuous && table.continuous_axis().is_none() {
        return Err(CalcError::table_validation(table.name(), "Expected a continuous axis"));
    }
    Ok(())
}

fn require_key(table: &CodeTable, key: &[&str]) -> CalcResult<()> {
    if table.contains(key) {
        Ok(())
    } else {
        Err(CalcError::table_validation(
            table.name(),
            format!("Missing key [{}]", key.join(", ")),
        ))
    }
}

/// Process-wide table set, initialized with the builtin tables on first use
pub fn global() -> CalcResult<&'static TableSet> {
    TABLES.get_or_try_init(|| {
        let set = TableSet::builtin()?;
        info!("Loaded builtin code tables: {:?}", set.versions());
        Ok(set)
    })
}

/// Install a table set before first use.
///
/// Fails if the process-wide set was already initialized.
pub fn install(set: TableSet) -> CalcResult<()> {
    let versions = set.versions();
    TABLES.set(set).map_err(|_| CalcError::Internal {
        message: "Code tables are already initialized".to_string(),
    })?;
    info!("Installed code tables: {:?}", versions);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_load() {
        let set = TableSet::builtin().unwrap();
        assert_eq!(set.two_way_coefficients.name(), "moment-coefficients-two-way");
        assert_eq!(set.k_to_ks.name(), "k-to-ks");
        assert_eq!(set.versions().len(), 4);
    }

    #[test]
    fn test_axes_not_extrapolable() {
        let set = TableSet::builtin().unwrap();
        assert!(!set.two_way_coefficients.continuous_axis().unwrap().extrapolable);
        assert!(!set.k_to_ks.continuous_axis().unwrap().extrapolable);
    }

    #[test]
    fn test_two_way_m_range() {
        let set = TableSet::builtin().unwrap();
        assert_eq!(
            set.two_way_coefficients.range(&["AllContinuous", "ShortPositive"]),
            Some((1.0, 2.0))
        );
    }

    #[test]
    fn test_global_is_shared() {
        let a = global().unwrap() as *const TableSet;
        let b = global().unwrap() as *const TableSet;
        assert_eq!(a, b);
        // already initialized by the calls above
        assert!(install(TableSet::builtin().unwrap()).is_err());
    }

    #[test]
    fn test_missing_grade_rejected() {
        let k_json = K_TO_KS_JSON.replacen("\"C50\", \"B500\"", "\"C55\", \"B500\"", 2);
        let k = CodeTable::from_json(&k_json).unwrap();
        let err = TableSet::from_tables(
            CodeTable::from_json(TWO_WAY_JSON).unwrap(),
            CodeTable::from_json(ONE_WAY_JSON).unwrap(),
            CodeTable::from_json(ONE_WAY_LIMITS_JSON).unwrap(),
            k,
        )
        .unwrap_err();
        assert!(err.to_string().contains("C50"));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tables");
        let set = TableSet::load_from_dir(dir).unwrap();
        assert_eq!(set, TableSet::builtin().unwrap());
    }

    #[test]
    fn test_load_from_missing_dir() {
        let err = TableSet::load_from_dir("/nonexistent/tables").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
