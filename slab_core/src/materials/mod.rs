//! # Materials
//!
//! Concrete and reinforcing steel definitions plus the rebar catalog.
//!
//! ## Example
//!
//! ```rust
//! use slab_core::materials::{ConcreteClass, MaterialGrade, SteelClass};
//!
//! let grade = MaterialGrade::new(ConcreteClass::C30, SteelClass::S420);
//! assert_eq!(grade.display_name(), "C30/S420");
//! assert_eq!(grade.table_key(), ["C30", "S420"]);
//! ```

pub mod grades;
pub mod rebar;

pub use grades::{ConcreteClass, SteelClass, MIN_CONCRETE_FCK_MPA};
pub use rebar::{area_per_meter, bar_area_mm2, RebarCatalog};

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;

/// Concrete/steel pair used for a slab panel.
///
/// Immutable and `Copy`; many panels share the same grade.
///
/// ## JSON Example
///
/// ```json
/// { "concrete": "C30", "steel": "S420" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MaterialGrade {
    /// Concrete class
    pub concrete: ConcreteClass,
    /// Reinforcing steel class
    pub steel: SteelClass,
}

impl MaterialGrade {
    /// Create a material grade
    pub fn new(concrete: ConcreteClass, steel: SteelClass) -> Self {
        MaterialGrade { concrete, steel }
    }

    /// Parse from labels such as ("C30", "S420")
    pub fn parse(concrete: &str, steel: &str) -> CalcResult<Self> {
        Ok(MaterialGrade {
            concrete: ConcreteClass::from_str_flexible(concrete)?,
            steel: SteelClass::from_str_flexible(steel)?,
        })
    }

    /// Discrete key into the K→ks table: [concrete, steel]
    pub fn table_key(&self) -> [&'static str; 2] {
        [self.concrete.code(), self.steel.code()]
    }

    /// Display name (e.g., "C30/S420")
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.concrete.code(), self.steel.code())
    }
}

impl std::fmt::Display for MaterialGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
