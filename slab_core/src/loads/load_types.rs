//! Load type definitions per TS498
//!
//! Slab design combines two load categories: permanent (G) and variable (Q).

use serde::{Deserialize, Serialize};

/// Load types acting on a floor slab
///
/// # Example
/// ```
/// use slab_core::loads::LoadType;
///
/// assert_eq!(LoadType::Dead.code(), "G");
/// assert_eq!(LoadType::Live.description(), "Live load");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// G - Self-weight plus finishes, screed, plaster, partitions
    Dead,
    /// Q - Occupancy live load
    Live,
}

impl LoadType {
    /// All load types in standard order
    pub const ALL: [LoadType; 2] = [LoadType::Dead, LoadType::Live];

    /// Standard abbreviation used in combination equations
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Dead => "G",
            LoadType::Live => "Q",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LoadType::Dead => "Dead load",
            LoadType::Live => "Live load",
        }
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_type_codes() {
        assert_eq!(LoadType::Dead.code(), "G");
        assert_eq!(LoadType::Live.code(), "Q");
        assert_eq!(LoadType::Dead.to_string(), "G");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&LoadType::Live).unwrap();
        assert_eq!(json, "\"Live\"");
        let parsed: LoadType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, LoadType::Live);
    }
}
