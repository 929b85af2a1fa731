//! Live Loads by Occupancy (TS498 Table 7)

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Floor occupancy categories with a tabulated distributed live load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Occupancy {
    /// Dwellings, hotel rooms
    #[default]
    Residential,
    /// Offices
    Office,
    /// Classrooms, schools
    Classroom,
    /// Hospital wards and rooms
    Hospital,
    /// Assembly halls, stores, shops
    AssemblyStore,
    /// Car parking
    Parking,
    /// Balconies
    Balcony,
}

impl Occupancy {
    pub const ALL: [Occupancy; 7] = [
        Occupancy::Residential,
        Occupancy::Office,
        Occupancy::Classroom,
        Occupancy::Hospital,
        Occupancy::AssemblyStore,
        Occupancy::Parking,
        Occupancy::Balcony,
    ];

    /// Distributed live load q (kN/m²)
    pub fn live_load_kn_m2(&self) -> f64 {
        match self {
            Occupancy::Residential => 2.0,
            Occupancy::Office => 2.0,
            Occupancy::Classroom => 3.5,
            Occupancy::Hospital => 3.5,
            Occupancy::AssemblyStore => 5.0,
            Occupancy::Parking => 5.0,
            Occupancy::Balcony => 5.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Occupancy::Residential => "Residential",
            Occupancy::Office => "Office",
            Occupancy::Classroom => "Classroom",
            Occupancy::Hospital => "Hospital",
            Occupancy::AssemblyStore => "Assembly / store",
            Occupancy::Parking => "Parking",
            Occupancy::Balcony => "Balcony",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "residential" | "dwelling" | "housing" => Ok(Occupancy::Residential),
            "office" => Ok(Occupancy::Office),
            "classroom" | "school" => Ok(Occupancy::Classroom),
            "hospital" => Ok(Occupancy::Hospital),
            "assemblystore" | "assembly" | "store" | "shop" => Ok(Occupancy::AssemblyStore),
            "parking" | "garage" => Ok(Occupancy::Parking),
            "balcony" => Ok(Occupancy::Balcony),
            _ => Err(CalcError::invalid_input("occupancy", s, "Unknown occupancy")),
        }
    }
}

impl std::fmt::Display for Occupancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
