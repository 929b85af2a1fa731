//! Concrete and Reinforcing Steel Classes (TS500 Tables 3.1 and 3.2)
//!
//! Concrete below C25 is not offered: the slab engine only designs with
//! classes at or above the code floor, so an unsupported class can only
//! arrive as a string and is rejected while parsing.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Lowest concrete class accepted for structural slabs
pub const MIN_CONCRETE_FCK_MPA: f64 = 25.0;

/// Concrete classes per TS500
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ConcreteClass {
    C25,
    #[default]
    C30,
    C35,
    C40,
    C45,
    C50,
}

impl ConcreteClass {
    /// All concrete classes in ascending strength
    pub const ALL: [ConcreteClass; 6] = [
        ConcreteClass::C25,
        ConcreteClass::C30,
        ConcreteClass::C35,
        ConcreteClass::C40,
        ConcreteClass::C45,
        ConcreteClass::C50,
    ];

    /// Characteristic cylinder strength fck (MPa)
    pub fn fck_mpa(&self) -> f64 {
        match self {
            ConcreteClass::C25 => 25.0,
            ConcreteClass::C30 => 30.0,
            ConcreteClass::C35 => 35.0,
            ConcreteClass::C40 => 40.0,
            ConcreteClass::C45 => 45.0,
            ConcreteClass::C50 => 50.0,
        }
    }

    /// Design strength fcd = fck / 1.5 (MPa)
    pub fn fcd_mpa(&self) -> f64 {
        self.fck_mpa() / 1.5
    }

    /// Table label (e.g., "C30")
    pub fn code(&self) -> &'static str {
        match self {
            ConcreteClass::C25 => "C25",
            ConcreteClass::C30 => "C30",
            ConcreteClass::C35 => "C35",
            ConcreteClass::C40 => "C40",
            ConcreteClass::C45 => "C45",
            ConcreteClass::C50 => "C50",
        }
    }

    /// Parse "C30", "c30", "C30/37" and similar labels
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let malformed =
            || CalcError::invalid_input("concrete", s, "Concrete class must look like C30");
        let upper = s.trim().to_uppercase();
        let digits = upper.strip_prefix('C').ok_or_else(malformed)?;
        let fck: u32 = digits
            .split('/')
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|_| malformed())?;

        if (fck as f64) < MIN_CONCRETE_FCK_MPA {
            return Err(CalcError::invalid_input(
                "concrete",
                s,
                format!("C{} is below the minimum class C25 for structural slabs", fck),
            ));
        }

        ConcreteClass::ALL
            .iter()
            .copied()
            .find(|c| c.fck_mpa() as u32 == fck)
            .ok_or_else(|| {
                CalcError::invalid_input("concrete", s, "Supported classes are C25 to C50")
            })
    }
}

impl std::fmt::Display for ConcreteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Reinforcing steel classes per TS500 / TS708
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SteelClass {
    /// Plain bars, fyk = 220 MPa
    S220,
    /// Ribbed bars, fyk = 420 MPa
    #[default]
    S420,
    /// Ribbed bars, fyk = 500 MPa (B500C)
    B500,
}

impl SteelClass {
    /// All steel classes
    pub const ALL: [SteelClass; 3] = [SteelClass::S220, SteelClass::S420, SteelClass::B500];

    /// Characteristic yield strength fyk (MPa)
    pub fn fyk_mpa(&self) -> f64 {
        match self {
            SteelClass::S220 => 220.0,
            SteelClass::S420 => 420.0,
            SteelClass::B500 => 500.0,
        }
    }

    /// Design yield strength fyd = fyk / 1.15 (MPa)
    pub fn fyd_mpa(&self) -> f64 {
        self.fyk_mpa() / 1.15
    }

    /// Minimum one-way reinforcement ratio
    ///
    /// Plain S220 bars need 0.003; ribbed S420 and B500 need 0.002.
    pub fn one_way_min_ratio(&self) -> f64 {
        match self {
            SteelClass::S220 => 0.003,
            SteelClass::S420 | SteelClass::B500 => 0.002,
        }
    }

    /// Table label (e.g., "S420")
    pub fn code(&self) -> &'static str {
        match self {
            SteelClass::S220 => "S220",
            SteelClass::S420 => "S420",
            SteelClass::B500 => "B500",
        }
    }

    /// Parse from common string representations ("S420", "s420a", "B500C")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let upper = s.trim().to_uppercase();
        if upper.contains("220") {
            Ok(SteelClass::S220)
        } else if upper.contains("420") {
            Ok(SteelClass::S420)
        } else if upper.contains("500") {
            Ok(SteelClass::B500)
        } else {
            Err(CalcError::invalid_input("steel", s, "Supported classes are S220, S420, B500"))
        }
    }
}

impl std::fmt::Display for SteelClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_concrete() {
        assert_eq!(ConcreteClass::from_str_flexible("C30").unwrap(), ConcreteClass::C30);
        assert_eq!(ConcreteClass::from_str_flexible("c35").unwrap(), ConcreteClass::C35);
        assert_eq!(ConcreteClass::from_str_flexible("C40/50").unwrap(), ConcreteClass::C40);
    }

    #[test]
    fn test_concrete_below_floor() {
        let err = ConcreteClass::from_str_flexible("C20").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("C20"));
        assert!(msg.contains("C25"));
    }

    #[test]
    fn test_concrete_garbage() {
        assert!(ConcreteClass::from_str_flexible("B30").is_err());
        assert!(ConcreteClass::from_str_flexible("C32").is_err());
    }

    #[test]
    fn test_parse_steel() {
        assert_eq!(SteelClass::from_str_flexible("S420").unwrap(), SteelClass::S420);
        assert_eq!(SteelClass::from_str_flexible("b500c").unwrap(), SteelClass::B500);
        assert_eq!(SteelClass::from_str_flexible("S220a").unwrap(), SteelClass::S220);
        assert!(SteelClass::from_str_flexible("A615").is_err());
    }

    #[test]
    fn test_min_ratios() {
        assert_eq!(SteelClass::S420.one_way_min_ratio(), 0.002);
        assert_eq!(SteelClass::S220.one_way_min_ratio(), 0.003);
        assert_eq!(SteelClass::B500.one_way_min_ratio(), 0.002);
    }

    #[test]
    fn test_design_strengths() {
        assert!((ConcreteClass::C30.fcd_mpa() - 20.0).abs() < 1e-12);
        assert!((SteelClass::S420.fyd_mpa() - 365.217).abs() < 1e-3);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&ConcreteClass::C25).unwrap();
        assert_eq!(json, "\"C25\"");
        let steel: SteelClass = serde_json::from_str("\"B500\"").unwrap();
        assert_eq!(steel, SteelClass::B500);
    }
}
