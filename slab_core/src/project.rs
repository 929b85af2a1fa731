//! # Project Data Structures
//!
//! The `Project` struct is the batch input for the slab engine: metadata,
//! design settings and the panels to evaluate. Projects serialize to
//! human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: DesignSettings (cover, floors, spacing caps, bar catalog)
//! └── panels: Vec<PanelInput> (panel geometry + grade + loads)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use slab_core::project::Project;
//!
//! let project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("25-042"));
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadInput;
use crate::materials::{MaterialGrade, RebarCatalog};
use crate::panel::SlabPanel;

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Design settings shared by every panel
    #[serde(default)]
    pub settings: DesignSettings,

    /// Panels in evaluation order
    #[serde(default)]
    pub panels: Vec<PanelInput>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use slab_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "25-001", "Client Corp");
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// ```
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: DesignSettings::default(),
            panels: Vec::new(),
        }
    }

    /// Append a panel; returns its index.
    pub fn add_panel(&mut self, input: PanelInput) -> usize {
        self.panels.push(input);
        self.touch();
        self.panels.len() - 1
    }

    /// Remove a panel by id.
    pub fn remove_panel(&mut self, id: &str) -> Option<PanelInput> {
        let index = self.panels.iter().position(|p| p.panel.id == id)?;
        self.touch();
        Some(self.panels.remove(index))
    }

    /// Find a panel by id.
    pub fn get_panel(&self, id: &str) -> Option<&PanelInput> {
        self.panels.iter().find(|p| p.panel.id == id)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Validate settings and panel id uniqueness.
    ///
    /// Panel geometry is validated by the engine, per panel.
    pub fn validate(&self) -> CalcResult<()> {
        self.settings.validate()?;
        let mut seen = HashSet::new();
        for p in &self.panels {
            if !seen.insert(p.panel.id.as_str()) {
                return Err(CalcError::invalid_input("panels", &p.panel.id, "Duplicate panel id"));
            }
        }
        Ok(())
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// One panel to design, with its grade and loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelInput {
    pub panel: SlabPanel,
    #[serde(default)]
    pub grade: MaterialGrade,
    pub loads: LoadInput,
}

impl PanelInput {
    pub fn new(panel: SlabPanel, grade: MaterialGrade, loads: LoadInput) -> Self {
        PanelInput { panel, grade, loads }
    }
}

// ============================================================================
// Design settings
// ============================================================================

/// Layout of bottom (positive moment) main bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BarArrangement {
    /// All bars straight
    Straight,
    /// Alternate straight and bent-up ("pilye") bars of equal diameter
    #[default]
    StraightAndBent,
}

/// Engineer-adjustable design settings.
///
/// Code constants that are not user input live in [`crate::ts500`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Distance from the tension face to the bar centroid, d = h - cover (mm)
    pub cover_mm: f64,

    /// Absolute thickness floor (mm)
    pub min_thickness_mm: f64,

    /// Absolute thickness floor for trafficable slabs (mm)
    pub min_thickness_trafficable_mm: f64,

    /// Main bar spacing cap, both directions (mm)
    pub max_spacing_main_mm: f64,

    /// Distribution bar spacing cap (mm)
    pub max_spacing_distribution_mm: f64,

    /// Spacing cap as a multiple of h
    pub spacing_thickness_factor: f64,

    /// Smallest spacing the detailer may use (mm)
    pub min_spacing_mm: f64,

    /// Smallest main bar diameter (mm)
    pub min_main_diameter_mm: u32,

    /// Smallest distribution bar diameter (mm)
    pub min_distribution_diameter_mm: u32,

    /// Bottom bar layout
    pub bottom_arrangement: BarArrangement,

    /// Available diameters and spacings
    pub catalog: RebarCatalog,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            cover_mm: 20.0,
            min_thickness_mm: 80.0,
            min_thickness_trafficable_mm: 120.0,
            max_spacing_main_mm: 200.0,
            max_spacing_distribution_mm: 300.0,
            spacing_thickness_factor: 1.5,
            min_spacing_mm: 70.0,
            min_main_diameter_mm: 8,
            min_distribution_diameter_mm: 6,
            bottom_arrangement: BarArrangement::StraightAndBent,
            catalog: RebarCatalog::default(),
        }
    }
}

impl DesignSettings {
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("cover_mm", self.cover_mm),
            ("min_thickness_mm", self.min_thickness_mm),
            ("min_thickness_trafficable_mm", self.min_thickness_trafficable_mm),
            ("max_spacing_main_mm", self.max_spacing_main_mm),
            ("max_spacing_distribution_mm", self.max_spacing_distribution_mm),
            ("spacing_thickness_factor", self.spacing_thickness_factor),
            ("min_spacing_mm", self.min_spacing_mm),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }
        if self.catalog.diameters_mm.is_empty() || self.catalog.spacings_mm.is_empty() {
            return Err(CalcError::invalid_input(
                "catalog",
                "empty",
                "Bar catalog needs diameters and spacings",
            ));
        }
        if self.catalog.spacings_mm.contains(&0) || self.catalog.diameters_mm.contains(&0) {
            return Err(CalcError::invalid_input(
                "catalog",
                "0",
                "Catalog entries must be positive",
            ));
        }
        Ok(())
    }

    /// Absolute thickness floor for a panel (mm)
    pub fn thickness_floor_mm(&self, trafficable: bool) -> f64 {
        if trafficable {
            self.min_thickness_trafficable_mm
        } else {
            self.min_thickness_mm
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{LiveLoad, Occupancy};
    use crate::panel::{PanelEdge, PanelEdges};

    fn input(id: &str) -> PanelInput {
        PanelInput::new(
            SlabPanel::new(id, 4.0, 5.0, 120.0, PanelEdges::uniform(PanelEdge::continuous(250.0))),
            MaterialGrade::default(),
            LoadInput::new(1.5, LiveLoad::Occupancy(Occupancy::Residential)),
        )
    }

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "25-001", "Acme Corp");
        assert_eq!(project.meta.engineer, "John Doe");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.panel_count(), 0);
    }

    #[test]
    fn test_add_remove_panel() {
        let mut project = Project::new("Engineer", "25-001", "Client");
        assert_eq!(project.add_panel(input("D1")), 0);
        assert_eq!(project.add_panel(input("D2")), 1);
        assert!(project.get_panel("D2").is_some());

        let removed = project.remove_panel("D1").unwrap();
        assert_eq!(removed.panel.id, "D1");
        assert_eq!(project.panel_count(), 1);
        assert!(project.remove_panel("D9").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut project = Project::default();
        project.add_panel(input("D1"));
        project.add_panel(input("D1"));
        assert!(project.validate().is_err());
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("Jane Engineer", "25-042", "Test Client");
        project.add_panel(input("D1"));
        let json = serde_json::to_string_pretty(&project).unwrap();
        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("StraightAndBent"));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.panels, project.panels);
        assert_eq!(roundtrip.settings, project.settings);
    }

    #[test]
    fn test_settings_defaults() {
        let s = DesignSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.cover_mm, 20.0);
        assert_eq!(s.thickness_floor_mm(false), 80.0);
        assert_eq!(s.thickness_floor_mm(true), 120.0);
    }

    #[test]
    fn test_partial_settings_json() {
        let s: DesignSettings = serde_json::from_str(r#"{ "cover_mm": 25.0 }"#).unwrap();
        assert_eq!(s.cover_mm, 25.0);
        assert_eq!(s.max_spacing_main_mm, 200.0);
    }

    #[test]
    fn test_invalid_settings() {
        let s = DesignSettings {
            cover_mm: 0.0,
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }
}
