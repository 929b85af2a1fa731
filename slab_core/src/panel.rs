//! # Slab Panel Geometry
//!
//! A rectangular slab panel supported on four edges. Input spans are given
//! along the X and Y axes; the engine normalizes them into a short span and
//! a long span so every downstream rule can work in short/long terms.
//!
//! ## Edge Naming
//!
//! ```text
//!              north (y = ly)
//!         +-------------------+
//!         |                   |
//!  west   |                   |   east
//! (x = 0) |                   | (x = lx)
//!         |                   |
//!         +-------------------+
//!              south (y = 0)
//! ```
//!
//! South and north edges have length `lx`; west and east edges have length
//! `ly`. The "short edges" of a panel are the two edges whose length equals
//! the short span; the "long edges" carry the short-direction strips.
//!
//! ## Net Spans
//!
//! ```text
//! Ln = L - (w_a + w_b) / 2
//! ```
//!
//! where `w_a`, `w_b` are the widths of the beams on the two edges that
//! bound the span.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Edges
// ============================================================================

/// Continuity of one panel edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EdgeSupport {
    /// Slab continues over the supporting beam into a neighbouring panel
    Continuous,
    /// Panel ends at this edge (exterior beam or wall)
    #[default]
    Discontinuous,
}

impl EdgeSupport {
    pub fn is_continuous(&self) -> bool {
        matches!(self, EdgeSupport::Continuous)
    }
}

/// One edge of a panel: continuity plus the width of the supporting beam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PanelEdge {
    pub support: EdgeSupport,
    /// Supporting beam width (mm); zero for a knife-edge support
    #[serde(default)]
    pub beam_width_mm: f64,
}

impl PanelEdge {
    pub fn continuous(beam_width_mm: f64) -> Self {
        PanelEdge {
            support: EdgeSupport::Continuous,
            beam_width_mm,
        }
    }

    pub fn discontinuous(beam_width_mm: f64) -> Self {
        PanelEdge {
            support: EdgeSupport::Discontinuous,
            beam_width_mm,
        }
    }

    pub fn is_continuous(&self) -> bool {
        self.support.is_continuous()
    }
}

/// The four edges of a panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PanelEdges {
    /// Edge along y = 0 (length lx)
    pub south: PanelEdge,
    /// Edge along y = ly (length lx)
    pub north: PanelEdge,
    /// Edge along x = 0 (length ly)
    pub west: PanelEdge,
    /// Edge along x = lx (length ly)
    pub east: PanelEdge,
}

impl PanelEdges {
    /// Same edge definition on all four sides
    pub fn uniform(edge: PanelEdge) -> Self {
        PanelEdges {
            south: edge,
            north: edge,
            west: edge,
            east: edge,
        }
    }

    /// Number of continuous edges
    pub fn continuous_count(&self) -> usize {
        [self.south, self.north, self.west, self.east]
            .iter()
            .filter(|e| e.is_continuous())
            .count()
    }
}

// ============================================================================
// Panel
// ============================================================================

/// Plan axis a span runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanAxis {
    X,
    Y,
}

impl std::fmt::Display for SpanAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpanAxis::X => write!(f, "X"),
            SpanAxis::Y => write!(f, "Y"),
        }
    }
}

/// Record of a thickness raised to the code minimum.
///
/// The original input value is kept so the override is never silent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThicknessOverride {
    /// Thickness as supplied (mm)
    pub original_h_mm: f64,
    /// Thickness after raising (mm)
    pub raised_h_mm: f64,
    /// Code clause of the binding rule
    pub clause: String,
}

/// A slab panel as supplied by pre-processing.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "D1",
///   "lx_m": 4.0,
///   "ly_m": 6.0,
///   "h_mm": 120.0,
///   "edges": {
///     "south": { "support": "Continuous", "beam_width_mm": 250.0 },
///     "north": { "support": "Discontinuous", "beam_width_mm": 250.0 },
///     "west":  { "support": "Continuous", "beam_width_mm": 250.0 },
///     "east":  { "support": "Continuous", "beam_width_mm": 250.0 }
///   },
///   "story_height_m": 3.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabPanel {
    /// Panel identifier (e.g., "D1")
    pub id: String,
    /// Gross span along X (m)
    pub lx_m: f64,
    /// Gross span along Y (m)
    pub ly_m: f64,
    /// Slab thickness (mm)
    pub h_mm: f64,
    /// Edge continuity and beam widths
    pub edges: PanelEdges,
    /// Story height (m), carried through for downstream tooling
    #[serde(default)]
    pub story_height_m: f64,
    /// Trafficable slab (raises the absolute thickness floor)
    #[serde(default)]
    pub trafficable: bool,
    /// Concrete cover to the bar centroid (mm); falls back to the design default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_mm: Option<f64>,
    /// Gross short-direction spans of neighbouring panels (m), one-way only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adjacent_spans_m: Vec<f64>,
    /// Set by the thickness check when h was raised
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness_override: Option<ThicknessOverride>,
}

/// Short/long normalized view of a panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelGeometry {
    /// Gross short span (m)
    pub l_short_m: f64,
    /// Gross long span (m)
    pub l_long_m: f64,
    /// Axis the short span runs along
    pub short_axis: SpanAxis,
    /// Net short span Lsn (m)
    pub net_short_m: f64,
    /// Net long span (m)
    pub net_long_m: f64,
    /// Edges of length l_short (bound the long span)
    pub short_edges: [PanelEdge; 2],
    /// Edges of length l_long (bound the short span)
    pub long_edges: [PanelEdge; 2],
}

impl PanelGeometry {
    /// Span ratio m = Llong / Lshort (gross spans)
    pub fn span_ratio(&self) -> f64 {
        self.l_long_m / self.l_short_m
    }

    /// Axis the long span runs along
    pub fn long_axis(&self) -> SpanAxis {
        match self.short_axis {
            SpanAxis::X => SpanAxis::Y,
            SpanAxis::Y => SpanAxis::X,
        }
    }

    /// Number of continuous long edges (0..=2)
    pub fn continuous_long_edges(&self) -> usize {
        self.long_edges.iter().filter(|e| e.is_continuous()).count()
    }

    /// Number of continuous short edges (0..=2)
    pub fn continuous_short_edges(&self) -> usize {
        self.short_edges.iter().filter(|e| e.is_continuous()).count()
    }

    /// Continuous edge length over perimeter
    pub fn continuity_ratio(&self) -> f64 {
        let continuous = self.continuous_short_edges() as f64 * self.l_short_m
            + self.continuous_long_edges() as f64 * self.l_long_m;
        continuous / (2.0 * (self.l_short_m + self.l_long_m))
    }
}

impl SlabPanel {
    /// Create a panel with no beams, no cover override and no neighbours
    pub fn new(id: impl Into<String>, lx_m: f64, ly_m: f64, h_mm: f64, edges: PanelEdges) -> Self {
        SlabPanel {
            id: id.into(),
            lx_m,
            ly_m,
            h_mm,
            edges,
            story_height_m: 0.0,
            trafficable: false,
            cover_mm: None,
            adjacent_spans_m: Vec::new(),
            thickness_override: None,
        }
    }

    /// Mark as trafficable (builder pattern)
    pub fn trafficable(mut self) -> Self {
        self.trafficable = true;
        self
    }

    /// Set the story height (builder pattern)
    pub fn with_story_height(mut self, story_height_m: f64) -> Self {
        self.story_height_m = story_height_m;
        self
    }

    /// Override the concrete cover (builder pattern)
    pub fn with_cover(mut self, cover_mm: f64) -> Self {
        self.cover_mm = Some(cover_mm);
        self
    }

    /// Record neighbouring spans (builder pattern)
    pub fn with_adjacent_spans(mut self, spans_m: Vec<f64>) -> Self {
        self.adjacent_spans_m = spans_m;
        self
    }

    /// Validate geometry
    pub fn validate(&self) -> CalcResult<()> {
        if self.id.trim().is_empty() {
            return Err(CalcError::invalid_input("id", "", "Panel id must not be empty"));
        }
        positive("lx_m", self.lx_m)?;
        positive("ly_m", self.ly_m)?;
        positive("h_mm", self.h_mm)?;

        for (name, edge) in [
            ("edges.south", self.edges.south),
            ("edges.north", self.edges.north),
            ("edges.west", self.edges.west),
            ("edges.east", self.edges.east),
        ] {
            if !edge.beam_width_mm.is_finite() || edge.beam_width_mm < 0.0 {
                return Err(CalcError::invalid_geometry(
                    format!("{}.beam_width_mm", name),
                    edge.beam_width_mm.to_string(),
                    "Beam width must be zero or positive",
                ));
            }
        }

        if let Some(cover) = self.cover_mm {
            positive("cover_mm", cover)?;
        }
        for span in &self.adjacent_spans_m {
            positive("adjacent_spans_m", *span)?;
        }
        if !self.story_height_m.is_finite() || self.story_height_m < 0.0 {
            return Err(CalcError::invalid_geometry(
                "story_height_m",
                self.story_height_m.to_string(),
                "Story height must be zero or positive",
            ));
        }
        Ok(())
    }

    /// Normalize into short/long spans and compute net spans.
    ///
    /// When `lx == ly` the X axis is taken as the short axis.
    pub fn geometry(&self) -> CalcResult<PanelGeometry> {
        self.validate()?;

        let e = &self.edges;
        let (l_short, l_long, short_axis, short_edges, long_edges) = if self.lx_m <= self.ly_m {
            (self.lx_m, self.ly_m, SpanAxis::X, [e.south, e.north], [e.west, e.east])
        } else {
            (self.ly_m, self.lx_m, SpanAxis::Y, [e.west, e.east], [e.south, e.north])
        };

        let net_short = net_span(l_short, &long_edges);
        let net_long = net_span(l_long, &short_edges);
        if net_short <= 0.0 {
            return Err(CalcError::invalid_geometry(
                "net_short_m",
                format!("{:.3}", net_short),
                "Supporting beams consume the short span",
            ));
        }
        if net_long <= 0.0 {
            return Err(CalcError::invalid_geometry(
                "net_long_m",
                format!("{:.3}", net_long),
                "Supporting beams consume the long span",
            ));
        }

        Ok(PanelGeometry {
            l_short_m: l_short,
            l_long_m: l_long,
            short_axis,
            net_short_m: net_short,
            net_long_m: net_long,
            short_edges,
            long_edges,
        })
    }
}

/// Clear span between the faces of the two bounding beams (m)
fn net_span(gross_m: f64, bounding: &[PanelEdge; 2]) -> f64 {
    gross_m - (bounding[0].beam_width_mm + bounding[1].beam_width_mm) / 2000.0
}

fn positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_geometry(field, value.to_string(), "Must be positive"));
    }
    Ok(())
}
