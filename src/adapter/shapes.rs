//! Polygon and line overlays.

use crate::core::constants::{
    BASE_FILL_OPACITY, BASE_STROKE_WEIGHT, EMPHASIS_FILL_OPACITY, EMPHASIS_STROKE_WEIGHT,
};
use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Stroke/fill values applied to a titled polygon as the pointer enters and
/// leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeEmphasis {
    pub stroke_weight: f64,
    pub fill_opacity: f64,
}

impl ShapeEmphasis {
    /// Values applied while hovered.
    pub fn emphasized() -> Self {
        Self {
            stroke_weight: EMPHASIS_STROKE_WEIGHT,
            fill_opacity: EMPHASIS_FILL_OPACITY,
        }
    }

    /// Values reverted to on hover-out.
    pub fn base() -> Self {
        Self {
            stroke_weight: BASE_STROKE_WEIGHT,
            fill_opacity: BASE_FILL_OPACITY,
        }
    }
}

/// Styling for a filled region. A title enables the hover-emphasis behavior
/// and the title popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonOptions {
    /// Surface color in hexadecimal notation.
    pub fill_color: String,
    /// Surface opacity, 0.0 to 1.0.
    pub opacity: f64,
    pub title: Option<String>,
}

impl PolygonOptions {
    pub fn new(fill_color: impl Into<String>, opacity: f64) -> Self {
        Self {
            fill_color: fill_color.into(),
            opacity,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Styling for a polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineOptions {
    /// Stroke color in hexadecimal notation.
    pub color: String,
    /// Stroke opacity, 0.0 to 1.0.
    pub opacity: f64,
    /// Stroke weight in pixels.
    pub weight: f64,
}

impl LineOptions {
    pub fn new(color: impl Into<String>, opacity: f64, weight: f64) -> Self {
        Self {
            color: color.into(),
            opacity,
            weight,
        }
    }
}

/// A filled region bound to the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub name: String,
    pub path: Vec<LatLng>,
    pub options: PolygonOptions,
    /// Whether the hover emphasis styling is currently applied.
    pub emphasized: bool,
}

/// A polyline bound to the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub name: String,
    pub path: Vec<LatLng>,
    pub options: LineOptions,
}
