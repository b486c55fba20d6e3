//! Canvas configuration.

use crate::camera::DEFAULT_ZOOM_SENSITIVITY;
use crate::eraser::DEFAULT_ERASER_RADIUS_PX;
use crate::shapes::{DEFAULT_BRUSH_WIDTH, DEFAULT_SEGMENT_WIDTH, SerializableColor};
use crate::snap::SnapConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Grid rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    /// No grid.
    None,
    /// Lines grid.
    #[default]
    Lines,
    /// Dot grid.
    Dots,
}

/// Appearance and interaction settings. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    pub background: SerializableColor,
    pub grid_style: GridStyle,
    pub grid_color: SerializableColor,
    pub axis_color: SerializableColor,
    /// Grid spacing in world units.
    pub grid_size: f64,
    /// Below this on-screen spacing the grid is not drawn.
    pub grid_min_spacing_px: f64,
    pub eraser_radius_px: f64,
    pub snap: SnapConfig,
    pub zoom_sensitivity: f64,
    /// Dash and gap lengths for dashed segments, in world units.
    pub dash_pattern: Vec<f64>,
    pub stroke_color: SerializableColor,
    pub segment_width: f64,
    pub brush_width: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background: SerializableColor::white(),
            grid_style: GridStyle::Lines,
            grid_color: SerializableColor::new(225, 228, 232, 255),
            axis_color: SerializableColor::new(160, 168, 178, 255),
            grid_size: 40.0,
            grid_min_spacing_px: 8.0,
            eraser_radius_px: DEFAULT_ERASER_RADIUS_PX,
            snap: SnapConfig::default(),
            zoom_sensitivity: DEFAULT_ZOOM_SENSITIVITY,
            dash_pattern: vec![10.0, 8.0],
            stroke_color: SerializableColor::black(),
            segment_width: DEFAULT_SEGMENT_WIDTH,
            brush_width: DEFAULT_BRUSH_WIDTH,
        }
    }
}

impl CanvasConfig {
    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
