//! Editor configuration.

use crate::camera::{MAX_ZOOM, MIN_ZOOM};
use crate::geometry::clamp;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for the editor. Every field has a default, so partial JSON
/// documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Logical canvas width used until the host reports a canvas rect.
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub grid_size: f64,
    pub snap_enabled: bool,
    pub history_capacity: usize,
    /// Arrow-key nudge distance.
    pub key_step: f64,
    pub duplicate_offset: f64,
    pub zoom: f64,
    /// Storage key for autosaved layouts.
    pub storage_key: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 960.0,
            canvas_height: 640.0,
            min_width: 40.0,
            min_height: 24.0,
            grid_size: 10.0,
            snap_enabled: false,
            history_capacity: crate::history::MAX_UNDO_HISTORY,
            key_step: 5.0,
            duplicate_offset: 12.0,
            zoom: 1.0,
            storage_key: "layoutlab.layout.v1".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse from JSON and coerce invalid values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replace out-of-range values with the nearest valid ones, or the
    /// default when a value is not a number at all.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f64, fallback: f64, floor: f64| {
            if v.is_finite() { v.max(floor) } else { fallback }
        };
        self.canvas_width = positive(self.canvas_width, defaults.canvas_width, 0.0);
        self.canvas_height = positive(self.canvas_height, defaults.canvas_height, 0.0);
        self.min_width = positive(self.min_width, defaults.min_width, 1.0);
        self.min_height = positive(self.min_height, defaults.min_height, 1.0);
        self.grid_size = positive(self.grid_size, defaults.grid_size, 1.0);
        self.history_capacity = self.history_capacity.max(1);
        self.key_step = positive(self.key_step, defaults.key_step, 0.0);
        self.duplicate_offset = if self.duplicate_offset.is_finite() {
            self.duplicate_offset
        } else {
            defaults.duplicate_offset
        };
        self.zoom = clamp(positive(self.zoom, defaults.zoom, 0.0), MIN_ZOOM, MAX_ZOOM);
        if self.storage_key.trim().is_empty() {
            self.storage_key = defaults.storage_key;
        }
        self
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }
}
