//! Board configuration.

use crate::calculations::DEFAULT_CALCULATION_LIMIT;
use crate::camera::{MAX_ZOOM, MIN_ZOOM};
use crate::expansion::ExpansionLimits;
use crate::history::MAX_HISTORY;
use crate::results::PlacedResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables for a board. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Snapshots kept for undo.
    pub history_limit: usize,
    pub expansion: ExpansionLimits,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom change per wheel notch or shortcut.
    pub zoom_step: f64,
    /// Default brush width.
    pub line_width: f64,
    /// Quiet period before a shape sketch snaps to its preview.
    pub preview_delay_ms: u64,
    /// Lifetime of a scratch-erase highlight segment.
    pub highlight_revert_ms: u64,
    /// Delay between placing consecutive solver results.
    pub result_stagger_ms: u64,
    pub calculation_limit: usize,
    pub ocr_language: String,
    pub result_font_size: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            history_limit: MAX_HISTORY,
            expansion: ExpansionLimits::default(),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: 0.05,
            line_width: 3.0,
            preview_delay_ms: 500,
            highlight_revert_ms: 500,
            result_stagger_ms: 1000,
            calculation_limit: DEFAULT_CALCULATION_LIMIT,
            ocr_language: "eng".to_string(),
            result_font_size: PlacedResult::DEFAULT_FONT_SIZE,
        }
    }
}

impl BoardConfig {
    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject bounds that cannot be applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.expansion.validate().map_err(ConfigError::Invalid)?;
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom && self.max_zoom.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "zoom range {}..{} is empty or not positive",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_step {} must be positive",
                self.zoom_step
            )));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("history_limit must be positive".to_string()));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from a JSON file, falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config, {} not loaded: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Upper bound for either surface dimension.
    pub fn max_surface_dimension(&self) -> u32 {
        self.expansion.max_dimension
    }

    pub fn preview_delay(&self) -> Duration {
        Duration::from_millis(self.preview_delay_ms)
    }

    pub fn highlight_revert(&self) -> Duration {
        Duration::from_millis(self.highlight_revert_ms)
    }

    pub fn result_stagger(&self) -> Duration {
        Duration::from_millis(self.result_stagger_ms)
    }
}
