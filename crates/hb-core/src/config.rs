//! Editor tuning knobs.

use crate::snap::{DEFAULT_HIT_THRESHOLD_FT, DEFAULT_SNAP_THRESHOLD_FT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

/// Deepest undo history a config may ask for.
pub const MAX_HISTORY_CAPACITY: usize = 1000;

/// Configuration for the boundary editor.
///
/// Every field is optional when loading from JSON; missing fields take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Clicks closer than this to an existing vertex reuse its coordinate. Default: **30 ft**.
    pub snap_threshold_ft: f64,

    /// Clicks closer than this to a segment select it. Default: **15 ft**.
    pub hit_threshold_ft: f64,

    /// Maximum undo depth. Default: **25**.
    pub history_capacity: usize,

    /// Pushes closer together than this collapse into one undo step. Default: **500 ms**.
    pub coalesce_window_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold_ft: DEFAULT_SNAP_THRESHOLD_FT,
            hit_threshold_ft: DEFAULT_HIT_THRESHOLD_FT,
            history_capacity: 25,
            coalesce_window_ms: 500,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config.
    ///
    /// # Errors
    /// Returns [`ConfigError`] on malformed JSON, a non-positive threshold or
    /// an out-of-range history capacity.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check thresholds and history capacity are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("snap_threshold_ft", self.snap_threshold_ft),
            ("hit_threshold_ft", self.hit_threshold_ft),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::NotPositive {
                field: "history_capacity",
                value: 0.0,
            });
        }
        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::TooLarge {
                field: "history_capacity",
                value: self.history_capacity as u64,
                max: MAX_HISTORY_CAPACITY as u64,
            });
        }
        Ok(())
    }

    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_window_ms)
    }
}
