//! Game configuration
//!
//! Every field has a default; JS may override any subset with a JSON object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::{ClassifierConfig, DEFAULT_FINGER_TOLERANCE, DEFAULT_THUMB_TOLERANCE};

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{name} must be a finite value in [0, 1), got {value}")]
    InvalidTolerance { name: &'static str, value: f32 },
    #[error("countdown_seconds must be at least 1")]
    ZeroCountdown,
}

/// Round timing and classifier thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Lateral margin for the thumb test (normalized units).
    pub thumb_tolerance: f32,
    /// Vertical margin for the other four fingers (normalized units).
    pub finger_tolerance: f32,
    /// Countdown start value, one tick per second.
    pub countdown_seconds: u32,
    /// A hand must have been seen this recently for a round to start.
    pub hand_presence_timeout_ms: u32,
    /// Pause between "go" and freezing the player's gesture.
    pub settle_delay_ms: u32,
    /// Pause after the outcome before a new round may start.
    pub cooldown_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            thumb_tolerance: DEFAULT_THUMB_TOLERANCE,
            finger_tolerance: DEFAULT_FINGER_TOLERANCE,
            countdown_seconds: 3,
            hand_presence_timeout_ms: 1200,
            settle_delay_ms: 200,
            cooldown_delay_ms: 1500,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_tolerance("thumb_tolerance", self.thumb_tolerance)?;
        check_tolerance("finger_tolerance", self.finger_tolerance)?;
        if self.countdown_seconds == 0 {
            return Err(ConfigError::ZeroCountdown);
        }
        Ok(())
    }

    pub fn classifier(&self) -> ClassifierConfig {
        ClassifierConfig {
            thumb_tolerance: self.thumb_tolerance,
            finger_tolerance: self.finger_tolerance,
        }
    }
}

fn check_tolerance(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidTolerance { name, value })
    }
}
