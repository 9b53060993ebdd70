// ABOUTME: Set logger configuration with environment overrides and validation
// ABOUTME: Groups geometry, gesture timing, rest, editing and feedback tuning values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Set Logger Configuration
//!
//! Every debounce window and animation delay is a tuning value, not a
//! correctness requirement. They all live here with defaults taken from
//! `irontrack_core::constants` and can be overridden through `IRONTRACK_*`
//! environment variables.

use irontrack_core::constants::{editing, geometry, rest, timing};
use irontrack_core::errors::AppError;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::geometry::ItemHeights;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Relationship between two values is invalid
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string()).with_source(error)
    }
}

/// Parse an environment variable, falling back to `default` when unset or unparsable
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Boolean environment flag accepting `true/false/1/0`
fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key).as_deref().map(str::trim) {
        Ok("1" | "true" | "TRUE" | "yes") => true,
        Ok("0" | "false" | "FALSE" | "no") => false,
        _ => default,
    }
}

/// Row heights and snapping tolerance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Height of a set row in pixels
    pub set_item_height: f64,
    /// Height of a drop row in pixels
    pub drop_item_height: f64,
    /// Settled offsets within this distance of the canonical offset are not re-animated
    pub snap_tolerance: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            set_item_height: geometry::SET_ITEM_HEIGHT,
            drop_item_height: geometry::DROP_ITEM_HEIGHT,
            snap_tolerance: geometry::SNAP_TOLERANCE,
        }
    }
}

impl GeometryConfig {
    /// Height rule for the geometry mapper
    #[must_use]
    pub const fn heights(&self) -> ItemHeights {
        ItemHeights {
            set: self.set_item_height,
            drop: self.drop_item_height,
        }
    }
}

/// Gesture and animation timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Quiet period before snapping, in milliseconds
    pub settle_debounce_ms: u64,
    /// Delay before advancing to the next set, in milliseconds
    pub advance_delay_ms: u64,
    /// Duration of the validation highlight, in milliseconds
    pub validate_flash_ms: u64,
    /// Rest countdown tick, in milliseconds
    pub rest_tick_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_debounce_ms: timing::SETTLE_DEBOUNCE_MS,
            advance_delay_ms: timing::ADVANCE_DELAY_MS,
            validate_flash_ms: timing::VALIDATE_FLASH_MS,
            rest_tick_ms: timing::REST_TICK_MS,
        }
    }
}

impl TimingConfig {
    /// Settle debounce window
    #[must_use]
    pub const fn settle_debounce(&self) -> Duration {
        Duration::from_millis(self.settle_debounce_ms)
    }

    /// Advance delay after completion
    #[must_use]
    pub const fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    /// Validation highlight duration
    #[must_use]
    pub const fn validate_flash(&self) -> Duration {
        Duration::from_millis(self.validate_flash_ms)
    }

    /// Rest tick interval
    #[must_use]
    pub const fn rest_tick(&self) -> Duration {
        Duration::from_millis(self.rest_tick_ms)
    }
}

/// Rest timer controls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Seconds added per extend
    pub extend_step_seconds: u32,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            extend_step_seconds: rest::EXTEND_STEP_SECONDS,
        }
    }
}

/// Value picker steps and domains
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditingConfig {
    /// Weight step in kilograms
    pub weight_step: f64,
    /// Reps step
    pub reps_step: u32,
    /// Largest accepted weight
    pub max_weight: f64,
    /// Largest accepted rep count
    pub max_reps: u32,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            weight_step: editing::WEIGHT_STEP,
            reps_step: editing::REPS_STEP,
            max_weight: editing::MAX_WEIGHT,
            max_reps: editing::MAX_REPS,
        }
    }
}

/// Athlete feedback preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Play the audio cue when rest ends
    pub sound_enabled: bool,
    /// Use vibration cues
    pub vibration_enabled: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            vibration_enabled: true,
        }
    }
}

/// Complete set logger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLoggerConfig {
    /// Row geometry
    pub geometry: GeometryConfig,
    /// Gesture timing
    pub timing: TimingConfig,
    /// Rest timer
    pub rest: RestConfig,
    /// Value pickers
    pub editing: EditingConfig,
    /// Haptic and audio cues
    pub feedback: FeedbackConfig,
    /// Whether drops are interleaved into the set list
    #[serde(default = "default_show_drops")]
    pub show_drops: bool,
}

const fn default_show_drops() -> bool {
    true
}

impl Default for SetLoggerConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::default(),
            timing: TimingConfig::default(),
            rest: RestConfig::default(),
            editing: EditingConfig::default(),
            feedback: FeedbackConfig::default(),
            show_drops: default_show_drops(),
        }
    }
}

impl SetLoggerConfig {
    /// Load configuration from environment, falling back to defaults per field
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::new();
        Self {
            geometry: GeometryConfig {
                set_item_height: env_or(
                    "IRONTRACK_SET_ITEM_HEIGHT",
                    defaults.geometry.set_item_height,
                ),
                drop_item_height: env_or(
                    "IRONTRACK_DROP_ITEM_HEIGHT",
                    defaults.geometry.drop_item_height,
                ),
                snap_tolerance: env_or("IRONTRACK_SNAP_TOLERANCE", defaults.geometry.snap_tolerance),
            },
            timing: TimingConfig {
                settle_debounce_ms: env_or(
                    "IRONTRACK_SETTLE_DEBOUNCE_MS",
                    defaults.timing.settle_debounce_ms,
                ),
                advance_delay_ms: env_or(
                    "IRONTRACK_ADVANCE_DELAY_MS",
                    defaults.timing.advance_delay_ms,
                ),
                validate_flash_ms: env_or(
                    "IRONTRACK_VALIDATE_FLASH_MS",
                    defaults.timing.validate_flash_ms,
                ),
                rest_tick_ms: env_or("IRONTRACK_REST_TICK_MS", defaults.timing.rest_tick_ms),
            },
            rest: RestConfig {
                extend_step_seconds: env_or(
                    "IRONTRACK_REST_EXTEND_SECONDS",
                    defaults.rest.extend_step_seconds,
                ),
            },
            editing: EditingConfig {
                weight_step: env_or("IRONTRACK_WEIGHT_STEP", defaults.editing.weight_step),
                reps_step: env_or("IRONTRACK_REPS_STEP", defaults.editing.reps_step),
                max_weight: env_or("IRONTRACK_MAX_WEIGHT", defaults.editing.max_weight),
                max_reps: env_or("IRONTRACK_MAX_REPS", defaults.editing.max_reps),
            },
            feedback: FeedbackConfig {
                sound_enabled: env_flag("IRONTRACK_SOUND", defaults.feedback.sound_enabled),
                vibration_enabled: env_flag(
                    "IRONTRACK_VIBRATION",
                    defaults.feedback.vibration_enabled,
                ),
            },
            show_drops: env_flag("IRONTRACK_SHOW_DROPS", defaults.show_drops),
        }
    }

    /// Default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate relationships between values
    ///
    /// # Errors
    ///
    /// Returns an error if a height or step is not a positive finite number,
    /// if drop rows are taller than set rows, or if the rest tick is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let geometry = &self.geometry;
        if !(geometry.set_item_height.is_finite() && geometry.set_item_height > 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "set_item_height must be a positive number",
            ));
        }
        if !(geometry.drop_item_height.is_finite() && geometry.drop_item_height > 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "drop_item_height must be a positive number",
            ));
        }
        if geometry.drop_item_height > geometry.set_item_height {
            return Err(ConfigError::InvalidRange(
                "drop_item_height must not exceed set_item_height",
            ));
        }
        if !(geometry.snap_tolerance.is_finite() && geometry.snap_tolerance >= 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "snap_tolerance must be zero or positive",
            ));
        }
        if self.timing.rest_tick_ms == 0 {
            return Err(ConfigError::ValueOutOfRange("rest_tick_ms must be non-zero"));
        }
        if !(self.editing.weight_step.is_finite() && self.editing.weight_step > 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "weight_step must be a positive number",
            ));
        }
        if self.editing.reps_step == 0 {
            return Err(ConfigError::ValueOutOfRange("reps_step must be non-zero"));
        }
        if !(self.editing.max_weight.is_finite() && self.editing.max_weight >= 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "max_weight must be zero or positive",
            ));
        }
        Ok(())
    }
}
