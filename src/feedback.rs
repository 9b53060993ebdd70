// ABOUTME: Best-effort haptic and audio feedback seam for the set logger
// ABOUTME: Backends may be missing on the host platform; failures never reach the athlete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Feedback
//!
//! The engine never talks to a vibration motor or speaker directly. It names
//! a [`FeedbackCue`] and hands it to a [`Feedback`] backend supplied by the
//! host. A backend that is unavailable reports [`FeedbackUnavailable`]; the
//! engine logs it at debug level and carries on.

use irontrack_core::constants::feedback::{
    REST_COMPLETE_PATTERN, SELECTION_TICK_MS, SET_VALIDATED_MS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::FeedbackConfig;

/// Feedback backend could not deliver a cue
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("feedback backend unavailable: {reason}")]
pub struct FeedbackUnavailable {
    /// Why the cue was not delivered
    pub reason: String,
}

impl FeedbackUnavailable {
    /// Create an unavailability report
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Named engine cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCue {
    /// Active item changed during a drag
    SelectionTick,
    /// A set or drop was logged
    SetValidated,
    /// Rest countdown reached zero
    RestComplete,
}

impl FeedbackCue {
    /// Vibration pattern in milliseconds, alternating on/off
    #[must_use]
    pub const fn vibration_pattern(&self) -> &'static [u32] {
        match self {
            Self::SelectionTick => &[SELECTION_TICK_MS],
            Self::SetValidated => &[SET_VALIDATED_MS],
            Self::RestComplete => &REST_COMPLETE_PATTERN,
        }
    }

    /// Whether the cue carries an audio signal
    #[must_use]
    pub const fn has_sound(&self) -> bool {
        matches!(self, Self::RestComplete)
    }
}

/// Host-provided haptic and audio backend
pub trait Feedback: Send {
    /// Run a vibration pattern (milliseconds, alternating on/off)
    ///
    /// # Errors
    ///
    /// Returns `FeedbackUnavailable` when the platform has no vibration support
    fn vibrate(&mut self, pattern_ms: &[u32]) -> Result<(), FeedbackUnavailable>;

    /// Play the audio signal for a cue
    ///
    /// # Errors
    ///
    /// Returns `FeedbackUnavailable` when audio output is not possible
    fn play_sound(&mut self, cue: FeedbackCue) -> Result<(), FeedbackUnavailable>;
}

/// Backend that silently accepts everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFeedback;

impl Feedback for NoopFeedback {
    fn vibrate(&mut self, _pattern_ms: &[u32]) -> Result<(), FeedbackUnavailable> {
        Ok(())
    }

    fn play_sound(&mut self, _cue: FeedbackCue) -> Result<(), FeedbackUnavailable> {
        Ok(())
    }
}

/// Deliver a cue honoring the athlete's preferences, degrading silently
pub fn deliver(backend: &mut dyn Feedback, preferences: &FeedbackConfig, cue: FeedbackCue) {
    if preferences.vibration_enabled {
        if let Err(unavailable) = backend.vibrate(cue.vibration_pattern()) {
            debug!(cue = ?cue, reason = %unavailable.reason, "Vibration unavailable");
        }
    }
    if preferences.sound_enabled && cue.has_sound() {
        if let Err(unavailable) = backend.play_sound(cue) {
            debug!(cue = ?cue, reason = %unavailable.reason, "Audio cue unavailable");
        }
    }
}
