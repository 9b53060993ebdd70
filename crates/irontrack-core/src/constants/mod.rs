// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Tuning defaults for item geometry, gesture timing, editing steps, and feedback cues
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! These are defaults, not invariants. Every value here is surfaced through the
//! engine configuration so it can be tuned without touching the state machines.

/// Item geometry in CSS pixels
pub mod geometry {
    /// Height of a set row: 80px card plus 16px gap
    pub const SET_ITEM_HEIGHT: f64 = 96.0;
    /// Height of a drop row: 64px card plus 8px gap
    pub const DROP_ITEM_HEIGHT: f64 = 72.0;
    /// Settled offsets closer than this to the canonical offset are left alone
    pub const SNAP_TOLERANCE: f64 = 2.0;
    /// Opacity applied to the list while the series lock is engaged
    pub const LOCKED_OPACITY: f64 = 0.5;
}

/// Gesture and animation timing in milliseconds
pub mod timing {
    /// Quiet period after the last scroll update before snapping
    pub const SETTLE_DEBOUNCE_MS: u64 = 150;
    /// Delay between completing a set and activating the next one
    pub const ADVANCE_DELAY_MS: u64 = 400;
    /// Duration of the "validating" highlight after a set is completed
    pub const VALIDATE_FLASH_MS: u64 = 600;
    /// Rest countdown tick interval
    pub const REST_TICK_MS: u64 = 1_000;
}

/// Rest timer defaults
pub mod rest {
    /// Seconds added by the "+30s" control
    pub const EXTEND_STEP_SECONDS: u32 = 30;
    /// Rest duration used when an exercise protocol carries none
    pub const FALLBACK_REST_SECONDS: u32 = 90;
}

/// Value picker domains
pub mod editing {
    /// Weight adjustment step in kilograms
    pub const WEIGHT_STEP: f64 = 2.5;
    /// Reps adjustment step
    pub const REPS_STEP: u32 = 1;
    /// Upper bound accepted by the weight picker
    pub const MAX_WEIGHT: f64 = 999.0;
    /// Upper bound accepted by the reps picker
    pub const MAX_REPS: u32 = 999;
    /// Weights are stored rounded to this many decimal places
    pub const WEIGHT_DECIMALS: i32 = 2;
}

/// Haptic and audio cues
pub mod feedback {
    /// Vibration when the centered item changes during a drag
    pub const SELECTION_TICK_MS: u32 = 8;
    /// Vibration when a set is validated
    pub const SET_VALIDATED_MS: u32 = 50;
    /// Vibration pattern when the rest countdown reaches zero
    pub const REST_COMPLETE_PATTERN: [u32; 3] = [200, 100, 200];
}

/// Wire-format strings
pub mod wire {
    /// Serialized form of the muscular-failure reps sentinel
    pub const FAILURE: &str = "failure";
    /// Legacy sentinel accepted on input
    pub const FAILURE_LEGACY: &str = "échec";
    /// Display glyph for the failure sentinel
    pub const FAILURE_GLYPH: &str = "∞";
}
