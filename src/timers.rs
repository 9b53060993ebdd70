// ABOUTME: Owned, cancelable one-shot deadlines on the session clock
// ABOUTME: Each engine owns its slots and cancels them all on teardown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Timer Slots
//!
//! The engines never spawn timers themselves. They arm a `TimerSlot` with a
//! deadline on the session clock (time elapsed since the session started) and
//! the host calls `poll(now)` when the earliest deadline is reached. A
//! cancelled slot cannot fire, so nothing can run against torn-down state.

use std::time::Duration;

/// A single pending deadline, or nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<Duration>,
}

impl TimerSlot {
    /// An unarmed slot
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) the slot to fire `after` from `now`
    pub fn arm(&mut self, now: Duration, after: Duration) {
        self.deadline = Some(now.saturating_add(after));
    }

    /// Disarm the slot
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline, if any
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Whether the pending deadline has been reached
    #[must_use]
    pub fn is_due(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }

    /// Disarm and report `true` if the deadline has been reached
    pub fn take_if_due(&mut self, now: Duration) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

/// Earliest of several optional deadlines
#[must_use]
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Duration>>) -> Option<Duration> {
    deadlines.into_iter().flatten().min()
}
