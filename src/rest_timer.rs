// ABOUTME: Rest countdown state machine driven by an owned one-second tick
// ABOUTME: Supports start, pause, resume, skip and extend; reaching zero returns to idle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Rest Timer
//!
//! `running` is the single authoritative flag for ticking. Every operation
//! checks it, so a tick that arrives after a skip, a pause or after expiry is
//! a no-op rather than a decrement of stale state. A paused countdown keeps
//! its remaining seconds but owns no tick.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::timers::TimerSlot;

/// Countdown state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestState {
    /// No countdown; zero seconds remaining
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Held with seconds remaining
    Paused,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second elapsed, more remain
    Ticked(u32),
    /// Countdown reached zero
    Finished,
}

/// Serializable view of the timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestSnapshot {
    /// Idle, running or paused
    pub state: RestState,
    /// Seconds left
    pub seconds_remaining: u32,
    /// Countdown length including extensions
    pub total_seconds: u32,
    /// `m:ss` display string
    pub formatted: String,
    /// Remaining fraction in `[0, 1]`
    pub progress: f64,
}

/// Rest countdown between sets
#[derive(Debug, Clone)]
pub struct RestTimer {
    remaining: u32,
    total: u32,
    running: bool,
    paused: bool,
    tick: TimerSlot,
    interval: Duration,
}

impl RestTimer {
    /// Create an idle timer ticking every `interval`
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            remaining: 0,
            total: 0,
            running: false,
            paused: false,
            tick: TimerSlot::new(),
            interval,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> RestState {
        if self.running {
            RestState::Running
        } else if self.paused {
            RestState::Paused
        } else {
            RestState::Idle
        }
    }

    /// Whether the countdown is active
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the countdown is held
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Seconds left
    #[must_use]
    pub const fn seconds_remaining(&self) -> u32 {
        self.remaining
    }

    /// Countdown length including extensions
    #[must_use]
    pub const fn total_seconds(&self) -> u32 {
        self.total
    }

    /// Pending tick deadline
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Duration> {
        self.tick.deadline()
    }

    /// Start a countdown, overriding any running or paused one
    ///
    /// A zero duration leaves the timer idle.
    pub fn start(&mut self, seconds: u32, now: Duration) {
        self.remaining = seconds;
        self.total = seconds;
        self.running = seconds > 0;
        self.paused = false;
        if self.running {
            self.tick.arm(now, self.interval);
        } else {
            self.tick.cancel();
        }
    }

    /// Hold a running countdown; returns whether it applied
    ///
    /// The partial second already elapsed is discarded.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.paused = true;
        self.tick.cancel();
        true
    }

    /// Continue a paused countdown, next tick one interval after `now`
    pub fn resume(&mut self, now: Duration) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        self.running = true;
        self.tick.arm(now, self.interval);
        true
    }

    /// Abandon the countdown; returns whether one was running or paused
    pub fn skip(&mut self) -> bool {
        if !self.running && !self.paused {
            return false;
        }
        self.stop();
        true
    }

    /// Lengthen a running or paused countdown; returns whether it applied
    pub fn extend(&mut self, seconds: u32) -> bool {
        if !self.running && !self.paused {
            return false;
        }
        self.remaining = self.remaining.saturating_add(seconds);
        self.total = self.total.saturating_add(seconds);
        true
    }

    /// Decrement by one second
    ///
    /// Does nothing unless running. The tick deadline is left alone; use
    /// [`RestTimer::fire`] to drive the timer from a clock.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stop();
            Some(TickOutcome::Finished)
        } else {
            Some(TickOutcome::Ticked(self.remaining))
        }
    }

    /// Fire one due tick and re-arm from its own deadline
    pub fn fire(&mut self, now: Duration) -> Option<TickOutcome> {
        let deadline = self.tick.deadline()?;
        if !self.tick.take_if_due(now) {
            return None;
        }
        let outcome = self.tick();
        if self.running {
            self.tick.arm(deadline, self.interval);
        }
        outcome
    }

    fn stop(&mut self) {
        self.remaining = 0;
        self.running = false;
        self.paused = false;
        self.tick.cancel();
    }

    /// Cancel the tick; nothing survives teardown
    pub fn teardown(&mut self) {
        self.stop();
        self.total = 0;
    }

    /// Countdown as `m:ss`
    #[must_use]
    pub fn formatted_remaining(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    /// Remaining fraction of the countdown
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (f64::from(self.remaining) / f64::from(self.total)).clamp(0.0, 1.0)
    }

    /// Serializable view
    #[must_use]
    pub fn snapshot(&self) -> RestSnapshot {
        RestSnapshot {
            state: self.state(),
            seconds_remaining: self.remaining,
            total_seconds: self.total,
            formatted: self.formatted_remaining(),
            progress: self.progress(),
        }
    }
}
