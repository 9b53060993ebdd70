// ABOUTME: Pending completion effects: the validation highlight and the delayed advance
// ABOUTME: Both are owned, cancelable timers so a torn-down session never advances
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Completion Tracker
//!
//! Holds the two timed side effects of logging a set. The advance target is
//! resolved when the delay elapses, not when the set is logged, so an item
//! list rebuilt in between is still navigated correctly.

use std::time::Duration;

use crate::config::TimingConfig;
use crate::sequencer::{next_set_position, position_of_set, Item};
use crate::timers::{earliest, TimerSlot};

/// Timed effects that follow a completed set
#[derive(Debug, Clone, Default)]
pub struct CompletionTracker {
    flash: TimerSlot,
    flashing: Option<usize>,
    advance: TimerSlot,
    advance_from: Option<usize>,
}

impl CompletionTracker {
    /// Create an idle tracker
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flash: TimerSlot::new(),
            flashing: None,
            advance: TimerSlot::new(),
            advance_from: None,
        }
    }

    /// Schedule the effects of completing `set_index`
    ///
    /// Returns the set whose highlight was cut short by this completion.
    pub fn begin(
        &mut self,
        set_index: usize,
        advance: bool,
        now: Duration,
        timing: &TimingConfig,
    ) -> Option<usize> {
        let interrupted = self.flashing.replace(set_index).filter(|prev| *prev != set_index);
        self.flash.arm(now, timing.validate_flash());
        if advance {
            self.advance_from = Some(set_index);
            self.advance.arm(now, timing.advance_delay());
        } else {
            self.advance_from = None;
            self.advance.cancel();
        }
        interrupted
    }

    /// Set currently highlighted
    #[must_use]
    pub const fn validating(&self) -> Option<usize> {
        self.flashing
    }

    /// Earliest pending deadline
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        earliest([self.flash.deadline(), self.advance.deadline()])
    }

    /// Flash deadline
    #[must_use]
    pub const fn flash_deadline(&self) -> Option<Duration> {
        self.flash.deadline()
    }

    /// Advance deadline
    #[must_use]
    pub const fn advance_deadline(&self) -> Option<Duration> {
        self.advance.deadline()
    }

    /// End the highlight when due; returns the set it was on
    pub fn fire_flash(&mut self, now: Duration) -> Option<usize> {
        if self.flash.take_if_due(now) {
            self.flashing.take()
        } else {
            None
        }
    }

    /// Resolve the advance when due; returns the item position to activate
    ///
    /// Drops between the completed set and the next set are skipped. Nothing
    /// is returned when the completed set was the last one.
    pub fn fire_advance(&mut self, now: Duration, items: &[Item]) -> Option<usize> {
        if !self.advance.take_if_due(now) {
            return None;
        }
        let from = self.advance_from.take()?;
        let position = position_of_set(items, from)?;
        next_set_position(items, position)
    }

    /// Drop the pending advance, keeping the highlight; returns whether one was pending
    pub fn cancel_advance(&mut self) -> bool {
        let pending = self.advance.deadline().is_some();
        self.advance.cancel();
        self.advance_from = None;
        pending
    }

    /// Cancel both effects
    pub fn teardown(&mut self) {
        self.flash.cancel();
        self.flashing = None;
        self.advance.cancel();
        self.advance_from = None;
    }
}
