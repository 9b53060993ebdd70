// ABOUTME: Selection controller mapping continuous scroll input to one active item
// ABOUTME: Idle/dragging/snapping state machine with settle debounce, lock and scroll suppression
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Selection Controller
//!
//! ```text
//!            pointer down / scroll (unlocked)
//!   Idle ─────────────────────────────────────► Dragging ◄──┐ scroll
//!    ▲                                              │ ───────┘ (re-arms settle)
//!    │ already aligned                              │ settle debounce elapsed
//!    │◄─────────────────────────────────────────────┤
//!    │                                              ▼
//!    └──── animation finished / target reached ── Snapping
//! ```
//!
//! While a programmatic scroll is in flight (a snap or `scroll_to_index`) the
//! controller holds a suppression target. Scroll updates are then treated as
//! echoes of that scroll and never change the active item.

use irontrack_core::constants::geometry::LOCKED_OPACITY;
use irontrack_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::SetLoggerConfig;
use crate::events::ScrollCommand;
use crate::geometry::{GeometryMapper, ItemHeights};
use crate::sequencer::Item;
use crate::timers::TimerSlot;

/// Gesture phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    /// No gesture and no programmatic scroll
    #[default]
    Idle,
    /// The athlete is moving the list
    Dragging,
    /// A programmatic scroll to a canonical offset is in flight
    Snapping,
}

/// Owns the active index for one item list
#[derive(Debug, Clone)]
pub struct SelectionController {
    items: Vec<Item>,
    heights: ItemHeights,
    geometry: GeometryMapper,
    active_index: usize,
    locked: bool,
    phase: SelectionPhase,
    viewport_height: f64,
    last_offset: f64,
    suppression: Option<f64>,
    settle: TimerSlot,
    settle_debounce: Duration,
    snap_tolerance: f64,
}

impl SelectionController {
    /// Create a controller for `items`, activating the first one
    #[must_use]
    pub fn new(items: Vec<Item>, config: &SetLoggerConfig) -> Self {
        let heights = config.geometry.heights();
        let geometry = GeometryMapper::new(&items, heights);
        Self {
            items,
            heights,
            geometry,
            active_index: 0,
            locked: false,
            phase: SelectionPhase::Idle,
            viewport_height: heights.set,
            last_offset: 0.0,
            suppression: None,
            settle: TimerSlot::new(),
            settle_debounce: config.timing.settle_debounce(),
            snap_tolerance: config.geometry.snap_tolerance,
        }
    }

    /// Current item list
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Geometry for the current item list
    #[must_use]
    pub const fn geometry(&self) -> &GeometryMapper {
        &self.geometry
    }

    /// Active position; always 0 for an empty list
    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active_index
    }

    /// Active item, `None` only for an empty list
    #[must_use]
    pub fn active_item(&self) -> Option<Item> {
        self.items.get(self.active_index).copied()
    }

    /// Whether the series lock is engaged
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Current gesture phase
    #[must_use]
    pub const fn phase(&self) -> SelectionPhase {
        self.phase
    }

    /// Last reported viewport height
    #[must_use]
    pub const fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Last reported scroll offset
    #[must_use]
    pub const fn last_offset(&self) -> f64 {
        self.last_offset
    }

    /// Whether a programmatic scroll is still in flight
    #[must_use]
    pub const fn is_suppressing(&self) -> bool {
        self.suppression.is_some()
    }

    /// Pending settle deadline
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Duration> {
        self.settle.deadline()
    }

    /// Opacity the host renders the list with
    #[must_use]
    pub const fn view_opacity(&self) -> f64 {
        if self.locked {
            LOCKED_OPACITY
        } else {
            1.0
        }
    }

    /// Finger went down on the list
    ///
    /// Taking hold of the list interrupts any programmatic scroll.
    pub fn pointer_down(&mut self, now: Duration) {
        if self.locked || self.items.is_empty() {
            return;
        }
        self.suppression = None;
        self.phase = SelectionPhase::Dragging;
        self.settle.arm(now, self.settle_debounce);
    }

    /// Scroll position update; returns the new active index when it changed
    pub fn scroll(&mut self, offset: f64, now: Duration) -> Option<usize> {
        if !offset.is_finite() {
            return None;
        }
        self.last_offset = offset;

        if let Some(target) = self.suppression {
            if (offset - target).abs() <= self.snap_tolerance {
                self.finish_programmatic_scroll();
            }
            return None;
        }
        if self.locked || self.items.is_empty() {
            return None;
        }

        self.phase = SelectionPhase::Dragging;
        self.settle.arm(now, self.settle_debounce);

        let centered = self.geometry.index_at_center(offset, self.viewport_height)?;
        if centered == self.active_index {
            return None;
        }
        self.active_index = centered;
        debug!(active_index = centered, offset, "Active item changed during drag");
        Some(centered)
    }

    /// Fire the settle debounce when due
    ///
    /// Returns the snap the host must animate, if the settled position is not
    /// already aligned. The active index is re-derived from the settled offset.
    pub fn poll(&mut self, now: Duration) -> Option<ScrollCommand> {
        if !self.settle.take_if_due(now) || self.phase != SelectionPhase::Dragging {
            return None;
        }
        let Some(centered) = self
            .geometry
            .index_at_center(self.last_offset, self.viewport_height)
        else {
            self.phase = SelectionPhase::Idle;
            return None;
        };
        self.active_index = centered;

        let target = self.geometry.centered_offset_of(centered, self.viewport_height);
        if (self.last_offset - target).abs() <= self.snap_tolerance {
            self.phase = SelectionPhase::Idle;
            return None;
        }
        debug!(active_index = centered, from = self.last_offset, to = target, "Snapping");
        self.phase = SelectionPhase::Snapping;
        self.suppression = Some(target);
        Some(ScrollCommand {
            offset: target,
            animated: true,
        })
    }

    /// Host reports the end of a programmatic scroll animation
    pub fn scroll_animation_finished(&mut self) {
        self.finish_programmatic_scroll();
    }

    fn finish_programmatic_scroll(&mut self) {
        if let Some(target) = self.suppression.take() {
            self.last_offset = target;
        }
        if self.phase == SelectionPhase::Snapping {
            self.phase = SelectionPhase::Idle;
        }
    }

    /// Activate `index` and center it, suppressing drag handling until the scroll lands
    pub fn scroll_to_index(&mut self, index: usize, animated: bool) -> Option<ScrollCommand> {
        if self.items.is_empty() {
            return None;
        }
        self.active_index = index.min(self.items.len() - 1);
        self.settle.cancel();

        let target = self
            .geometry
            .centered_offset_of(self.active_index, self.viewport_height);
        if (self.last_offset - target).abs() <= self.snap_tolerance {
            self.suppression = None;
            self.phase = SelectionPhase::Idle;
            return None;
        }
        self.suppression = Some(target);
        self.phase = SelectionPhase::Snapping;
        Some(ScrollCommand {
            offset: target,
            animated,
        })
    }

    /// Engage or release the series lock
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when the list is empty or a drop is active;
    /// locking applies to top-level sets only
    pub fn set_locked(&mut self, locked: bool) -> AppResult<()> {
        match self.active_item() {
            None => Err(AppError::invalid_state("no active item to lock")),
            Some(Item::Drop { .. }) => Err(AppError::invalid_state(
                "lock can only be toggled on a set, not a drop",
            )),
            Some(Item::Set { .. }) => {
                self.locked = locked;
                if locked {
                    self.settle.cancel();
                    if self.phase == SelectionPhase::Dragging {
                        self.phase = SelectionPhase::Idle;
                    }
                }
                Ok(())
            }
        }
    }

    /// Release the lock unconditionally
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Replace the item list after the sets or drop visibility changed
    ///
    /// The previously active item stays active at its new position. If it was
    /// a drop that no longer exists, its owning set takes over; otherwise the
    /// old index is clamped into the new range.
    pub fn set_items(&mut self, items: Vec<Item>) {
        let previous = self.active_item();
        self.geometry = GeometryMapper::new(&items, self.heights);
        self.items = items;

        if self.items.is_empty() {
            self.active_index = 0;
            self.settle.cancel();
            self.suppression = None;
            self.phase = SelectionPhase::Idle;
            return;
        }

        let last = self.items.len() - 1;
        self.active_index = previous
            .and_then(|item| {
                self.position_of(item).or_else(|| {
                    self.position_of(Item::Set {
                        set_index: item.set_index(),
                    })
                })
            })
            .unwrap_or_else(|| self.active_index.min(last));
    }

    fn position_of(&self, item: Item) -> Option<usize> {
        self.items.iter().position(|candidate| *candidate == item)
    }

    /// Host viewport resized
    pub fn set_viewport_height(&mut self, height: f64) {
        if height.is_finite() && height >= 0.0 {
            self.viewport_height = height;
        }
    }

    /// Cancel the settle timer and drop any in-flight scroll
    pub fn teardown(&mut self) {
        self.settle.cancel();
        self.suppression = None;
        self.phase = SelectionPhase::Idle;
    }
}
