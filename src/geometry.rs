// ABOUTME: Geometry mapper between item indices and scroll offsets
// ABOUTME: Prefix sums over heterogeneous set/drop heights, rebuilt with the item list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Geometry Mapper
//!
//! Set rows are taller than drop rows, so `offset / item_height` is wrong as
//! soon as a drop is visible. The mapper precomputes each item's start offset
//! and midpoint once per item list and answers both directions from those
//! arrays. Midpoints are strictly increasing, which makes the centered-item
//! lookup a binary search and keeps it cheap enough for every scroll frame.
//!
//! Coordinates: offset 0 is the top edge of the first item. The host view pads
//! its content so that any item can be centered, which means a scroll offset may
//! be negative near the start of the list.

use irontrack_core::constants::geometry::{DROP_ITEM_HEIGHT, SET_ITEM_HEIGHT};
use serde::{Deserialize, Serialize};

use crate::sequencer::{Item, ItemKind};

/// Height rule: one fixed height per item kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemHeights {
    /// Height of a set row
    pub set: f64,
    /// Height of a drop row
    pub drop: f64,
}

impl ItemHeights {
    /// Height for an item kind
    #[must_use]
    pub const fn of(&self, kind: ItemKind) -> f64 {
        match kind {
            ItemKind::Set => self.set,
            ItemKind::Drop => self.drop,
        }
    }
}

impl Default for ItemHeights {
    fn default() -> Self {
        Self {
            set: SET_ITEM_HEIGHT,
            drop: DROP_ITEM_HEIGHT,
        }
    }
}

/// Index/offset conversions for one item list
#[derive(Debug, Clone, Default)]
pub struct GeometryMapper {
    /// `offsets[i]` is the sum of heights strictly before item `i`; one extra entry holds the total
    offsets: Vec<f64>,
    /// Midpoint of each item
    midpoints: Vec<f64>,
}

impl GeometryMapper {
    /// Build the prefix sums for an item list
    #[must_use]
    pub fn new(items: &[Item], heights: ItemHeights) -> Self {
        let mut offsets = Vec::with_capacity(items.len() + 1);
        let mut midpoints = Vec::with_capacity(items.len());
        let mut accumulated = 0.0;
        offsets.push(accumulated);
        for item in items {
            let height = heights.of(item.kind());
            midpoints.push(accumulated + height / 2.0);
            accumulated += height;
            offsets.push(accumulated);
        }
        Self { offsets, midpoints }
    }

    /// Number of items covered
    #[must_use]
    pub fn len(&self) -> usize {
        self.midpoints.len()
    }

    /// Whether the item list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.midpoints.is_empty()
    }

    /// Total content height
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    /// Height of the item at `index`, or 0 when out of range
    #[must_use]
    pub fn height_of(&self, index: usize) -> f64 {
        match (self.offsets.get(index), self.offsets.get(index + 1)) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// Sum of heights of all items strictly before `index`
    ///
    /// Indices past the end saturate to the total content height.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> f64 {
        let clamped = index.min(self.len());
        self.offsets.get(clamped).copied().unwrap_or(0.0)
    }

    /// Scroll offset that places item `index` exactly in the middle of the viewport
    ///
    /// Equals `offset_of(index)` when the viewport is as tall as the item.
    #[must_use]
    pub fn centered_offset_of(&self, index: usize, viewport_height: f64) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let index = index.min(self.len() - 1);
        self.offset_of(index) + (self.height_of(index) - viewport_height) / 2.0
    }

    /// Index of the item whose midpoint is closest to the viewport midpoint
    ///
    /// Ties go to the earlier index. Results are clamped to the item range.
    /// Returns `None` for an empty list or a non-finite input instead of
    /// producing a meaningless index.
    #[must_use]
    pub fn index_at_center(&self, scroll_offset: f64, viewport_height: f64) -> Option<usize> {
        if self.is_empty() || !scroll_offset.is_finite() || !viewport_height.is_finite() {
            return None;
        }
        let center = scroll_offset + viewport_height / 2.0;

        // First midpoint at or past the viewport center; the answer is it or its predecessor
        let after = self.midpoints.partition_point(|mid| *mid < center);
        if after == 0 {
            return Some(0);
        }
        if after == self.len() {
            return Some(self.len() - 1);
        }
        let before = after - 1;
        let distance_before = center - self.midpoints[before];
        let distance_after = self.midpoints[after] - center;
        if distance_after < distance_before {
            Some(after)
        } else {
            Some(before)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_items() -> Vec<Item> {
        vec![
            Item::Set { set_index: 0 },
            Item::Drop {
                set_index: 0,
                drop_index: 0,
            },
            Item::Set { set_index: 1 },
        ]
    }

    #[test]
    fn test_offsets_accumulate_heterogeneous_heights() {
        let mapper = GeometryMapper::new(&mixed_items(), ItemHeights::default());
        assert_eq!(mapper.offset_of(0), 0.0);
        assert_eq!(mapper.offset_of(1), 96.0);
        assert_eq!(mapper.offset_of(2), 168.0);
        assert_eq!(mapper.offset_of(99), 264.0);
        assert_eq!(mapper.total_height(), 264.0);
    }

    #[test]
    fn test_tie_breaks_to_earlier_index() {
        let items = vec![Item::Set { set_index: 0 }, Item::Set { set_index: 1 }];
        let mapper = GeometryMapper::new(&items, ItemHeights::default());
        // Midpoints at 48 and 144; center at 96 is equidistant
        assert_eq!(mapper.index_at_center(96.0, 0.0), Some(0));
        assert_eq!(mapper.index_at_center(96.5, 0.0), Some(1));
    }

    #[test]
    fn test_nearest_midpoint_can_be_the_next_item() {
        let mapper = GeometryMapper::new(&mixed_items(), ItemHeights::default());
        // Center at 95 is inside the first row, yet 37px from the drop midpoint vs 47px from its own
        assert_eq!(mapper.index_at_center(95.0, 0.0), Some(1));
    }

    #[test]
    fn test_empty_and_non_finite_inputs() {
        let mapper = GeometryMapper::new(&[], ItemHeights::default());
        assert_eq!(mapper.index_at_center(0.0, 400.0), None);
        assert_eq!(mapper.centered_offset_of(3, 400.0), 0.0);
        let mapper = GeometryMapper::new(&mixed_items(), ItemHeights::default());
        assert_eq!(mapper.index_at_center(f64::NAN, 400.0), None);
    }
}
