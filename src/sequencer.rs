// ABOUTME: Item sequencer flattening sets and their drops into one ordered list
// ABOUTME: Pure and deterministic; the list is rebuilt, never mutated in place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Item Sequencer
//!
//! Items reference their backing data by position rather than by copy, so an
//! item list always corresponds 1:1 to the `Set`/`DropSet` data it was built
//! from. Any change to that data, or to drop visibility, requires a rebuild.

use irontrack_core::models::{DropSet, Set};
use serde::{Deserialize, Serialize};

/// Kind tag of an item, used for height lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Top-level set row
    Set,
    /// Drop continuation row
    Drop,
}

/// One selectable row of the set list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    /// A top-level set
    Set {
        /// Position of the set in the exercise
        set_index: usize,
    },
    /// A drop continuation of a set
    Drop {
        /// Position of the owning set
        set_index: usize,
        /// Position of the drop within its set
        drop_index: usize,
    },
}

/// Borrowed view of the data an item points at
#[derive(Debug, Clone, Copy)]
pub enum ItemRef<'a> {
    /// Resolved set
    Set(&'a Set),
    /// Resolved drop with its owning set
    Drop {
        /// Owning set
        parent: &'a Set,
        /// The drop itself
        drop: &'a DropSet,
    },
}

impl Item {
    /// Kind tag of this item
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Set { .. } => ItemKind::Set,
            Self::Drop { .. } => ItemKind::Drop,
        }
    }

    /// Position of the set this item belongs to
    #[must_use]
    pub const fn set_index(&self) -> usize {
        match self {
            Self::Set { set_index } | Self::Drop { set_index, .. } => *set_index,
        }
    }

    /// Whether this is a top-level set
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set { .. })
    }

    /// Resolve against the set list the item was built from
    #[must_use]
    pub fn resolve<'a>(&self, sets: &'a [Set]) -> Option<ItemRef<'a>> {
        match *self {
            Self::Set { set_index } => sets.get(set_index).map(ItemRef::Set),
            Self::Drop {
                set_index,
                drop_index,
            } => {
                let parent = sets.get(set_index)?;
                let drop = parent.applicable_drops().get(drop_index)?;
                Some(ItemRef::Drop { parent, drop })
            }
        }
    }
}

/// Flatten sets into the ordered item sequence
///
/// Each set is followed by its applicable drops (in drop order) when
/// `include_drops` is true. Runs in O(sets + drops).
#[must_use]
pub fn build_items(sets: &[Set], include_drops: bool) -> Vec<Item> {
    let capacity = if include_drops {
        sets.iter().map(|set| 1 + set.applicable_drops().len()).sum()
    } else {
        sets.len()
    };

    let mut items = Vec::with_capacity(capacity);
    for (set_index, set) in sets.iter().enumerate() {
        items.push(Item::Set { set_index });
        if include_drops {
            items.extend(
                (0..set.applicable_drops().len()).map(|drop_index| Item::Drop {
                    set_index,
                    drop_index,
                }),
            );
        }
    }
    items
}

/// Position of the first `set` item after `from`, skipping interleaved drops
#[must_use]
pub fn next_set_position(items: &[Item], from: usize) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .skip(from.saturating_add(1))
        .find_map(|(position, item)| item.is_set().then_some(position))
}

/// Position of the item for `set_index`
#[must_use]
pub fn position_of_set(items: &[Item], set_index: usize) -> Option<usize> {
    items
        .iter()
        .position(|item| *item == Item::Set { set_index })
}
