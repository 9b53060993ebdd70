// ABOUTME: Set and Drop models for an exercise being performed
// ABOUTME: A Set exclusively owns its Drops; drops never nest further
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Reps;

/// Role of a set within the exercise
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    /// Preparation set at reduced load
    #[serde(alias = "WARMUP")]
    Warmup,
    /// Set counted toward the prescribed work
    #[default]
    #[serde(alias = "WORKING")]
    Working,
}

impl SetKind {
    /// Whether drop continuations apply to sets of this kind
    ///
    /// Drop-set technique is only prescribed on working sets; any drops attached to
    /// a warm-up are excluded from the item sequence.
    #[must_use]
    pub const fn allows_drops(&self) -> bool {
        matches!(self, Self::Working)
    }
}

/// Reduced-load continuation performed right after its parent set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropSet {
    /// Load in kilograms
    #[serde(default)]
    pub weight: f64,
    /// Reps performed or targeted
    #[serde(default)]
    pub reps: Reps,
    /// Whether the athlete has logged this drop
    #[serde(default)]
    pub completed: bool,
}

impl DropSet {
    /// Create a pending drop
    #[must_use]
    pub const fn new(weight: f64, reps: Reps) -> Self {
        Self {
            weight,
            reps,
            completed: false,
        }
    }
}

/// One top-level unit of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    /// Stable identifier from the workout collaborator
    pub id: u32,
    /// 1-based ordinal shown to the athlete
    #[serde(default)]
    pub set_number: u32,
    /// Warm-up or working set
    #[serde(default, rename = "type")]
    pub kind: SetKind,
    /// Load in kilograms
    #[serde(default)]
    pub weight: f64,
    /// Reps performed or targeted
    #[serde(default)]
    pub reps: Reps,
    /// Whether the athlete has logged this set
    #[serde(default)]
    pub completed: bool,
    /// When the athlete logged this set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Best historical performance for this slot, e.g. "80kg × 10"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_best: Option<String>,
    /// Drop continuations in execution order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drops: Vec<DropSet>,
}

impl Set {
    /// Create a pending working set without drops
    #[must_use]
    pub fn working(id: u32, weight: f64, reps: Reps) -> Self {
        Self {
            id,
            set_number: id,
            kind: SetKind::Working,
            weight,
            reps,
            completed: false,
            completed_at: None,
            previous_best: None,
            drops: Vec::new(),
        }
    }

    /// Create a pending warm-up set without drops
    #[must_use]
    pub fn warmup(id: u32, weight: f64, reps: Reps) -> Self {
        Self {
            kind: SetKind::Warmup,
            ..Self::working(id, weight, reps)
        }
    }

    /// Attach drops to this set
    #[must_use]
    pub fn with_drops(mut self, drops: Vec<DropSet>) -> Self {
        self.drops = drops;
        self
    }

    /// Attach a previous-best reference
    #[must_use]
    pub fn with_previous_best(mut self, previous_best: impl Into<String>) -> Self {
        self.previous_best = Some(previous_best.into());
        self
    }

    /// Drops that currently participate in the item sequence
    #[must_use]
    pub fn applicable_drops(&self) -> &[DropSet] {
        if self.kind.allows_drops() {
            &self.drops
        } else {
            &[]
        }
    }
}
