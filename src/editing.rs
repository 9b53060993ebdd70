// ABOUTME: Edit sessions holding working copies of weight and reps for the active item
// ABOUTME: Set sessions are live-bound to the Set; drop sessions stage values until validated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Edit Sessions
//!
//! A set session writes every accepted value straight into its `Set` and
//! recomputes the predata flag against the target captured when the exercise
//! was loaded, so editing back to the target clears the flag again.
//!
//! A drop session is edited through a modal. Its values are staged and only
//! written to the `DropSet` on validation; dismissing the modal discards them.

use irontrack_core::constants::editing::WEIGHT_DECIMALS;
use irontrack_core::models::{DropSet, Reps, Set};
use serde::{Deserialize, Serialize};

use crate::config::EditingConfig;
use crate::events::DropField;

/// Pre-filled target values of a set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Target weight
    pub weight: f64,
    /// Target reps
    pub reps: Reps,
}

impl Target {
    /// Capture a set's current values
    #[must_use]
    pub const fn of(set: &Set) -> Self {
        Self {
            weight: set.weight,
            reps: set.reps,
        }
    }

    /// Whether `weight`/`reps` differ from this target
    #[must_use]
    pub fn differs(&self, weight: f64, reps: Reps) -> bool {
        round_weight(self.weight) != round_weight(weight) || self.reps != reps
    }
}

/// Round a weight to the stored precision
#[must_use]
pub fn round_weight(weight: f64) -> f64 {
    let scale = 10f64.powi(WEIGHT_DECIMALS);
    (weight * scale).round() / scale
}

/// Clamp a picker weight into `[0, max]`; non-finite input is rejected
#[must_use]
pub fn clamp_weight(weight: f64, limits: &EditingConfig) -> Option<f64> {
    weight
        .is_finite()
        .then(|| round_weight(weight.clamp(0.0, limits.max_weight)))
}

fn stepped_weight(weight: f64, steps: i32, limits: &EditingConfig) -> f64 {
    let next = f64::from(steps).mul_add(limits.weight_step, weight);
    round_weight(next.clamp(0.0, limits.max_weight))
}

fn stepped_reps(reps: Reps, steps: i32, limits: &EditingConfig) -> Reps {
    reps.adjusted(i64::from(steps) * i64::from(limits.reps_step), limits.max_reps)
}

/// Live working copy for the active set
#[derive(Debug, Clone, PartialEq)]
pub struct SetEditSession {
    set_index: usize,
    original: Target,
    weight: f64,
    reps: Reps,
    predata_modified: bool,
}

impl SetEditSession {
    /// Open a session initialized from the set's stored values
    #[must_use]
    pub fn open(set_index: usize, set: &Set, original: Target) -> Self {
        Self {
            set_index,
            original,
            weight: set.weight,
            reps: set.reps,
            predata_modified: original.differs(set.weight, set.reps),
        }
    }

    /// Set this session edits
    #[must_use]
    pub const fn set_index(&self) -> usize {
        self.set_index
    }

    /// Current weight
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Current reps
    #[must_use]
    pub const fn reps(&self) -> Reps {
        self.reps
    }

    /// Target captured at exercise load
    #[must_use]
    pub const fn original(&self) -> Target {
        self.original
    }

    /// Whether the athlete diverged from the target
    #[must_use]
    pub const fn is_predata_modified(&self) -> bool {
        self.predata_modified
    }

    /// Single write path for every edit
    ///
    /// Values are clamped into the picker domain before being written back to
    /// `set`. A non-finite weight keeps the previous weight.
    pub fn update_current_set_data(
        &mut self,
        set: &mut Set,
        weight: f64,
        reps: Reps,
        limits: &EditingConfig,
    ) {
        if let Some(weight) = clamp_weight(weight, limits) {
            self.weight = weight;
        }
        self.reps = reps.clamped(limits.max_reps);
        set.weight = self.weight;
        set.reps = self.reps;
        self.predata_modified = self.original.differs(self.weight, self.reps);
    }

    /// Move the weight by `steps` picker steps
    pub fn adjust_weight(&mut self, set: &mut Set, steps: i32, limits: &EditingConfig) {
        let weight = stepped_weight(self.weight, steps, limits);
        self.update_current_set_data(set, weight, self.reps, limits);
    }

    /// Move the reps by `steps` picker steps, entering or leaving failure
    pub fn adjust_reps(&mut self, set: &mut Set, steps: i32, limits: &EditingConfig) {
        let reps = stepped_reps(self.reps, steps, limits);
        self.update_current_set_data(set, self.weight, reps, limits);
    }

    /// Absolute weight from the picker
    pub fn set_weight(&mut self, set: &mut Set, weight: f64, limits: &EditingConfig) {
        self.update_current_set_data(set, weight, self.reps, limits);
    }

    /// Absolute reps from the picker
    pub fn set_reps(&mut self, set: &mut Set, reps: Reps, limits: &EditingConfig) {
        self.update_current_set_data(set, self.weight, reps, limits);
    }

    /// Write the session's values into `set`
    pub fn commit(&self, set: &mut Set) {
        set.weight = self.weight;
        set.reps = self.reps;
    }

    /// Forget the divergence once the set is logged
    pub fn clear_predata(&mut self) {
        self.predata_modified = false;
    }
}

/// Staged values for one drop, edited through a modal
#[derive(Debug, Clone, PartialEq)]
pub struct DropEditSession {
    set_index: usize,
    drop_index: usize,
    field: DropField,
    weight: f64,
    reps: Reps,
}

impl DropEditSession {
    /// Open a session on a drop's current values
    #[must_use]
    pub const fn open(set_index: usize, drop_index: usize, field: DropField, drop: &DropSet) -> Self {
        Self {
            set_index,
            drop_index,
            field,
            weight: drop.weight,
            reps: drop.reps,
        }
    }

    /// Whether this session edits the given drop
    #[must_use]
    pub const fn targets(&self, set_index: usize, drop_index: usize) -> bool {
        self.set_index == set_index && self.drop_index == drop_index
    }

    /// Owning set
    #[must_use]
    pub const fn set_index(&self) -> usize {
        self.set_index
    }

    /// Drop being edited
    #[must_use]
    pub const fn drop_index(&self) -> usize {
        self.drop_index
    }

    /// Field whose picker is open
    #[must_use]
    pub const fn field(&self) -> DropField {
        self.field
    }

    /// Switch the modal to another field, keeping staged values
    pub fn focus(&mut self, field: DropField) {
        self.field = field;
    }

    /// Staged weight
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Staged reps
    #[must_use]
    pub const fn reps(&self) -> Reps {
        self.reps
    }

    /// Stage an absolute weight; non-finite input is ignored
    pub fn stage_weight(&mut self, weight: f64, limits: &EditingConfig) {
        if let Some(weight) = clamp_weight(weight, limits) {
            self.weight = weight;
        }
    }

    /// Stage absolute reps
    pub fn stage_reps(&mut self, reps: Reps, limits: &EditingConfig) {
        self.reps = reps.clamped(limits.max_reps);
    }

    /// Write the staged values into the drop, closing the session
    pub fn validate(self, drop: &mut DropSet) {
        drop.weight = self.weight;
        drop.reps = self.reps;
    }
}
