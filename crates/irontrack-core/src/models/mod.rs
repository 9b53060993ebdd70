// ABOUTME: Core data models for the IronTrack set logger
// ABOUTME: Re-exports Exercise, Protocol, Set, DropSet, SetKind and the Reps sentinel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! The engine mutates an in-memory copy of these structures only. A separate
//! collaborator observes completed sets and persists them remotely.
//!
//! - `Exercise`: aggregate with protocol and ordered sets
//! - `Set`: top-level unit, optionally owning `DropSet` continuations
//! - `Reps`: integer count or the muscular-failure sentinel

mod exercise;
mod reps;
mod set;

pub use exercise::{Exercise, Protocol};
pub use reps::Reps;
pub use set::{DropSet, Set, SetKind};
