// ABOUTME: Core types and constants for the IronTrack live set logger
// ABOUTME: Foundation crate with error handling, workout data model, and tuning constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # IronTrack Core
//!
//! Foundation crate providing shared types and constants for the IronTrack set
//! logger. This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Tuning constants (item heights, debounce windows, feedback cues)
//! - **models**: Exercise, Set, Drop and the `Reps` failure sentinel

/// Unified error handling system with standard error codes
pub mod errors;

/// Tuning constants organized by domain
pub mod constants;

/// Workout data models (Exercise, Set, Drop, Reps)
pub mod models;
