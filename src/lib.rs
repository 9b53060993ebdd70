// ABOUTME: Main library entry point for the IronTrack live set logger
// ABOUTME: Scroll-driven selection, edit sessions, rest countdown and set completion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # IronTrack
//!
//! The live set-tracking engine used by an athlete during a workout. It keeps
//! exactly one item of a heterogeneous set/drop list active while the list is
//! scrolled, lets the athlete edit the active item's weight and reps, logs it,
//! and walks them into a rest countdown before activating the next set.
//!
//! ## Architecture
//!
//! - **Sequencer**: flattens sets and their drops into typed items
//! - **Geometry**: converts between item positions and scroll offsets
//! - **Selection**: idle/dragging/snapping state machine owning the active index
//! - **Editing**: live set sessions and staged drop sessions
//! - **Rest timer**: one-second countdown with pause, resume, skip and extend
//! - **Set logger**: orchestrator, the only writer of exercise data
//! - **Runtime**: tokio task hosting one session
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use irontrack::config::SetLoggerConfig;
//! use irontrack::events::LoggerInput;
//! use irontrack::set_logger::SetLogger;
//! use irontrack_core::errors::AppResult;
//! use irontrack_core::models::{Exercise, Protocol, Reps, Set};
//! use std::time::Duration;
//!
//! fn main() -> AppResult<()> {
//!     let exercise = Exercise {
//!         name: "Back squat".to_owned(),
//!         video_url: None,
//!         protocol: Protocol::default(),
//!         sets: (1..=3).map(|id| Set::working(id, 100.0, Reps::Count(5))).collect(),
//!     };
//!     let mut logger = SetLogger::new(exercise, SetLoggerConfig::new())?;
//!
//!     logger.apply(LoggerInput::FinishSet, Duration::ZERO)?;
//!     logger.poll(Duration::from_secs(1));
//!     for event in logger.drain_events() {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```

/// Set logger orchestrator
pub mod set_logger;

/// Item sequencer
pub mod sequencer;

/// Geometry mapper
pub mod geometry;

/// Selection controller
pub mod selection;

/// Edit sessions
pub mod editing;

/// Rest timer engine
pub mod rest_timer;

/// Completion tracker
pub mod completion;

/// Owned, cancelable deadlines
pub mod timers;

/// Session input and output messages
pub mod events;

/// Haptic and audio feedback seam
pub mod feedback;

/// Configuration management
pub mod config;

/// Structured logging setup
pub mod logging;

/// Tokio session runtime
pub mod runtime;

/// Scripted replay on a virtual clock
pub mod replay;

/// Test utilities for creating consistent test data
#[cfg(any(test, feature = "testing"))]
pub mod test_utils;
