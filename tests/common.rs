// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, engine construction and virtual clock helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `irontrack`

use irontrack::config::SetLoggerConfig;
use irontrack::events::{LoggerEvent, LoggerInput};
use irontrack::set_logger::SetLogger;
use irontrack::test_utils::create_test_exercise;
use irontrack_core::models::Set;
use std::env;
use std::sync::Once;
use std::time::Duration;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Milliseconds on the session clock
pub const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Engine over `sets` with default configuration
pub fn create_test_logger(sets: Vec<Set>, rest_seconds: u32) -> SetLogger {
    init_test_logging();
    SetLogger::new(
        create_test_exercise(sets, rest_seconds),
        SetLoggerConfig::new(),
    )
    .unwrap()
}

/// Apply an input and return whatever it emitted
pub fn apply(logger: &mut SetLogger, input: LoggerInput, now: Duration) -> Vec<LoggerEvent> {
    logger.apply(input, now).unwrap();
    logger.drain_events()
}

/// Report a viewport of `height` and acknowledge the re-centering scroll
pub fn settle_viewport(logger: &mut SetLogger, height: f64) {
    logger.set_viewport_height(height);
    let landed = logger.drain_events().into_iter().find_map(|event| match event {
        LoggerEvent::ScrollTo(command) => Some(command.offset),
        _ => None,
    });
    if let Some(offset) = landed {
        logger.scroll(offset, Duration::ZERO);
    }
    logger.drain_events();
}
