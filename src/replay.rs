// ABOUTME: Scripted replay of host inputs against a SetLogger on a virtual clock
// ABOUTME: Produces timestamped events and the final snapshot without a UI or a runtime
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Replay
//!
//! Script format: a JSON array of `{ "atMs": <u64>, "input": <LoggerInput> }`.
//! Steps are applied in time order; timers fire at their own deadlines between
//! steps, so every event is stamped with the exact virtual time it occurred.

use irontrack_core::errors::AppResult;
use irontrack_core::models::Exercise;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::config::SetLoggerConfig;
use crate::events::{LoggerEvent, LoggerInput};
use crate::set_logger::{SessionSnapshot, SetLogger};

/// One scripted input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStep {
    /// Virtual time of the input, in milliseconds since session start
    pub at_ms: u64,
    /// Input to apply
    pub input: LoggerInput,
}

/// Event with the virtual time it was emitted at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedEvent {
    /// Milliseconds since session start
    pub at_ms: u64,
    /// Emitted event
    pub event: LoggerEvent,
}

/// Input the engine refused
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    /// Milliseconds since session start
    pub at_ms: u64,
    /// Input name
    pub input: String,
    /// Error rendered for display
    pub error: String,
}

/// Replay tuning
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Viewport height reported before the first step
    pub viewport_height: Option<f64>,
    /// Stop the clock here; by default run until no timer is pending
    pub until_ms: Option<u64>,
}

/// Everything a replay produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutcome {
    /// Events in emission order
    pub events: Vec<TimedEvent>,
    /// Inputs the engine rejected
    pub rejections: Vec<Rejection>,
    /// State when the clock stopped
    pub snapshot: SessionSnapshot,
}

/// Parse a script
///
/// # Errors
///
/// Returns `SerializationError` for malformed JSON
pub fn parse_script(json: &str) -> AppResult<Vec<ScriptStep>> {
    Ok(serde_json::from_str(json)?)
}

fn millis(at: Duration) -> u64 {
    u64::try_from(at.as_millis()).unwrap_or(u64::MAX)
}

fn collect(logger: &mut SetLogger, at: Duration, events: &mut Vec<TimedEvent>) {
    let at_ms = millis(at);
    events.extend(
        logger
            .drain_events()
            .into_iter()
            .map(|event| TimedEvent { at_ms, event }),
    );
}

/// Fire timers one deadline at a time up to `until`
fn run_until(logger: &mut SetLogger, until: Duration, events: &mut Vec<TimedEvent>) {
    while let Some(deadline) = logger.next_deadline().filter(|deadline| *deadline <= until) {
        logger.poll(deadline);
        collect(logger, deadline, events);
    }
}

/// Drive a fresh `SetLogger` through `steps`
///
/// # Errors
///
/// Returns `ConfigInvalid` when the configuration does not validate
pub fn replay(
    exercise: Exercise,
    config: SetLoggerConfig,
    mut steps: Vec<ScriptStep>,
    options: &ReplayOptions,
) -> AppResult<ReplayOutcome> {
    let mut logger = SetLogger::new(exercise, config)?;
    let mut events = Vec::new();
    let mut rejections = Vec::new();

    if let Some(height) = options.viewport_height {
        logger.set_viewport_height(height);
    }
    collect(&mut logger, Duration::ZERO, &mut events);

    steps.sort_by_key(|step| step.at_ms);
    let limit = options.until_ms.map(Duration::from_millis);

    for step in steps {
        let at = Duration::from_millis(step.at_ms);
        if limit.is_some_and(|limit| at > limit) {
            break;
        }
        run_until(&mut logger, at, &mut events);

        let name = step.input.name();
        if let Err(error) = logger.apply(step.input, at) {
            warn!(at_ms = step.at_ms, input = name, error = %error, "Scripted input rejected");
            rejections.push(Rejection {
                at_ms: step.at_ms,
                input: name.to_owned(),
                error: error.to_string(),
            });
        }
        collect(&mut logger, at, &mut events);
    }

    run_until(&mut logger, limit.unwrap_or(Duration::MAX), &mut events);

    Ok(ReplayOutcome {
        events,
        rejections,
        snapshot: logger.snapshot(),
    })
}
