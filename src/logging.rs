// ABOUTME: Logging configuration and structured logging setup for the set logger
// ABOUTME: Picks a formatter and writer from the environment and installs one filtered layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Logging
//!
//! Engine code logs through `tracing` with stable dotted field names
//! (`set.index`, `rest.event`, `session.id`). This module owns the subscriber
//! setup for binaries and the [`SessionLogger`] helpers that keep those field
//! names consistent across modules.

use anyhow::Result;
use std::env;
use std::io;
use std::str::FromStr;
use tracing::{info, warn, Subscriber};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use irontrack_core::errors::AppError;

/// Service name reported when `SERVICE_NAME` is unset
const DEFAULT_SERVICE_NAME: &str = "irontrack";

/// Environment name reported when `ENVIRONMENT` is unset
const DEFAULT_ENVIRONMENT: &str = "development";

/// Log output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` lines for log shipping
    Json,
    /// Multi-line human readable output
    #[default]
    Pretty,
    /// One line per event, no targets
    Compact,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(AppError::invalid_input(format!(
                "unknown log format '{other}'"
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive (trace, debug, info, warn, error or a full `EnvFilter` string)
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread ids and names
    pub include_thread: bool,
    /// Log span open/close, one pair per session
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Deployment environment
    pub environment: String,
    /// Write to stderr, keeping stdout for program output
    pub use_stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::default(),
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: DEFAULT_SERVICE_NAME.into(),
            service_version: env!("CARGO_PKG_VERSION").into(),
            environment: DEFAULT_ENVIRONMENT.into(),
            use_stderr: false,
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG`, `LOG_FORMAT`, `ENVIRONMENT`, `SERVICE_NAME` and the `LOG_*` switches
    ///
    /// Production turns on location, thread and span output. An unknown
    /// `LOG_FORMAT` keeps the pretty formatter.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let detailed = environment == "production";
        let switch = |key: &str| detailed || env::var_os(key).is_some();

        Self {
            level: env::var("RUST_LOG").unwrap_or(defaults.level),
            format: env::var("LOG_FORMAT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.format),
            include_location: switch("LOG_INCLUDE_LOCATION"),
            include_thread: switch("LOG_INCLUDE_THREAD"),
            include_spans: switch("LOG_INCLUDE_SPANS"),
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            service_version: env::var("SERVICE_VERSION").unwrap_or(defaults.service_version),
            use_stderr: env::var_os("LOG_TO_STDERR").is_some(),
            environment,
        }
    }

    /// Filter for the configured level; a malformed directive falls back to `info`
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn writer(&self) -> BoxMakeWriter {
        if self.use_stderr {
            BoxMakeWriter::new(io::stderr)
        } else {
            BoxMakeWriter::new(io::stdout)
        }
    }

    /// Formatting layer for the configured format, filtered by level
    fn layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'span> LookupSpan<'span> + 'static,
    {
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let base = fmt::layer()
            .with_writer(self.writer())
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_thread_ids(self.include_thread)
            .with_thread_names(self.include_thread);

        match self.format {
            LogFormat::Json => base
                .with_span_events(span_events)
                .json()
                .with_filter(self.filter())
                .boxed(),
            LogFormat::Pretty => base
                .with_span_events(span_events)
                .with_filter(self.filter())
                .boxed(),
            LogFormat::Compact => base
                .compact()
                .with_target(false)
                .with_filter(self.filter())
                .boxed(),
        }
    }

    /// Install the global subscriber and log the startup line
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        tracing_subscriber::registry()
            .with(self.layer())
            .try_init()?;

        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            log.location = self.include_location,
            log.spans = self.include_spans,
            "IronTrack logging initialized"
        );
        Ok(())
    }
}

/// Session-level logging helpers with stable field names
pub struct SessionLogger;

impl SessionLogger {
    /// Log a completed set crossing the persistence boundary
    pub fn log_set_completed(set_index: usize, set_id: u32, weight: f64, reps: &str) {
        info!(
            set.index = set_index,
            set.id = set_id,
            set.weight = weight,
            set.reps = %reps,
            "Set completed"
        );
    }

    /// Log a rest timer transition
    pub fn log_rest_event(event: &str, seconds_remaining: u32) {
        info!(
            rest.event = %event,
            rest.seconds_remaining = seconds_remaining,
            "Rest timer event"
        );
    }

    /// Log a command the engine refused to apply
    pub fn log_rejected_command(command: &str, error: &AppError) {
        warn!(
            command = %command,
            error.code = ?error.code,
            error.message = %error.message,
            "Command rejected"
        );
    }
}
