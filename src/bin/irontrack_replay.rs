// ABOUTME: Command-line replay of scripted host inputs against the set logger engine
// ABOUTME: Prints emitted events as JSON lines followed by the final session snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Replays a UI scenario without a UI.
//!
//! Usage:
//! ```bash
//! # Replay the bundled demo until every timer has fired
//! cargo run --bin irontrack-replay -- --exercise demos/exercise.json --script demos/script.json
//!
//! # Stop the clock after five seconds with a 400px viewport
//! cargo run --bin irontrack-replay -- --exercise demos/exercise.json \
//!     --script demos/script.json --viewport 400 --until-ms 5000
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use irontrack::config::SetLoggerConfig;
use irontrack::logging::{LogFormat, LoggingConfig};
use irontrack::replay::{parse_script, replay, ReplayOptions};
use irontrack_core::models::Exercise;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "irontrack-replay",
    about = "Replay scripted set logger inputs on a virtual clock",
    long_about = "Loads an exercise and a script of timed inputs, drives the set logger engine and prints every emitted event as a JSON line, then the final session snapshot."
)]
struct ReplayArgs {
    /// Exercise JSON file
    #[arg(long)]
    exercise: PathBuf,

    /// Script JSON file: an array of { "atMs": ..., "input": ... }
    #[arg(long)]
    script: PathBuf,

    /// Viewport height in pixels reported before the first input
    #[arg(long)]
    viewport: Option<f64>,

    /// Stop the virtual clock at this time instead of draining every timer
    #[arg(long)]
    until_ms: Option<u64>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = ReplayArgs::parse();

    let mut logging = LoggingConfig::from_env();
    logging.use_stderr = true;
    if args.verbose {
        logging.level = "debug".into();
        logging.format = LogFormat::Compact;
    }
    logging.init()?;

    let exercise_json = fs::read_to_string(&args.exercise)
        .with_context(|| format!("reading exercise {}", args.exercise.display()))?;
    let exercise: Exercise =
        serde_json::from_str(&exercise_json).context("parsing exercise JSON")?;

    let script_json = fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let steps = parse_script(&script_json).context("parsing script JSON")?;

    let config = SetLoggerConfig::from_env();
    info!(
        exercise = %exercise.name,
        steps = steps.len(),
        "Replaying script"
    );

    let options = ReplayOptions {
        viewport_height: args.viewport,
        until_ms: args.until_ms,
    };
    let outcome = replay(exercise, config, steps, &options).context("running replay")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for event in &outcome.events {
        writeln!(out, "{}", serde_json::to_string(event)?)?;
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&outcome.snapshot)?)?;

    info!(
        events = outcome.events.len(),
        rejected = outcome.rejections.len(),
        "Replay finished"
    );
    Ok(())
}
