// ABOUTME: Tokio session task owning one SetLogger and its clock
// ABOUTME: Commands arrive on a channel, timers wake the task, events leave on a channel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Runtime
//!
//! A single task is the event loop. It owns the engine outright, so there is
//! no shared state and no lock: the task either handles the next command or
//! sleeps until the engine's earliest deadline, never both at once.

use irontrack_core::errors::{AppError, AppResult};
use irontrack_core::models::Exercise;
use std::future;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::config::SetLoggerConfig;
use crate::events::{LoggerEvent, LoggerInput};
use crate::feedback::Feedback;
use crate::logging::SessionLogger;
use crate::set_logger::{SessionSnapshot, SetLogger};

/// Message accepted by a session task
#[derive(Debug)]
pub enum SessionCommand {
    /// Host input to apply now
    Input(LoggerInput),
    /// Reply with the current snapshot
    Snapshot(oneshot::Sender<SessionSnapshot>),
    /// Tear down and reply with the final exercise
    Shutdown(oneshot::Sender<Exercise>),
}

/// Owner handle for a running session
///
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct SessionHandle {
    id: Uuid,
    commands: mpsc::UnboundedSender<SessionCommand>,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Session identifier used in logs
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Queue a host input
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the session task has stopped
    pub fn send(&self, input: LoggerInput) -> AppResult<()> {
        self.commands
            .send(SessionCommand::Input(input))
            .map_err(|_| AppError::internal("session task has stopped"))
    }

    /// Current session state
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the session task has stopped
    pub async fn snapshot(&self) -> AppResult<SessionSnapshot> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(SessionCommand::Snapshot(reply))
            .map_err(|_| AppError::internal("session task has stopped"))?;
        response
            .await
            .map_err(|_| AppError::internal("session task dropped the snapshot request"))
    }

    /// Stop the session, cancelling every timer, and return the exercise
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the session task has already stopped
    pub async fn shutdown(mut self) -> AppResult<Exercise> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(SessionCommand::Shutdown(reply))
            .map_err(|_| AppError::internal("session task has stopped"))?;
        let exercise = response
            .await
            .map_err(|_| AppError::internal("session task ended before shutdown completed"))?;
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| AppError::internal(format!("session task failed: {e}")))?;
        }
        Ok(exercise)
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Start a session task for `exercise`
///
/// Returns the handle and the receiving end of the event channel.
///
/// # Errors
///
/// Returns `ConfigInvalid` when the configuration does not validate
pub fn spawn_session(
    exercise: Exercise,
    config: SetLoggerConfig,
    feedback: Box<dyn Feedback>,
) -> AppResult<(SessionHandle, mpsc::UnboundedReceiver<LoggerEvent>)> {
    let id = Uuid::new_v4();
    let span = info_span!("set_logger_session", session.id = %id, exercise = %exercise.name);
    let logger = SetLogger::new(exercise, config)?.with_feedback(feedback);

    let (commands, command_rx) = mpsc::unbounded_channel();
    let (event_tx, events) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_session(logger, command_rx, event_tx).instrument(span));

    Ok((
        SessionHandle {
            id,
            commands,
            task: Some(task),
        },
        events,
    ))
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

fn forward(logger: &mut SetLogger, events: &mpsc::UnboundedSender<LoggerEvent>) {
    for event in logger.drain_events() {
        if events.send(event).is_err() {
            debug!("Event receiver dropped; discarding session events");
            break;
        }
    }
}

async fn run_session(
    mut logger: SetLogger,
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    events: mpsc::UnboundedSender<LoggerEvent>,
) {
    let started = Instant::now();
    forward(&mut logger, &events);

    loop {
        let deadline = logger.next_deadline().map(|offset| started + offset);
        tokio::select! {
            command = commands.recv() => {
                let now = started.elapsed();
                match command {
                    Some(SessionCommand::Input(input)) => {
                        let name = input.name();
                        if let Err(error) = logger.apply(input, now) {
                            SessionLogger::log_rejected_command(name, &error);
                        }
                    }
                    Some(SessionCommand::Snapshot(reply)) => {
                        logger.poll(now);
                        let _ = reply.send(logger.snapshot());
                    }
                    Some(SessionCommand::Shutdown(reply)) => {
                        logger.poll(now);
                        logger.teardown();
                        forward(&mut logger, &events);
                        let _ = reply.send(logger.into_exercise());
                        debug!("Session shut down");
                        return;
                    }
                    None => {
                        logger.teardown();
                        debug!("Session handle dropped; tearing down");
                        return;
                    }
                }
            }
            () = sleep_until_deadline(deadline) => {
                logger.poll(started.elapsed());
            }
        }
        forward(&mut logger, &events);
    }
}
