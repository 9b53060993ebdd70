// ABOUTME: Set logger orchestrating selection, edit sessions, rest timer and completion
// ABOUTME: The only component that mutates exercise data; emits LoggerEvents for the host
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Set Logger
//!
//! One `SetLogger` drives one exercise during a live workout. Data flows one
//! way: the set list is flattened into items, items feed the geometry, and the
//! geometry feeds the selection controller. Only the logger writes to the
//! exercise, and only the logger drives the selection and the rest timer.
//!
//! Time is a parameter. Every call that can arm or fire a timer takes `now`,
//! the time elapsed since the session started, and [`SetLogger::poll`] fires
//! every timer that is due in deadline order. Hosts schedule their next wake
//! up from [`SetLogger::next_deadline`].

use chrono::Utc;
use irontrack_core::errors::{AppError, AppResult};
use irontrack_core::models::{Exercise, Reps, Set};
use serde::{Deserialize, Serialize};
use std::mem;
use std::time::Duration;
use tracing::{debug, info};

use crate::completion::CompletionTracker;
use crate::config::{EditingConfig, SetLoggerConfig};
use crate::editing::{DropEditSession, SetEditSession, Target};
use crate::events::{DropField, LoggerEvent, LoggerInput, ScrollCommand};
use crate::feedback::{deliver, Feedback, FeedbackCue, NoopFeedback};
use crate::logging::SessionLogger;
use crate::rest_timer::{RestSnapshot, RestTimer, TickOutcome};
use crate::selection::{SelectionController, SelectionPhase};
use crate::sequencer::{build_items, next_set_position, Item};
use crate::timers::earliest;

/// Staged drop edit as shown in the modal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEditView {
    /// Owning set
    pub set_index: usize,
    /// Drop being edited
    pub drop_index: usize,
    /// Field whose picker is open
    pub field: DropField,
    /// Staged weight
    pub weight: f64,
    /// Staged reps
    pub reps: Reps,
}

/// Serializable view of a whole session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Exercise being performed
    pub exercise: Exercise,
    /// Current item list
    pub items: Vec<Item>,
    /// Active position, `None` only for an empty list
    pub active_index: Option<usize>,
    /// Active item
    pub active_item: Option<Item>,
    /// Gesture phase
    pub phase: SelectionPhase,
    /// Series lock
    pub locked: bool,
    /// List opacity
    pub view_opacity: f64,
    /// Whether the active set diverged from its target
    pub predata_modified: bool,
    /// Set showing the validation highlight
    pub validating: Option<usize>,
    /// Whether drops are interleaved
    pub show_drops: bool,
    /// Rest countdown
    pub rest: RestSnapshot,
    /// Open drop modal
    pub drop_edit: Option<DropEditView>,
}

fn no_drop_edit() -> AppError {
    AppError::invalid_state("no drop edit is open")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DueTimer {
    Settle,
    Flash,
    Advance,
    Rest,
}

/// Live set-tracking engine for one exercise
pub struct SetLogger {
    config: SetLoggerConfig,
    exercise: Exercise,
    targets: Vec<Target>,
    show_drops: bool,
    selection: SelectionController,
    set_session: Option<SetEditSession>,
    drop_session: Option<DropEditSession>,
    rest: RestTimer,
    completion: CompletionTracker,
    feedback: Box<dyn Feedback>,
    events: Vec<LoggerEvent>,
}

impl SetLogger {
    /// Load an exercise
    ///
    /// The first set not yet logged becomes active, so a resumed session
    /// continues where the athlete left off.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when the configuration does not validate
    pub fn new(exercise: Exercise, config: SetLoggerConfig) -> AppResult<Self> {
        config.validate()?;

        let show_drops = config.show_drops;
        let items = build_items(&exercise.sets, show_drops);
        let targets = exercise.sets.iter().map(Target::of).collect();
        let mut logger = Self {
            selection: SelectionController::new(items, &config),
            rest: RestTimer::new(config.timing.rest_tick()),
            config,
            exercise,
            targets,
            show_drops,
            set_session: None,
            drop_session: None,
            completion: CompletionTracker::new(),
            feedback: Box::new(NoopFeedback),
            events: Vec::new(),
        };

        let first_pending = logger
            .exercise
            .sets
            .iter()
            .position(|set| !set.completed)
            .and_then(|set_index| {
                logger
                    .selection
                    .items()
                    .iter()
                    .position(|item| *item == Item::Set { set_index })
            });
        if let Some(position) = first_pending.filter(|position| *position > 0) {
            if let Some(command) = logger.selection.scroll_to_index(position, false) {
                logger.events.push(LoggerEvent::ScrollTo(command));
            }
        }
        logger.open_set_session();

        info!(
            exercise = %logger.exercise.name,
            sets = logger.exercise.sets.len(),
            items = logger.selection.items().len(),
            "Set logger loaded"
        );
        Ok(logger)
    }

    /// Replace the feedback backend
    #[must_use]
    pub fn with_feedback(mut self, feedback: Box<dyn Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &SetLoggerConfig {
        &self.config
    }

    /// In-memory exercise copy
    #[must_use]
    pub const fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    /// Give back the exercise
    #[must_use]
    pub fn into_exercise(self) -> Exercise {
        self.exercise
    }

    /// Current item list
    #[must_use]
    pub fn items(&self) -> &[Item] {
        self.selection.items()
    }

    /// Selection controller
    #[must_use]
    pub const fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Rest timer
    #[must_use]
    pub const fn rest_timer(&self) -> &RestTimer {
        &self.rest
    }

    /// Active position; 0 for an empty list
    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.selection.active_index()
    }

    /// Active item
    #[must_use]
    pub fn active_item(&self) -> Option<Item> {
        self.selection.active_item()
    }

    /// Series lock
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.selection.is_locked()
    }

    /// Whether the active set diverged from its target
    #[must_use]
    pub fn is_predata_modified(&self) -> bool {
        self.set_session
            .as_ref()
            .is_some_and(SetEditSession::is_predata_modified)
    }

    /// Live session of the active set
    #[must_use]
    pub const fn set_session(&self) -> Option<&SetEditSession> {
        self.set_session.as_ref()
    }

    /// Open drop modal
    #[must_use]
    pub const fn drop_session(&self) -> Option<&DropEditSession> {
        self.drop_session.as_ref()
    }

    /// Set showing the validation highlight
    #[must_use]
    pub const fn validating(&self) -> Option<usize> {
        self.completion.validating()
    }

    /// Whether drops are interleaved
    #[must_use]
    pub const fn show_drops(&self) -> bool {
        self.show_drops
    }

    /// Take every queued event
    pub fn drain_events(&mut self) -> Vec<LoggerEvent> {
        mem::take(&mut self.events)
    }

    /// Earliest pending timer deadline
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        earliest([
            self.selection.next_deadline(),
            self.completion.next_deadline(),
            self.rest.next_deadline(),
        ])
    }

    /// Apply one host input at `now`
    ///
    /// Timers due at or before `now` fire first and keep their effects even
    /// when the command itself is rejected.
    ///
    /// # Errors
    ///
    /// Returns the command's rejection; a rejected command changes nothing
    pub fn apply(&mut self, input: LoggerInput, now: Duration) -> AppResult<()> {
        self.poll(now);
        match input {
            LoggerInput::PointerDown => {
                self.pointer_down(now);
                Ok(())
            }
            LoggerInput::Scroll { offset } => {
                self.scroll(offset, now);
                Ok(())
            }
            LoggerInput::ScrollAnimationFinished => {
                self.scroll_animation_finished();
                Ok(())
            }
            LoggerInput::ViewportResized { height } => {
                self.set_viewport_height(height);
                Ok(())
            }
            LoggerInput::SelectItem { index } => self.select_item(index),
            LoggerInput::ToggleLock => self.toggle_lock(),
            LoggerInput::AdjustWeight { steps } => self.adjust_weight(steps),
            LoggerInput::AdjustReps { steps } => self.adjust_reps(steps),
            LoggerInput::SetWeight { weight } => self.set_weight(weight),
            LoggerInput::SetReps { reps } => self.set_reps(reps),
            LoggerInput::WeightClicked => self.request_weight_picker(),
            LoggerInput::RepsClicked => self.request_reps_picker(),
            LoggerInput::DropWeightClicked {
                set_index,
                drop_index,
            } => self.open_drop_edit(set_index, drop_index, DropField::Weight),
            LoggerInput::DropRepsClicked {
                set_index,
                drop_index,
            } => self.open_drop_edit(set_index, drop_index, DropField::Reps),
            LoggerInput::StageDropWeight { weight } => self.stage_drop_weight(weight),
            LoggerInput::StageDropReps { reps } => self.stage_drop_reps(reps),
            LoggerInput::ValidateDropEdit => self.validate_drop_edit(),
            LoggerInput::DismissDropEdit => {
                self.dismiss_drop_edit();
                Ok(())
            }
            LoggerInput::CompleteDrop => self.complete_active_drop(),
            LoggerInput::FinishSet => self.finish_set(now),
            LoggerInput::StartRest => {
                self.start_rest(now);
                Ok(())
            }
            LoggerInput::PauseRest => {
                self.pause_rest();
                Ok(())
            }
            LoggerInput::ResumeRest => {
                self.resume_rest(now);
                Ok(())
            }
            LoggerInput::SkipRest => {
                self.skip_rest();
                Ok(())
            }
            LoggerInput::ExtendRest { seconds } => {
                self.extend_rest(seconds);
                Ok(())
            }
            LoggerInput::SetShowDrops { show } => {
                self.set_show_drops(show);
                Ok(())
            }
            LoggerInput::ReplaceSets { sets } => {
                self.replace_sets(sets);
                Ok(())
            }
            LoggerInput::RequestNotes => self.request_notes(),
            LoggerInput::RequestVideo => self.request_video(),
        }
    }

    /// Fire every timer due at or before `now`, earliest first
    pub fn poll(&mut self, now: Duration) {
        loop {
            let due = [
                (DueTimer::Settle, self.selection.next_deadline()),
                (DueTimer::Flash, self.completion.flash_deadline()),
                (DueTimer::Advance, self.completion.advance_deadline()),
                (DueTimer::Rest, self.rest.next_deadline()),
            ]
            .into_iter()
            .filter_map(|(timer, deadline)| {
                deadline
                    .filter(|deadline| *deadline <= now)
                    .map(|deadline| (deadline, timer))
            })
            .min_by_key(|(deadline, _)| *deadline);

            let Some((at, timer)) = due else {
                break;
            };
            match timer {
                DueTimer::Settle => self.fire_settle(at),
                DueTimer::Flash => self.fire_flash(at),
                DueTimer::Advance => self.fire_advance(at),
                DueTimer::Rest => self.fire_rest(at),
            }
        }
    }

    fn fire_settle(&mut self, at: Duration) {
        let before = self.selection.active_index();
        if let Some(command) = self.selection.poll(at) {
            self.events.push(LoggerEvent::ScrollTo(command));
        }
        if self.selection.active_index() != before {
            self.on_active_changed();
        }
    }

    fn fire_flash(&mut self, at: Duration) {
        if let Some(set_index) = self.completion.fire_flash(at) {
            self.events.push(LoggerEvent::ValidationFlash {
                set_index,
                active: false,
            });
        }
    }

    fn fire_advance(&mut self, at: Duration) {
        let Some(position) = self.completion.fire_advance(at, self.selection.items()) else {
            return;
        };
        debug!(position, "Advancing to next set");
        self.scroll_to(position, true);
    }

    fn fire_rest(&mut self, at: Duration) {
        match self.rest.fire(at) {
            Some(TickOutcome::Ticked(seconds_remaining)) => {
                debug!(seconds_remaining, "Rest tick");
                self.events.push(LoggerEvent::RestTick { seconds_remaining });
            }
            Some(TickOutcome::Finished) => {
                SessionLogger::log_rest_event("finished", 0);
                self.cue(FeedbackCue::RestComplete);
                self.events.push(LoggerEvent::RestFinished);
            }
            None => {}
        }
    }

    fn cue(&mut self, cue: FeedbackCue) {
        deliver(self.feedback.as_mut(), &self.config.feedback, cue);
    }

    /// Activate `position` through a programmatic scroll
    fn scroll_to(&mut self, position: usize, animated: bool) {
        let before = self.selection.active_index();
        if let Some(command) = self.selection.scroll_to_index(position, animated) {
            self.events.push(LoggerEvent::ScrollTo(command));
        }
        if self.selection.active_index() != before {
            self.on_active_changed();
        }
    }

    fn on_active_changed(&mut self) {
        if let Some(item) = self.selection.active_item() {
            self.events.push(LoggerEvent::ActiveItemChanged {
                index: self.selection.active_index(),
                item,
            });
        }
        self.open_set_session();
    }

    /// Keep the set session bound to the active set
    fn open_set_session(&mut self) {
        let Some(Item::Set { set_index }) = self.selection.active_item() else {
            self.set_session = None;
            return;
        };
        if self
            .set_session
            .as_ref()
            .is_some_and(|session| session.set_index() == set_index)
        {
            return;
        }
        self.set_session = self.exercise.sets.get(set_index).map(|set| {
            let original = self
                .targets
                .get(set_index)
                .copied()
                .unwrap_or_else(|| Target::of(set));
            SetEditSession::open(set_index, set, original)
        });
    }

    /// Finger went down on the list
    pub fn pointer_down(&mut self, now: Duration) {
        self.selection.pointer_down(now);
    }

    /// Scroll position update
    pub fn scroll(&mut self, offset: f64, now: Duration) {
        if self.selection.scroll(offset, now).is_some() {
            self.cue(FeedbackCue::SelectionTick);
            self.on_active_changed();
        }
    }

    /// Host finished a programmatic scroll animation
    pub fn scroll_animation_finished(&mut self) {
        self.selection.scroll_animation_finished();
    }

    /// Viewport resized; the active item is re-centered unless a drag is running
    ///
    /// An in-flight snap is retargeted to the new centered offset.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.selection.set_viewport_height(height);
        if self.selection.phase() != SelectionPhase::Dragging {
            self.scroll_to(self.selection.active_index(), false);
        }
    }

    /// Tap on an item: select it and center it
    ///
    /// # Errors
    ///
    /// Returns `ResourceLocked` while locked and `ResourceNotFound` for a
    /// position outside the item list
    pub fn select_item(&mut self, index: usize) -> AppResult<()> {
        if self.selection.is_locked() {
            return Err(AppError::locked("selection is frozen while the series is locked"));
        }
        if index >= self.selection.items().len() {
            return Err(AppError::not_found(format!("item {index}")));
        }
        if index != self.selection.active_index() {
            self.scroll_to(index, true);
        }
        Ok(())
    }

    /// Flip the series lock
    ///
    /// Locking cancels a pending advance so the athlete stays on this set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when a drop is active or the list is empty
    pub fn toggle_lock(&mut self) -> AppResult<()> {
        let locked = !self.selection.is_locked();
        self.selection.set_locked(locked)?;
        if locked && self.completion.cancel_advance() {
            debug!("Pending advance cancelled by lock");
        }
        debug!(locked, "Series lock toggled");
        self.events.push(LoggerEvent::LockChanged { locked });
        Ok(())
    }

    /// Index of the active set when it may be edited
    fn editable_set(&self) -> AppResult<usize> {
        if self.selection.is_locked() {
            return Err(AppError::locked("the series is locked"));
        }
        match self.selection.active_item() {
            Some(Item::Set { set_index }) => Ok(set_index),
            Some(Item::Drop { .. }) => Err(AppError::invalid_state(
                "drops are edited through their own modal",
            )),
            None => Err(AppError::invalid_state("no active set")),
        }
    }

    fn edit_active_set(
        &mut self,
        edit: impl FnOnce(&mut SetEditSession, &mut Set, &EditingConfig),
    ) -> AppResult<()> {
        let set_index = self.editable_set()?;
        let session = self
            .set_session
            .as_mut()
            .filter(|session| session.set_index() == set_index)
            .ok_or_else(|| AppError::internal("active set has no edit session"))?;
        let set = self
            .exercise
            .sets
            .get_mut(set_index)
            .ok_or_else(|| AppError::not_found(format!("set {set_index}")))?;
        edit(session, set, &self.config.editing);
        debug!(
            set_index,
            weight = set.weight,
            reps = %set.reps,
            predata_modified = session.is_predata_modified(),
            "Set values updated"
        );
        Ok(())
    }

    /// Step the active set's weight
    ///
    /// # Errors
    ///
    /// Returns `ResourceLocked` while locked, `InvalidState` unless a set is active
    pub fn adjust_weight(&mut self, steps: i32) -> AppResult<()> {
        self.edit_active_set(|session, set, limits| session.adjust_weight(set, steps, limits))
    }

    /// Step the active set's reps
    ///
    /// # Errors
    ///
    /// Returns `ResourceLocked` while locked, `InvalidState` unless a set is active
    pub fn adjust_reps(&mut self, steps: i32) -> AppResult<()> {
        self.edit_active_set(|session, set, limits| session.adjust_reps(set, steps, limits))
    }

    /// Picker chose an absolute weight
    ///
    /// # Errors
    ///
    /// Returns `ResourceLocked` while locked, `InvalidState` unless a set is active
    pub fn set_weight(&mut self, weight: f64) -> AppResult<()> {
        self.edit_active_set(|session, set, limits| session.set_weight(set, weight, limits))
    }

    /// Picker chose absolute reps
    ///
    /// # Errors
    ///
    /// Returns `ResourceLocked` while locked, `InvalidState` unless a set is active
    pub fn set_reps(&mut self, reps: Reps) -> AppResult<()> {
        self.edit_active_set(|session, set, limits| session.set_reps(set, reps, limits))
    }

    /// Weight on the active set tapped: ask the host for the picker
    ///
    /// # Errors
    ///
    /// Returns `ResourceLocked` while locked, `InvalidState` unless a set is active
    pub fn request_weight_picker(&mut self) -> AppResult<()> {
        let set_index = self.editable_set()?;
        let weight = self
            .set_session
            .as_ref()
            .map_or(0.0, SetEditSession::weight);
        self.events
            .push(LoggerEvent::WeightPickerRequested { set_index, weight });
        Ok(())
    }

    /// Reps on the active set tapped: ask the host for the picker
    ///
    /// # Errors
    ///
    /// Returns `ResourceLocked` while locked, `InvalidState` unless a set is active
    pub fn request_reps_picker(&mut self) -> AppResult<()> {
        let set_index = self.editable_set()?;
        let reps = self
            .set_session
            .as_ref()
            .map_or(Reps::Count(0), SetEditSession::reps);
        self.events
            .push(LoggerEvent::RepsPickerRequested { set_index, reps });
        Ok(())
    }

    /// Weight or reps on a drop tapped: open its modal
    ///
    /// Re-opening the same drop keeps the values staged so far.
    ///
    /// # Errors
    ///
    /// Returns `ResourceLocked` while locked, `ResourceNotFound` for an unknown
    /// drop or one attached to a warm-up, and `InvalidState` for a drop already logged
    pub fn open_drop_edit(
        &mut self,
        set_index: usize,
        drop_index: usize,
        field: DropField,
    ) -> AppResult<()> {
        if self.selection.is_locked() {
            return Err(AppError::locked("the series is locked"));
        }
        let drop = self
            .exercise
            .sets
            .get(set_index)
            .and_then(|set| set.applicable_drops().get(drop_index))
            .ok_or_else(|| AppError::not_found(format!("drop {drop_index} of set {set_index}")))?;
        if drop.completed {
            return Err(AppError::invalid_state("drop is already completed"));
        }

        match self.drop_session.as_mut() {
            Some(session) if session.targets(set_index, drop_index) => session.focus(field),
            _ => {
                self.drop_session = Some(DropEditSession::open(set_index, drop_index, field, drop));
            }
        }
        self.events.push(match field {
            DropField::Weight => LoggerEvent::DropWeightPickerRequested {
                set_index,
                drop_index,
            },
            DropField::Reps => LoggerEvent::DropRepsPickerRequested {
                set_index,
                drop_index,
            },
        });
        Ok(())
    }

    /// Stage a weight in the drop modal
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when no drop modal is open
    pub fn stage_drop_weight(&mut self, weight: f64) -> AppResult<()> {
        self.drop_session
            .as_mut()
            .ok_or_else(no_drop_edit)?
            .stage_weight(weight, &self.config.editing);
        Ok(())
    }

    /// Stage reps in the drop modal
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when no drop modal is open
    pub fn stage_drop_reps(&mut self, reps: Reps) -> AppResult<()> {
        self.drop_session
            .as_mut()
            .ok_or_else(no_drop_edit)?
            .stage_reps(reps, &self.config.editing);
        Ok(())
    }

    /// Confirm the drop modal, writing the staged values back
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when no modal is open and `ResourceNotFound` when
    /// the drop disappeared while the modal was open; the modal stays open
    pub fn validate_drop_edit(&mut self) -> AppResult<()> {
        let (set_index, drop_index) = match self.drop_session.as_ref() {
            Some(session) => (session.set_index(), session.drop_index()),
            None => return Err(no_drop_edit()),
        };
        let exists = self
            .exercise
            .sets
            .get(set_index)
            .is_some_and(|set| set.applicable_drops().get(drop_index).is_some());
        if !exists {
            return Err(AppError::not_found(format!(
                "drop {drop_index} of set {set_index}"
            )));
        }

        let (Some(session), Some(drop)) = (
            self.drop_session.take(),
            self.exercise
                .sets
                .get_mut(set_index)
                .and_then(|set| set.drops.get_mut(drop_index)),
        ) else {
            return Err(AppError::internal("drop edit vanished during validation"));
        };
        session.validate(drop);
        let drop = drop.clone();
        debug!(set_index, drop_index, weight = drop.weight, reps = %drop.reps, "Drop edit validated");
        self.events.push(LoggerEvent::DropEditValidated {
            set_index,
            drop_index,
            drop,
        });
        Ok(())
    }

    /// Close the drop modal without writing anything
    pub fn dismiss_drop_edit(&mut self) {
        self.drop_session = None;
    }

    /// Log the active drop
    ///
    /// Drops are performed without rest, so no countdown is started and
    /// selection does not advance.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless an open drop is active
    pub fn complete_active_drop(&mut self) -> AppResult<()> {
        let Some(Item::Drop {
            set_index,
            drop_index,
        }) = self.selection.active_item()
        else {
            return Err(AppError::invalid_state("active item is not a drop"));
        };
        let drop = self
            .exercise
            .sets
            .get_mut(set_index)
            .filter(|set| set.kind.allows_drops())
            .and_then(|set| set.drops.get_mut(drop_index))
            .ok_or_else(|| AppError::not_found(format!("drop {drop_index} of set {set_index}")))?;
        if drop.completed {
            return Err(AppError::invalid_state("drop is already completed"));
        }
        drop.completed = true;
        let drop = drop.clone();

        info!(set_index, drop_index, weight = drop.weight, reps = %drop.reps, "Drop completed");
        self.cue(FeedbackCue::SetValidated);
        self.events.push(LoggerEvent::DropCompleted {
            set_index,
            drop_index,
            drop,
        });
        Ok(())
    }

    /// Log the active set
    ///
    /// Commits the edit session, marks the set completed, starts the
    /// validation highlight and the rest countdown, releases the lock and,
    /// unless this was the last set, schedules the advance to the next set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when the list is empty or a drop is active
    pub fn finish_set(&mut self, now: Duration) -> AppResult<()> {
        let active_index = self.selection.active_index();
        let Some(Item::Set { set_index }) = self.selection.active_item() else {
            return Err(AppError::invalid_state("only a set can be finished"));
        };
        let set = self
            .exercise
            .sets
            .get_mut(set_index)
            .ok_or_else(|| AppError::not_found(format!("set {set_index}")))?;

        if let Some(session) = self
            .set_session
            .as_mut()
            .filter(|session| session.set_index() == set_index)
        {
            session.commit(set);
            session.clear_predata();
        }
        set.completed = true;
        set.completed_at = Some(Utc::now());
        let completed = set.clone();

        let has_next = next_set_position(self.selection.items(), active_index).is_some();
        if let Some(interrupted) =
            self.completion
                .begin(set_index, has_next, now, &self.config.timing)
        {
            self.events.push(LoggerEvent::ValidationFlash {
                set_index: interrupted,
                active: false,
            });
        }
        self.events.push(LoggerEvent::ValidationFlash {
            set_index,
            active: true,
        });
        self.cue(FeedbackCue::SetValidated);

        self.start_rest(now);

        if self.selection.is_locked() {
            self.selection.unlock();
            self.events.push(LoggerEvent::LockChanged { locked: false });
        }

        SessionLogger::log_set_completed(
            set_index,
            completed.id,
            completed.weight,
            &completed.reps.to_string(),
        );
        self.events.push(LoggerEvent::SetCompleted {
            set_index,
            set: completed,
        });
        Ok(())
    }

    /// Start the protocol's rest countdown, overriding any running one
    ///
    /// A protocol without rest leaves the timer idle.
    pub fn start_rest(&mut self, now: Duration) {
        let seconds = self.exercise.protocol.rest_seconds;
        self.rest.start(seconds, now);
        if self.rest.is_running() {
            SessionLogger::log_rest_event("started", seconds);
            self.events.push(LoggerEvent::RestStarted { seconds });
        }
    }

    /// Hold the countdown; a no-op unless running
    pub fn pause_rest(&mut self) {
        if self.rest.pause() {
            let seconds_remaining = self.rest.seconds_remaining();
            SessionLogger::log_rest_event("paused", seconds_remaining);
            self.events.push(LoggerEvent::RestPaused { seconds_remaining });
        }
    }

    /// Continue a paused countdown with a full tick from `now`
    pub fn resume_rest(&mut self, now: Duration) {
        if self.rest.resume(now) {
            let seconds_remaining = self.rest.seconds_remaining();
            SessionLogger::log_rest_event("resumed", seconds_remaining);
            self.events
                .push(LoggerEvent::RestResumed { seconds_remaining });
        }
    }

    /// Abandon the rest countdown; a no-op when idle
    pub fn skip_rest(&mut self) {
        if self.rest.skip() {
            SessionLogger::log_rest_event("skipped", 0);
            self.events.push(LoggerEvent::RestSkipped);
        }
    }

    /// Lengthen the rest countdown; a no-op when idle
    pub fn extend_rest(&mut self, seconds: Option<u32>) {
        let seconds = seconds.unwrap_or(self.config.rest.extend_step_seconds);
        if self.rest.extend(seconds) {
            let seconds_remaining = self.rest.seconds_remaining();
            SessionLogger::log_rest_event("extended", seconds_remaining);
            self.events
                .push(LoggerEvent::RestExtended { seconds_remaining });
        }
    }

    /// Show or hide drops, rebuilding the item list
    pub fn set_show_drops(&mut self, show: bool) {
        if show != self.show_drops {
            self.show_drops = show;
            self.rebuild_items();
        }
    }

    /// Take a new set list from the workout collaborator
    ///
    /// Targets are recaptured from the new list. An open drop modal is closed,
    /// since its indices may now name a different drop.
    pub fn replace_sets(&mut self, sets: Vec<Set>) {
        self.targets = sets.iter().map(Target::of).collect();
        self.exercise.sets = sets;
        self.set_session = None;
        if self.drop_session.take().is_some() {
            debug!("Drop edit closed by set replacement");
        }
        self.rebuild_items();
        self.open_set_session();
    }

    fn rebuild_items(&mut self) {
        let before = (self.selection.active_index(), self.selection.active_item());
        let items = build_items(&self.exercise.sets, self.show_drops);
        self.selection.set_items(items);
        debug!(
            items = self.selection.items().len(),
            active_index = self.selection.active_index(),
            "Items rebuilt"
        );

        let position = self.selection.active_index();
        if self.selection.phase() != SelectionPhase::Dragging {
            if let Some(command) = self.selection.scroll_to_index(position, false) {
                self.events.push(LoggerEvent::ScrollTo(command));
            }
        }
        if (self.selection.active_index(), self.selection.active_item()) != before {
            self.on_active_changed();
        }
    }

    /// Set the active item belongs to
    fn active_set_index(&self) -> AppResult<usize> {
        self.selection
            .active_item()
            .map(|item| item.set_index())
            .ok_or_else(|| AppError::invalid_state("no active set"))
    }

    /// Notes button pressed
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` for an empty list
    pub fn request_notes(&mut self) -> AppResult<()> {
        let set_index = self.active_set_index()?;
        self.events.push(LoggerEvent::NotesRequested { set_index });
        Ok(())
    }

    /// Video button pressed
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` for an empty list
    pub fn request_video(&mut self) -> AppResult<()> {
        let set_index = self.active_set_index()?;
        self.events.push(LoggerEvent::VideoRequested {
            set_index,
            video_url: self.exercise.video_url.clone(),
        });
        Ok(())
    }

    /// Serializable view of the session
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let has_items = !self.selection.items().is_empty();
        SessionSnapshot {
            exercise: self.exercise.clone(),
            items: self.selection.items().to_vec(),
            active_index: has_items.then(|| self.selection.active_index()),
            active_item: self.selection.active_item(),
            phase: self.selection.phase(),
            locked: self.selection.is_locked(),
            view_opacity: self.selection.view_opacity(),
            predata_modified: self.is_predata_modified(),
            validating: self.completion.validating(),
            show_drops: self.show_drops,
            rest: self.rest.snapshot(),
            drop_edit: self.drop_session.as_ref().map(|session| DropEditView {
                set_index: session.set_index(),
                drop_index: session.drop_index(),
                field: session.field(),
                weight: session.weight(),
                reps: session.reps(),
            }),
        }
    }

    /// Cancel every owned timer and close the drop modal
    ///
    /// After teardown no timer can fire; `poll` becomes a no-op.
    pub fn teardown(&mut self) {
        self.selection.teardown();
        self.rest.teardown();
        self.completion.teardown();
        self.drop_session = None;
        debug!(exercise = %self.exercise.name, "Set logger torn down");
    }
}
