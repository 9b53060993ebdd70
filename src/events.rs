// ABOUTME: Input and output message types for a set logger session
// ABOUTME: LoggerInput is the full command surface, LoggerEvent the full callback surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Messages
//!
//! The engine exposes exactly one outbound channel. Every UI escalation
//! (value pickers, notes, video), every programmatic scroll and every
//! completion crossing the persistence boundary is a [`LoggerEvent`] queued
//! on it, and the host drains the queue after each call.

use irontrack_core::models::{DropSet, Reps, Set};
use serde::{Deserialize, Serialize};

use crate::sequencer::Item;

/// Scroll the host view to an absolute offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollCommand {
    /// Target scroll offset
    pub offset: f64,
    /// Whether the host should animate the move
    pub animated: bool,
}

/// Which drop value the picker is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropField {
    /// Drop weight
    Weight,
    /// Drop reps
    Reps,
}

/// Everything the engine asks of its host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LoggerEvent {
    /// Open the weight picker for the active set
    WeightPickerRequested {
        /// Set being edited
        set_index: usize,
        /// Value the picker should start from
        weight: f64,
    },
    /// Open the reps picker for the active set
    RepsPickerRequested {
        /// Set being edited
        set_index: usize,
        /// Value the picker should start from
        reps: Reps,
    },
    /// Open the modal weight picker for a drop
    DropWeightPickerRequested {
        /// Owning set
        set_index: usize,
        /// Drop being edited
        drop_index: usize,
    },
    /// Open the modal reps picker for a drop
    DropRepsPickerRequested {
        /// Owning set
        set_index: usize,
        /// Drop being edited
        drop_index: usize,
    },
    /// Show the notes for a set
    NotesRequested {
        /// Set the notes belong to
        set_index: usize,
    },
    /// Play the demonstration video
    VideoRequested {
        /// Set the athlete was on
        set_index: usize,
        /// Exercise video, when one exists
        video_url: Option<String>,
    },
    /// Programmatic scroll the host must perform
    ScrollTo(ScrollCommand),
    /// The single active item changed
    ActiveItemChanged {
        /// Position in the item list
        index: usize,
        /// The item now active
        item: Item,
    },
    /// Series lock toggled
    LockChanged {
        /// New lock state
        locked: bool,
    },
    /// Validation highlight started or ended for a set
    ValidationFlash {
        /// Set being highlighted
        set_index: usize,
        /// Whether the highlight is showing
        active: bool,
    },
    /// A set was logged; collaborators persist it
    SetCompleted {
        /// Position of the set
        set_index: usize,
        /// Logged values
        set: Set,
    },
    /// A drop was logged
    DropCompleted {
        /// Owning set
        set_index: usize,
        /// Position of the drop
        drop_index: usize,
        /// Logged values
        drop: DropSet,
    },
    /// Staged drop values were written back
    DropEditValidated {
        /// Owning set
        set_index: usize,
        /// Position of the drop
        drop_index: usize,
        /// Values after the write
        drop: DropSet,
    },
    /// Rest countdown (re)started
    RestStarted {
        /// Countdown length
        seconds: u32,
    },
    /// One second of rest elapsed
    RestTick {
        /// Seconds left
        seconds_remaining: u32,
    },
    /// Rest countdown lengthened
    RestExtended {
        /// Seconds left after the extension
        seconds_remaining: u32,
    },
    /// Rest countdown held
    RestPaused {
        /// Seconds left while held
        seconds_remaining: u32,
    },
    /// Held countdown continues
    RestResumed {
        /// Seconds left
        seconds_remaining: u32,
    },
    /// Rest countdown abandoned
    RestSkipped,
    /// Rest countdown reached zero
    RestFinished,
}

/// Everything the host can tell the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LoggerInput {
    /// Finger went down on the list
    PointerDown,
    /// Scroll position update
    Scroll {
        /// Current scroll offset
        offset: f64,
    },
    /// A programmatic scroll animation ended
    ScrollAnimationFinished,
    /// Viewport was resized
    ViewportResized {
        /// New viewport height
        height: f64,
    },
    /// Item was tapped
    SelectItem {
        /// Position in the item list
        index: usize,
    },
    /// Lock button pressed
    ToggleLock,
    /// Relative weight change in picker steps
    AdjustWeight {
        /// Signed step count
        steps: i32,
    },
    /// Relative reps change in picker steps
    AdjustReps {
        /// Signed step count
        steps: i32,
    },
    /// Absolute weight chosen in the picker
    SetWeight {
        /// Chosen weight
        weight: f64,
    },
    /// Absolute reps chosen in the picker
    SetReps {
        /// Chosen reps
        reps: Reps,
    },
    /// Weight value on the active set tapped
    WeightClicked,
    /// Reps value on the active set tapped
    RepsClicked,
    /// Weight value on a drop tapped
    DropWeightClicked {
        /// Owning set
        set_index: usize,
        /// Drop tapped
        drop_index: usize,
    },
    /// Reps value on a drop tapped
    DropRepsClicked {
        /// Owning set
        set_index: usize,
        /// Drop tapped
        drop_index: usize,
    },
    /// Stage a weight in the open drop modal
    StageDropWeight {
        /// Staged weight
        weight: f64,
    },
    /// Stage reps in the open drop modal
    StageDropReps {
        /// Staged reps
        reps: Reps,
    },
    /// Confirm the drop modal
    ValidateDropEdit,
    /// Close the drop modal without saving
    DismissDropEdit,
    /// Log the active drop
    CompleteDrop,
    /// Log the active set
    FinishSet,
    /// Start the protocol's rest countdown without logging a set
    StartRest,
    /// Hold the rest countdown
    PauseRest,
    /// Continue a held rest countdown
    ResumeRest,
    /// Abandon the rest countdown
    SkipRest,
    /// Lengthen the rest countdown
    ExtendRest {
        /// Seconds to add; the configured step when absent
        #[serde(default)]
        seconds: Option<u32>,
    },
    /// Show or hide drops in the list
    SetShowDrops {
        /// Whether drops are visible
        show: bool,
    },
    /// Collaborator replaced the set list
    ReplaceSets {
        /// New sets in execution order
        sets: Vec<Set>,
    },
    /// Notes button pressed
    RequestNotes,
    /// Video button pressed
    RequestVideo,
}

impl LoggerInput {
    /// Stable name for logging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PointerDown => "pointer_down",
            Self::Scroll { .. } => "scroll",
            Self::ScrollAnimationFinished => "scroll_animation_finished",
            Self::ViewportResized { .. } => "viewport_resized",
            Self::SelectItem { .. } => "select_item",
            Self::ToggleLock => "toggle_lock",
            Self::AdjustWeight { .. } => "adjust_weight",
            Self::AdjustReps { .. } => "adjust_reps",
            Self::SetWeight { .. } => "set_weight",
            Self::SetReps { .. } => "set_reps",
            Self::WeightClicked => "weight_clicked",
            Self::RepsClicked => "reps_clicked",
            Self::DropWeightClicked { .. } => "drop_weight_clicked",
            Self::DropRepsClicked { .. } => "drop_reps_clicked",
            Self::StageDropWeight { .. } => "stage_drop_weight",
            Self::StageDropReps { .. } => "stage_drop_reps",
            Self::ValidateDropEdit => "validate_drop_edit",
            Self::DismissDropEdit => "dismiss_drop_edit",
            Self::CompleteDrop => "complete_drop",
            Self::FinishSet => "finish_set",
            Self::StartRest => "start_rest",
            Self::PauseRest => "pause_rest",
            Self::ResumeRest => "resume_rest",
            Self::SkipRest => "skip_rest",
            Self::ExtendRest { .. } => "extend_rest",
            Self::SetShowDrops { .. } => "set_show_drops",
            Self::ReplaceSets { .. } => "replace_sets",
            Self::RequestNotes => "request_notes",
            Self::RequestVideo => "request_video",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_wire_format() {
        let input: LoggerInput =
            serde_json::from_str(r#"{"type":"drop_reps_clicked","setIndex":1,"dropIndex":0}"#)
                .unwrap();
        assert_eq!(
            input,
            LoggerInput::DropRepsClicked {
                set_index: 1,
                drop_index: 0
            }
        );

        let input: LoggerInput = serde_json::from_str(r#"{"type":"extend_rest"}"#).unwrap();
        assert_eq!(input, LoggerInput::ExtendRest { seconds: None });
    }

    #[test]
    fn test_scroll_event_wire_format() {
        let event = LoggerEvent::ScrollTo(ScrollCommand {
            offset: 96.0,
            animated: true,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "scroll_to");
        assert_eq!(json["offset"], 96.0);
        assert_eq!(json["animated"], true);
    }
}
