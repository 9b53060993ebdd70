// ABOUTME: Test utilities for building exercises and capturing feedback cues
// ABOUTME: Centralizes fixture creation so unit, integration and bench code agree on shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use irontrack_core::models::{DropSet, Exercise, Protocol, Reps, Set};
use std::sync::{Arc, Mutex, PoisonError};

use crate::feedback::{Feedback, FeedbackCue, FeedbackUnavailable};

/// Create `count` pending working sets at 60kg x 8
#[must_use]
pub fn working_sets(count: usize) -> Vec<Set> {
    (1..=count)
        .map(|id| Set::working(id as u32, 60.0, Reps::Count(8)))
        .collect()
}

/// Create `count` working sets where `with_drops` carries `drops` drops each
///
/// Drops step down by 10kg from the parent weight and alternate between eight
/// reps and failure.
#[must_use]
pub fn sets_with_drops(count: usize, with_drops: &[usize], drops: usize) -> Vec<Set> {
    working_sets(count)
        .into_iter()
        .enumerate()
        .map(|(index, set)| {
            if !with_drops.contains(&index) {
                return set;
            }
            let parent = set.weight;
            set.with_drops(
                (1..=drops)
                    .map(|step| {
                        let reps = if step % 2 == 0 {
                            Reps::Failure
                        } else {
                            Reps::Count(8)
                        };
                        DropSet::new((parent - 10.0 * step as f64).max(0.0), reps)
                    })
                    .collect(),
            )
        })
        .collect()
}

/// Wrap sets in an exercise with the given rest
#[must_use]
pub fn create_test_exercise(sets: Vec<Set>, rest_seconds: u32) -> Exercise {
    Exercise {
        name: "Bench Press".to_owned(),
        video_url: Some("https://videos.example.com/bench-press.mp4".to_owned()),
        protocol: Protocol {
            target_sets: sets.len() as u32,
            target_reps: "8-10".to_owned(),
            tempo: "3-0-1-0".to_owned(),
            rest_seconds,
        },
        sets,
    }
}

/// Delivered cue as seen by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCue {
    /// Vibration with its pattern
    Vibration(Vec<u32>),
    /// Audio signal
    Sound(FeedbackCue),
}

/// Feedback backend that records every cue; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    cues: Arc<Mutex<Vec<RecordedCue>>>,
    unavailable: bool,
}

impl RecordingFeedback {
    /// Recording backend that accepts every cue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that records attempts but reports itself unavailable
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Cues recorded so far
    #[must_use]
    pub fn cues(&self) -> Vec<RecordedCue> {
        self.cues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, cue: RecordedCue) -> Result<(), FeedbackUnavailable> {
        self.cues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(cue);
        if self.unavailable {
            Err(FeedbackUnavailable::new("recording backend marked unavailable"))
        } else {
            Ok(())
        }
    }
}

impl Feedback for RecordingFeedback {
    fn vibrate(&mut self, pattern_ms: &[u32]) -> Result<(), FeedbackUnavailable> {
        self.record(RecordedCue::Vibration(pattern_ms.to_vec()))
    }

    fn play_sound(&mut self, cue: FeedbackCue) -> Result<(), FeedbackUnavailable> {
        self.record(RecordedCue::Sound(cue))
    }
}
