// ABOUTME: Exercise aggregate supplied by the workout-session collaborator
// ABOUTME: Carries the prescribed protocol and the ordered sets being logged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::Set;
use crate::constants::rest::FALLBACK_REST_SECONDS;

const fn default_rest_seconds() -> u32 {
    FALLBACK_REST_SECONDS
}

/// Coach-prescribed protocol for an exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    /// Number of sets prescribed
    #[serde(default)]
    pub target_sets: u32,
    /// Rep range shown to the athlete, e.g. "8-12"
    #[serde(default)]
    pub target_reps: String,
    /// Tempo notation, e.g. "3-0-1-0"
    #[serde(default)]
    pub tempo: String,
    /// Rest between sets, in seconds
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            target_sets: 0,
            target_reps: String::new(),
            tempo: String::new(),
            rest_seconds: FALLBACK_REST_SECONDS,
        }
    }
}

/// Exercise currently being performed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Demonstration video
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Prescribed protocol
    #[serde(default)]
    pub protocol: Protocol,
    /// Sets in execution order
    #[serde(default)]
    pub sets: Vec<Set>,
}

impl Exercise {
    /// Number of sets already logged
    #[must_use]
    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|set| set.completed).count()
    }

    /// Whether every set has been logged
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.sets.is_empty() && self.sets.iter().all(|set| set.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Reps, SetKind};

    #[test]
    fn test_deserializes_collaborator_payload() {
        let json = r#"{
            "name": "Bench Press",
            "videoUrl": "https://example.com/bench.mp4",
            "protocol": { "targetSets": 3, "targetReps": "8-12", "tempo": "3-0-1-0", "restSeconds": 120 },
            "sets": [
                { "id": 1, "setNumber": 1, "type": "WARMUP", "weight": 40, "reps": 12 },
                { "id": 2, "setNumber": 2, "type": "working", "weight": 80, "reps": "failure",
                  "previousBest": "80kg × 10", "drops": [ { "weight": 60, "reps": "échec" } ] },
                { "id": 3 }
            ]
        }"#;

        let exercise: Exercise = serde_json::from_str(json).unwrap();
        assert_eq!(exercise.protocol.rest_seconds, 120);
        assert_eq!(exercise.sets[0].kind, SetKind::Warmup);
        assert_eq!(exercise.sets[1].reps, Reps::Failure);
        assert_eq!(exercise.sets[1].drops[0].reps, Reps::Failure);
        assert_eq!(exercise.sets[2].weight, 0.0);
        assert_eq!(exercise.sets[2].reps, Reps::Count(0));
        assert_eq!(exercise.sets[2].kind, SetKind::Working);
    }

    #[test]
    fn test_missing_protocol_rest_falls_back() {
        let exercise: Exercise =
            serde_json::from_str(r#"{ "name": "Row", "protocol": {}, "sets": [] }"#).unwrap();
        assert_eq!(exercise.protocol.rest_seconds, FALLBACK_REST_SECONDS);
        assert!(!exercise.is_complete());
    }

    #[test]
    fn test_failure_survives_round_trip() {
        let mut exercise = Exercise::default();
        exercise.sets.push(Set::working(1, 50.0, Reps::Failure));
        let json = serde_json::to_string(&exercise).unwrap();
        assert!(json.contains("\"reps\":\"failure\""));
        let back: Exercise = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sets[0].reps, Reps::Failure);
    }
}
