// ABOUTME: Repetition count with the muscular-failure sentinel
// ABOUTME: Serializes as an integer or the string "failure", never coerced to zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::constants::wire;

/// Reps performed or targeted for a set or drop
///
/// `Failure` means "repeated to muscular failure" rather than a fixed count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reps {
    /// A concrete repetition count
    Count(u32),
    /// Performed to muscular failure
    Failure,
}

impl Reps {
    /// Whether this is the failure sentinel
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure)
    }

    /// Concrete count, if any
    #[must_use]
    pub const fn count(&self) -> Option<u32> {
        match self {
            Self::Count(n) => Some(*n),
            Self::Failure => None,
        }
    }

    /// Apply a relative adjustment, keeping the result inside `[0, max]` or `Failure`
    ///
    /// Going below zero from exactly zero enters `Failure`. Any positive step out of
    /// `Failure` restarts counting at one; negative steps leave `Failure` untouched.
    #[must_use]
    pub fn adjusted(self, delta: i64, max: u32) -> Self {
        match self {
            Self::Failure if delta > 0 => Self::Count(1.min(max)),
            Self::Failure => Self::Failure,
            Self::Count(0) if delta < 0 => Self::Failure,
            Self::Count(n) => {
                let next = (i64::from(n) + delta).clamp(0, i64::from(max));
                Self::Count(next as u32)
            }
        }
    }

    /// Clamp an absolute picker value into `[0, max]`
    #[must_use]
    pub fn clamped(self, max: u32) -> Self {
        match self {
            Self::Count(n) => Self::Count(n.min(max)),
            Self::Failure => Self::Failure,
        }
    }
}

impl Default for Reps {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl From<u32> for Reps {
    fn from(count: u32) -> Self {
        Self::Count(count)
    }
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Failure => f.write_str(wire::FAILURE_GLYPH),
        }
    }
}

impl Serialize for Reps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_u32(*n),
            Self::Failure => serializer.serialize_str(wire::FAILURE),
        }
    }
}

struct RepsVisitor;

impl Visitor<'_> for RepsVisitor {
    type Value = Reps;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or \"failure\"")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Reps, E> {
        u32::try_from(value)
            .map(Reps::Count)
            .map_err(|_| E::custom(format!("reps out of range: {value}")))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Reps, E> {
        // Negative counts are clamped, matching picker semantics
        u32::try_from(value.max(0))
            .map(Reps::Count)
            .map_err(|_| E::custom(format!("reps out of range: {value}")))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Reps, E> {
        if value.is_finite() {
            Ok(Reps::Count(value.max(0.0).round() as u32))
        } else {
            Err(E::custom("reps must be finite"))
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Reps, E> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case(wire::FAILURE) || trimmed == wire::FAILURE_LEGACY {
            return Ok(Reps::Failure);
        }
        trimmed
            .parse::<u32>()
            .map(Reps::Count)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

impl<'de> Deserialize<'de> for Reps {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RepsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrement_from_zero_enters_failure() {
        assert_eq!(Reps::Count(0).adjusted(-1, 999), Reps::Failure);
    }

    #[test]
    fn test_increment_from_failure_restarts_at_one() {
        assert_eq!(Reps::Failure.adjusted(1, 999), Reps::Count(1));
        assert_eq!(Reps::Failure.adjusted(5, 999), Reps::Count(1));
        assert_eq!(Reps::Failure.adjusted(-1, 999), Reps::Failure);
    }

    #[test]
    fn test_large_negative_step_clamps_at_zero() {
        assert_eq!(Reps::Count(3).adjusted(-5, 999), Reps::Count(0));
        assert_eq!(Reps::Count(998).adjusted(5, 999), Reps::Count(999));
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(serde_json::to_string(&Reps::Failure).unwrap(), "\"failure\"");
        assert_eq!(serde_json::to_string(&Reps::Count(8)).unwrap(), "8");
        assert_eq!(serde_json::from_str::<Reps>("\"échec\"").unwrap(), Reps::Failure);
        assert_eq!(serde_json::from_str::<Reps>("\"12\"").unwrap(), Reps::Count(12));
        assert_eq!(serde_json::from_str::<Reps>("-3").unwrap(), Reps::Count(0));
        assert!(serde_json::from_str::<Reps>("\"lots\"").is_err());
    }

    #[test]
    fn test_display_uses_glyph_for_failure() {
        assert_eq!(Reps::Failure.to_string(), "∞");
        assert_eq!(Reps::Count(10).to_string(), "10");
    }
}
