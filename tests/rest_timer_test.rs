// ABOUTME: Integration tests for the rest countdown
// ABOUTME: Start, pause, skip, extend and expiry on a virtual clock, plus late and stale ticks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, missing_docs)]

use irontrack::rest_timer::{RestState, RestTimer, TickOutcome};
use std::time::Duration;

const fn secs(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}

fn timer() -> RestTimer {
    RestTimer::new(secs(1))
}

#[test]
fn test_countdown_reaches_zero_and_goes_idle() {
    let mut rest = timer();
    rest.start(3, Duration::ZERO);
    assert_eq!(rest.state(), RestState::Running);
    assert_eq!(rest.next_deadline(), Some(secs(1)));

    assert_eq!(rest.fire(secs(1)), Some(TickOutcome::Ticked(2)));
    assert_eq!(rest.fire(secs(2)), Some(TickOutcome::Ticked(1)));
    assert_eq!(rest.fire(secs(3)), Some(TickOutcome::Finished));

    assert_eq!(rest.state(), RestState::Idle);
    assert_eq!(rest.seconds_remaining(), 0);
    assert_eq!(rest.next_deadline(), None);
    assert_eq!(rest.fire(secs(4)), None);
}

#[test]
fn test_fire_before_deadline_is_a_no_op() {
    let mut rest = timer();
    rest.start(10, Duration::ZERO);
    assert_eq!(rest.fire(Duration::from_millis(999)), None);
    assert_eq!(rest.seconds_remaining(), 10);
}

#[test]
fn test_late_fires_keep_the_original_cadence() {
    let mut rest = timer();
    rest.start(10, Duration::ZERO);
    // Woken up late: each call consumes exactly one overdue tick
    assert_eq!(rest.fire(secs(5)), Some(TickOutcome::Ticked(9)));
    assert_eq!(rest.next_deadline(), Some(secs(2)));
    assert_eq!(rest.fire(secs(5)), Some(TickOutcome::Ticked(8)));
}

#[test]
fn test_start_overrides_without_stacking() {
    let mut rest = timer();
    rest.start(90, Duration::ZERO);
    for second in 1..=10 {
        rest.fire(secs(second));
    }
    assert_eq!(rest.seconds_remaining(), 80);

    rest.start(60, Duration::from_millis(10_500));
    assert_eq!(rest.seconds_remaining(), 60);
    assert_eq!(rest.total_seconds(), 60);
    assert_eq!(rest.next_deadline(), Some(Duration::from_millis(11_500)));
    assert_eq!(rest.fire(secs(11)), None);
}

#[test]
fn test_ticks_after_skip_do_nothing() {
    let mut rest = timer();
    rest.start(30, Duration::ZERO);
    assert!(rest.skip());
    assert_eq!(rest.state(), RestState::Idle);
    assert_eq!(rest.seconds_remaining(), 0);

    assert_eq!(rest.tick(), None);
    assert_eq!(rest.fire(secs(1)), None);
    assert!(!rest.skip());
    assert_eq!(rest.seconds_remaining(), 0);
}

#[test]
fn test_extend_only_applies_while_running() {
    let mut rest = timer();
    assert!(!rest.extend(30));
    assert_eq!(rest.seconds_remaining(), 0);

    rest.start(60, Duration::ZERO);
    rest.fire(secs(1));
    assert!(rest.extend(30));
    assert_eq!(rest.seconds_remaining(), 89);
    assert_eq!(rest.total_seconds(), 90);
}

#[test]
fn test_pause_holds_remaining_seconds() {
    let mut rest = timer();
    rest.start(10, Duration::ZERO);
    rest.fire(secs(1));
    rest.fire(secs(2));
    assert!(rest.pause());
    assert_eq!(rest.state(), RestState::Paused);
    assert_eq!(rest.seconds_remaining(), 8);

    // The tick that would have fired is gone
    assert_eq!(rest.fire(secs(3)), None);
    assert_eq!(rest.tick(), None);
    assert_eq!(rest.seconds_remaining(), 8);
    assert!(!rest.pause());
}

#[test]
fn test_resume_counts_down_from_resume_time() {
    let mut rest = timer();
    rest.start(3, Duration::ZERO);
    rest.fire(secs(1));
    rest.pause();
    assert!(rest.resume(Duration::from_millis(7_200)));
    assert_eq!(rest.state(), RestState::Running);

    assert_eq!(rest.fire(secs(8)), None);
    assert_eq!(
        rest.fire(Duration::from_millis(8_200)),
        Some(TickOutcome::Ticked(1))
    );
    assert_eq!(
        rest.fire(Duration::from_millis(9_200)),
        Some(TickOutcome::Finished)
    );
    assert!(!rest.resume(secs(10)));
}

#[test]
fn test_paused_countdown_can_be_extended_or_skipped() {
    let mut rest = timer();
    rest.start(30, Duration::ZERO);
    rest.pause();
    assert!(rest.extend(15));
    assert_eq!(rest.seconds_remaining(), 45);
    assert_eq!(rest.state(), RestState::Paused);

    assert!(rest.skip());
    assert_eq!(rest.state(), RestState::Idle);
    assert!(!rest.resume(secs(1)));

    rest.start(20, secs(2));
    rest.pause();
    rest.start(20, secs(3));
    assert_eq!(rest.state(), RestState::Running);
}

#[test]
fn test_zero_duration_leaves_timer_idle() {
    let mut rest = timer();
    rest.start(0, Duration::ZERO);
    assert!(!rest.is_running());
    assert_eq!(rest.next_deadline(), None);
}

#[test]
fn test_display_and_progress() {
    let mut rest = timer();
    rest.start(90, Duration::ZERO);
    assert_eq!(rest.formatted_remaining(), "1:30");
    assert_eq!(rest.progress(), 1.0);

    rest.start(4, Duration::ZERO);
    rest.fire(secs(1));
    assert_eq!(rest.formatted_remaining(), "0:03");
    assert_eq!(rest.progress(), 0.75);

    let snapshot = rest.snapshot();
    assert_eq!(snapshot.state, RestState::Running);
    assert_eq!(snapshot.total_seconds, 4);

    rest.teardown();
    assert_eq!(rest.progress(), 0.0);
    assert_eq!(rest.next_deadline(), None);
}
