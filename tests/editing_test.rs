// ABOUTME: Integration tests for set and drop edit sessions driven through the set logger
// ABOUTME: Covers the predata flag, picker clamping, the failure sentinel and the drop modal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, missing_docs)]

mod common;

use common::{apply, create_test_logger};
use irontrack::events::{DropField, LoggerEvent, LoggerInput};
use irontrack::test_utils::{sets_with_drops, working_sets};
use irontrack_core::errors::ErrorCode;
use irontrack_core::models::{DropSet, Reps, Set};
use std::time::Duration;

#[test]
fn test_predata_flag_follows_divergence_from_target() {
    let mut logger = create_test_logger(working_sets(3), 90);
    assert!(!logger.is_predata_modified());

    logger.adjust_weight(1).unwrap();
    assert_eq!(logger.exercise().sets[0].weight, 62.5);
    assert!(logger.is_predata_modified());

    // Editing back to the target clears the flag
    logger.adjust_weight(-1).unwrap();
    assert_eq!(logger.exercise().sets[0].weight, 60.0);
    assert!(!logger.is_predata_modified());

    logger.set_reps(Reps::Count(10)).unwrap();
    assert!(logger.is_predata_modified());
    logger.set_reps(Reps::Count(8)).unwrap();
    assert!(!logger.is_predata_modified());
}

#[test]
fn test_predata_flag_is_recomputed_when_returning_to_a_set() {
    let mut logger = create_test_logger(working_sets(3), 90);
    logger.set_weight(70.0).unwrap();
    assert!(logger.is_predata_modified());

    logger.select_item(1).unwrap();
    assert_eq!(logger.set_session().unwrap().set_index(), 1);
    assert!(!logger.is_predata_modified());

    logger.select_item(0).unwrap();
    assert!(logger.is_predata_modified());
    assert_eq!(logger.set_session().unwrap().original().weight, 60.0);
}

#[test]
fn test_finish_clears_predata_flag() {
    let mut logger = create_test_logger(working_sets(2), 90);
    logger.set_weight(65.0).unwrap();
    logger.finish_set(Duration::ZERO).unwrap();

    assert!(!logger.is_predata_modified());
    assert_eq!(logger.exercise().sets[0].weight, 65.0);
    assert!(logger.exercise().sets[0].completed);
}

#[test]
fn test_picker_values_are_clamped() {
    let mut logger = create_test_logger(working_sets(1), 90);
    logger.set_weight(5_000.0).unwrap();
    assert_eq!(logger.exercise().sets[0].weight, 999.0);

    logger.set_weight(-3.0).unwrap();
    assert_eq!(logger.exercise().sets[0].weight, 0.0);

    logger.set_weight(f64::NAN).unwrap();
    assert_eq!(logger.exercise().sets[0].weight, 0.0);

    logger.set_reps(Reps::Count(4_000)).unwrap();
    assert_eq!(logger.exercise().sets[0].reps, Reps::Count(999));

    logger.set_weight(42.123_456).unwrap();
    assert_eq!(logger.exercise().sets[0].weight, 42.12);
}

#[test]
fn test_reps_step_through_failure_sentinel() {
    let mut logger = create_test_logger(working_sets(1), 90);
    logger.set_reps(Reps::Count(0)).unwrap();

    logger.adjust_reps(-1).unwrap();
    assert_eq!(logger.exercise().sets[0].reps, Reps::Failure);

    // Further decrements stay at failure
    logger.adjust_reps(-1).unwrap();
    assert_eq!(logger.exercise().sets[0].reps, Reps::Failure);

    logger.adjust_reps(1).unwrap();
    assert_eq!(logger.exercise().sets[0].reps, Reps::Count(1));
}

#[test]
fn test_pickers_report_current_values() {
    let mut logger = create_test_logger(working_sets(2), 90);
    let events = apply(&mut logger, LoggerInput::WeightClicked, Duration::ZERO);
    assert_eq!(
        events,
        vec![LoggerEvent::WeightPickerRequested {
            set_index: 0,
            weight: 60.0
        }]
    );

    logger.set_reps(Reps::Failure).unwrap();
    let events = apply(&mut logger, LoggerInput::RepsClicked, Duration::ZERO);
    assert_eq!(
        events,
        vec![LoggerEvent::RepsPickerRequested {
            set_index: 0,
            reps: Reps::Failure
        }]
    );
}

#[test]
fn test_set_edits_are_rejected_on_a_drop() {
    let mut logger = create_test_logger(sets_with_drops(2, &[0], 1), 90);
    logger.select_item(1).unwrap();
    assert!(logger.set_session().is_none());

    let error = logger.adjust_weight(1).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidState);
    let error = logger.request_reps_picker().unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidState);
}

#[test]
fn test_drop_values_are_staged_until_validated() {
    let mut logger = create_test_logger(sets_with_drops(2, &[0], 2), 90);
    let events = apply(
        &mut logger,
        LoggerInput::DropWeightClicked {
            set_index: 0,
            drop_index: 0,
        },
        Duration::ZERO,
    );
    assert_eq!(
        events,
        vec![LoggerEvent::DropWeightPickerRequested {
            set_index: 0,
            drop_index: 0
        }]
    );

    logger.stage_drop_weight(47.5).unwrap();
    assert_eq!(logger.exercise().sets[0].drops[0].weight, 50.0);

    // Switching fields keeps the staged weight
    logger.open_drop_edit(0, 0, DropField::Reps).unwrap();
    let session = logger.drop_session().unwrap();
    assert_eq!(session.field(), DropField::Reps);
    assert_eq!(session.weight(), 47.5);

    logger.stage_drop_reps(Reps::Failure).unwrap();
    logger.drain_events();
    let events = apply(&mut logger, LoggerInput::ValidateDropEdit, Duration::ZERO);

    let drop = &logger.exercise().sets[0].drops[0];
    assert_eq!(drop.weight, 47.5);
    assert_eq!(drop.reps, Reps::Failure);
    assert!(!drop.completed);
    assert!(logger.drop_session().is_none());
    assert!(matches!(
        events.as_slice(),
        [LoggerEvent::DropEditValidated {
            set_index: 0,
            drop_index: 0,
            ..
        }]
    ));
}

#[test]
fn test_dismissed_drop_edit_writes_nothing() {
    let mut logger = create_test_logger(sets_with_drops(1, &[0], 1), 90);
    logger.open_drop_edit(0, 0, DropField::Weight).unwrap();
    logger.stage_drop_weight(20.0).unwrap();
    logger.dismiss_drop_edit();

    assert_eq!(logger.exercise().sets[0].drops[0].weight, 50.0);
    assert!(logger.drop_session().is_none());

    logger.open_drop_edit(0, 0, DropField::Weight).unwrap();
    assert_eq!(logger.drop_session().unwrap().weight(), 50.0);
}

#[test]
fn test_drop_edit_on_another_drop_starts_fresh() {
    let mut logger = create_test_logger(sets_with_drops(1, &[0], 2), 90);
    logger.open_drop_edit(0, 0, DropField::Weight).unwrap();
    logger.stage_drop_weight(20.0).unwrap();

    logger.open_drop_edit(0, 1, DropField::Weight).unwrap();
    let session = logger.drop_session().unwrap();
    assert!(session.targets(0, 1));
    assert_eq!(session.weight(), 40.0);
}

#[test]
fn test_drop_edit_rejections() {
    let sets = vec![
        Set::warmup(1, 40.0, Reps::Count(12)).with_drops(vec![DropSet::new(30.0, Reps::Count(8))]),
        Set::working(2, 60.0, Reps::Count(8)).with_drops(vec![DropSet::new(50.0, Reps::Count(8))]),
    ];
    let mut logger = create_test_logger(sets, 90);

    let error = logger.stage_drop_weight(10.0).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidState);

    let error = logger.open_drop_edit(0, 0, DropField::Weight).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    let error = logger.open_drop_edit(1, 4, DropField::Reps).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    let error = logger.validate_drop_edit().unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidState);
}

#[test]
fn test_completed_drop_cannot_be_edited() {
    let mut logger = create_test_logger(sets_with_drops(2, &[0], 1), 90);
    logger.select_item(1).unwrap();
    logger.drain_events();

    let events = apply(&mut logger, LoggerInput::CompleteDrop, Duration::ZERO);
    assert!(logger.exercise().sets[0].drops[0].completed);
    assert!(matches!(
        events.as_slice(),
        [LoggerEvent::DropCompleted {
            set_index: 0,
            drop_index: 0,
            ..
        }]
    ));
    // Drops carry no rest and do not advance
    assert!(!logger.rest_timer().is_running());
    assert_eq!(logger.active_index(), 1);

    let error = logger.complete_active_drop().unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidState);
    let error = logger.open_drop_edit(0, 0, DropField::Weight).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidState);
}

#[test]
fn test_drop_edit_is_locked_with_the_series() {
    let mut logger = create_test_logger(sets_with_drops(1, &[0], 1), 90);
    logger.toggle_lock().unwrap();
    let error = logger.open_drop_edit(0, 0, DropField::Weight).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceLocked);
}

#[test]
fn test_replacing_sets_discards_staged_drop_values() {
    let sets = vec![Set::working(1, 60.0, Reps::Count(8))
        .with_drops(vec![DropSet::new(50.0, Reps::Count(6))])];
    let mut logger = create_test_logger(sets, 90);
    logger.open_drop_edit(0, 0, DropField::Weight).unwrap();
    logger.stage_drop_weight(30.0).unwrap();

    // Same indices, different drop
    logger.replace_sets(vec![Set::working(7, 80.0, Reps::Count(5))
        .with_drops(vec![DropSet::new(45.0, Reps::Count(4))])]);
    assert!(logger.drop_session().is_none());
    assert!(logger.snapshot().drop_edit.is_none());

    let error = logger.validate_drop_edit().unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidState);
    let drop = &logger.exercise().sets[0].drops[0];
    assert_eq!(drop.weight, 45.0);
    assert_eq!(drop.reps, Reps::Count(4));
    assert!(!logger.drain_events().iter().any(|event| matches!(
        event,
        LoggerEvent::DropEditValidated { .. }
    )));
}
