// ABOUTME: Integration tests for the selection controller state machine
// ABOUTME: Randomized scroll invariant, lock semantics, suppression and item rebuilds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, missing_docs)]

mod common;

use common::{create_test_logger, ms, settle_viewport};
use irontrack::config::SetLoggerConfig;
use irontrack::events::{LoggerEvent, ScrollCommand};
use irontrack::selection::{SelectionController, SelectionPhase};
use irontrack::sequencer::{build_items, Item};
use irontrack::test_utils::{sets_with_drops, working_sets};
use irontrack_core::errors::ErrorCode;
use irontrack_core::models::Set;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

fn controller(sets: &[Set], show_drops: bool) -> SelectionController {
    SelectionController::new(build_items(sets, show_drops), &SetLoggerConfig::new())
}

#[test]
fn test_active_index_stays_in_range_through_random_scrolling() {
    let sets = sets_with_drops(8, &[1, 3, 6], 3);
    let mut selection = controller(&sets, true);
    selection.set_viewport_height(640.0);
    let mut rng = StdRng::seed_from_u64(0x5e7_1066);
    let total = selection.geometry().total_height();
    let mut now = Duration::ZERO;
    let mut show_drops = true;

    for step in 0..1000 {
        now += ms(rng.gen_range(1..40));
        match rng.gen_range(0..100) {
            0 => selection.pointer_down(now),
            1 => selection.scroll_animation_finished(),
            2 => {
                show_drops = !show_drops;
                selection.set_items(build_items(&sets, show_drops));
            }
            3 => {
                now += ms(200);
                selection.poll(now);
            }
            4 => {
                let index = rng.gen_range(0..selection.items().len() + 3);
                selection.scroll_to_index(index, true);
            }
            5 => {
                selection.scroll(f64::NAN, now);
            }
            _ => {
                let offset = rng.gen_range(-500.0..total + 500.0);
                selection.scroll(offset, now);
            }
        }
        assert!(
            selection.active_index() < selection.items().len(),
            "step {step}: active index {} out of {} items",
            selection.active_index(),
            selection.items().len()
        );
        assert!(selection.active_item().is_some());
    }
}

#[test]
fn test_drag_tracks_centered_item_on_every_update() {
    let sets = sets_with_drops(5, &[2], 2);
    let mut selection = controller(&sets, true);
    selection.set_viewport_height(400.0);
    selection.pointer_down(Duration::ZERO);

    let mut now = Duration::ZERO;
    let mut offset = -200.0;
    while offset < selection.geometry().total_height() {
        now += ms(16);
        selection.scroll(offset, now);
        assert_eq!(
            Some(selection.active_index()),
            selection.geometry().index_at_center(offset, 400.0)
        );
        assert_eq!(selection.phase(), SelectionPhase::Dragging);
        offset += 13.0;
    }
}

#[test]
fn test_settle_waits_for_quiet_period() {
    let mut selection = controller(&working_sets(4), true);
    selection.set_viewport_height(96.0);
    selection.pointer_down(ms(0));
    selection.scroll(100.0, ms(0));
    selection.scroll(110.0, ms(100));
    // 150ms after the first update, but only 50ms after the last one
    assert_eq!(selection.poll(ms(150)), None);
    assert_eq!(selection.next_deadline(), Some(ms(250)));

    let snap = selection.poll(ms(250)).unwrap();
    assert_eq!(snap.offset, 96.0);
    assert!(snap.animated);
}

#[test]
fn test_programmatic_scroll_is_not_read_as_a_gesture() {
    let mut selection = controller(&working_sets(5), true);
    selection.set_viewport_height(96.0);

    let command = selection.scroll_to_index(3, true).unwrap();
    assert_eq!(command.offset, 288.0);
    assert_eq!(selection.active_index(), 3);

    // Intermediate animation frames pass over items 1 and 2
    for offset in [40.0, 120.0, 200.0, 260.0] {
        assert_eq!(selection.scroll(offset, ms(10)), None);
        assert_eq!(selection.active_index(), 3);
    }
    assert!(selection.is_suppressing());
    assert_eq!(selection.next_deadline(), None);

    // Landing on the target ends suppression
    selection.scroll(288.0, ms(300));
    assert!(!selection.is_suppressing());
    assert_eq!(selection.phase(), SelectionPhase::Idle);
}

#[test]
fn test_pointer_down_interrupts_programmatic_scroll() {
    let mut selection = controller(&working_sets(5), true);
    selection.set_viewport_height(96.0);
    selection.scroll_to_index(4, true);

    selection.pointer_down(ms(50));
    assert!(!selection.is_suppressing());
    assert_eq!(selection.scroll(100.0, ms(60)), Some(1));
}

#[test]
fn test_hiding_drops_mid_drag_moves_to_parent_set() {
    let sets = sets_with_drops(3, &[0], 2);
    let mut selection = controller(&sets, true);
    selection.set_viewport_height(72.0);
    selection.pointer_down(ms(0));

    // Center the second drop: offset 96 + 72
    selection.scroll(168.0, ms(16));
    assert_eq!(
        selection.active_item(),
        Some(Item::Drop {
            set_index: 0,
            drop_index: 1
        })
    );

    selection.set_items(build_items(&sets, false));
    assert_eq!(selection.active_item(), Some(Item::Set { set_index: 0 }));
    assert_eq!(selection.geometry().len(), 3);
}

#[test]
fn test_rebuild_preserves_active_item_identity() {
    let sets = sets_with_drops(4, &[0, 1], 2);
    let mut selection = controller(&sets, false);
    selection.scroll_to_index(2, false);
    assert_eq!(selection.active_item(), Some(Item::Set { set_index: 2 }));

    selection.set_items(build_items(&sets, true));
    assert_eq!(selection.active_item(), Some(Item::Set { set_index: 2 }));
    assert_eq!(selection.active_index(), 6);
}

#[test]
fn test_shrinking_list_clamps_index() {
    let mut selection = controller(&working_sets(6), true);
    selection.scroll_to_index(5, false);
    selection.set_items(build_items(&working_sets(2), true));
    assert_eq!(selection.active_index(), 1);

    selection.set_items(Vec::new());
    assert_eq!(selection.active_item(), None);
    assert_eq!(selection.scroll(100.0, ms(0)), None);
}

#[test]
fn test_locked_scroll_never_changes_active_item() {
    let mut logger = create_test_logger(working_sets(5), 90);
    settle_viewport(&mut logger, 96.0);
    logger.toggle_lock().unwrap();
    assert!(logger.is_locked());
    assert_eq!(logger.selection().view_opacity(), 0.5);

    logger.pointer_down(ms(0));
    for step in 0..50_u32 {
        logger.scroll(f64::from(step) * 9.0, ms(u64::from(step) * 16));
    }
    logger.poll(ms(2_000));
    assert_eq!(logger.active_index(), 0);
    assert_eq!(logger.selection().phase(), SelectionPhase::Idle);
    assert!(logger
        .drain_events()
        .iter()
        .all(|event| matches!(event, LoggerEvent::LockChanged { .. })));

    let error = logger.select_item(3).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceLocked);
    let error = logger.set_weight(100.0).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceLocked);

    logger.toggle_lock().unwrap();
    assert_eq!(logger.selection().view_opacity(), 1.0);
}

#[test]
fn test_lock_is_rejected_on_a_drop() {
    let mut logger = create_test_logger(sets_with_drops(2, &[0], 1), 90);
    logger.select_item(1).unwrap();
    assert!(matches!(logger.active_item(), Some(Item::Drop { .. })));

    let error = logger.toggle_lock().unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidState);
    assert!(!logger.is_locked());
}

#[test]
fn test_item_tap_selects_and_scrolls() {
    let mut logger = create_test_logger(working_sets(3), 90);
    settle_viewport(&mut logger, 96.0);
    logger.select_item(2).unwrap();

    let events = logger.drain_events();
    assert!(events.contains(&LoggerEvent::ActiveItemChanged {
        index: 2,
        item: Item::Set { set_index: 2 },
    }));
    assert!(events
        .iter()
        .any(|event| matches!(event, LoggerEvent::ScrollTo(command) if command.offset == 192.0)));

    let error = logger.select_item(9).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[test]
fn test_resize_during_snap_retargets_the_snap() {
    let mut logger = create_test_logger(working_sets(8), 60);
    settle_viewport(&mut logger, 96.0);

    logger.pointer_down(Duration::ZERO);
    logger.scroll(150.0, ms(10));
    logger.poll(ms(166));
    let events = logger.drain_events();
    assert!(events.contains(&LoggerEvent::ScrollTo(ScrollCommand {
        offset: 192.0,
        animated: true,
    })));
    assert_eq!(logger.selection().phase(), SelectionPhase::Snapping);
    assert_eq!(logger.active_index(), 2);

    logger.set_viewport_height(400.0);
    let target = logger.selection().geometry().centered_offset_of(2, 400.0);
    assert_eq!(target, 40.0);
    assert_eq!(
        logger.drain_events(),
        vec![LoggerEvent::ScrollTo(ScrollCommand {
            offset: target,
            animated: false,
        })]
    );

    // The old snap landing no longer ends the programmatic scroll
    logger.scroll(192.0, ms(300));
    assert_eq!(logger.selection().phase(), SelectionPhase::Snapping);
    assert_eq!(logger.active_index(), 2);

    logger.scroll(target, ms(320));
    let selection = logger.selection();
    assert_eq!(selection.phase(), SelectionPhase::Idle);
    assert_eq!(
        selection
            .geometry()
            .index_at_center(selection.last_offset(), 400.0),
        Some(2)
    );
    assert!(logger.drain_events().is_empty());
}
