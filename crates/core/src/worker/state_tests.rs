// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use proptest::prelude::*;
use yare::parameterized;

#[parameterized(
    idle = { WorkerState::Idle, false },
    running = { WorkerState::Running, false },
    stop_requested = { WorkerState::StopRequested, true },
    stopped = { WorkerState::Stopped, true },
)]
fn done_only_after_stop_is_requested(state: WorkerState, done: bool) {
    assert_eq!(state.is_done(), done);
}

#[test]
fn state_cell_round_trips_every_state() {
    let cell = StateCell::new(WorkerState::Idle);
    for state in [
        WorkerState::Idle,
        WorkerState::Running,
        WorkerState::StopRequested,
        WorkerState::Stopped,
    ] {
        cell.store(state);
        assert_eq!(cell.load(), state);
    }
}

#[test]
fn request_stop_only_moves_a_running_worker() {
    let cell = StateCell::new(WorkerState::Idle);
    assert!(!cell.request_stop());
    assert_eq!(cell.load(), WorkerState::Idle);

    cell.store(WorkerState::Running);
    assert!(cell.request_stop());
    assert_eq!(cell.load(), WorkerState::StopRequested);

    assert!(!cell.request_stop());
    assert_eq!(cell.load(), WorkerState::StopRequested);

    cell.store(WorkerState::Stopped);
    assert!(!cell.request_stop());
    assert_eq!(cell.load(), WorkerState::Stopped);
}

#[test]
fn state_serializes_as_snake_case() {
    let json = serde_json::to_string(&WorkerState::StopRequested).unwrap();
    assert_eq!(json, "\"stop_requested\"");
}

#[test]
fn timestamp_is_unset_until_recorded() {
    let cell = TimestampCell::default();
    assert_eq!(cell.get(), None);

    let at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    cell.record(at);
    assert_eq!(cell.get(), Some(at));
}

#[test]
fn timestamp_ignores_clock_stepping_backwards() {
    let cell = TimestampCell::default();
    let later = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    let earlier = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();

    cell.record(later);
    cell.record(earlier);

    assert_eq!(cell.get(), Some(later));
}

#[test]
fn timestamp_before_the_epoch_is_kept() {
    let cell = TimestampCell::default();
    let at = Utc.with_ymd_and_hms(1969, 7, 20, 20, 17, 0).unwrap();

    cell.record(at);

    assert_eq!(cell.get(), Some(at));
}

proptest! {
    #[test]
    fn timestamp_never_decreases(millis in proptest::collection::vec(-4_000_000_000_000i64..4_000_000_000_000, 1..32)) {
        let cell = TimestampCell::default();
        let mut previous = None;
        for m in millis {
            let at = DateTime::from_timestamp_millis(m).unwrap();
            cell.record(at);
            let current = cell.get();
            prop_assert!(current.is_some());
            prop_assert!(current >= previous);
            previous = current;
        }
    }
}
