// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

fn status(last: Option<DateTime<Utc>>) -> WorkerStatus {
    WorkerStatus {
        name: "reaper".to_string(),
        state: WorkerState::Running,
        is_done: false,
        last_process_time: last,
        sleep_time: Duration::from_millis(1500),
    }
}

#[test]
fn unset_time_renders_as_epoch() {
    assert_eq!(
        status(None).to_string(),
        "isDone=false\nlastProcessTime=1970-Jan-01 00:00:00\nsleepTime=1500ms"
    );
}

#[test]
fn recorded_time_uses_month_abbreviation() {
    let at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 5, 9).unwrap();
    let mut snapshot = status(Some(at));
    snapshot.is_done = true;

    assert_eq!(
        snapshot.to_string(),
        "isDone=true\nlastProcessTime=2025-Jun-01 08:05:09\nsleepTime=1500ms"
    );
}

#[test]
fn serializes_sleep_time_in_humantime() {
    let json = serde_json::to_value(status(None)).unwrap();
    assert_eq!(json["name"], "reaper");
    assert_eq!(json["state"], "running");
    assert_eq!(json["sleep_time"], "1s 500ms");
    assert!(json["last_process_time"].is_null());
}
