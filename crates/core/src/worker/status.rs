// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time worker status

use super::state::WorkerState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Timestamp layout used in the status text, e.g. `2025-Jun-01 08:00:00`
pub const STATUS_TIME_FORMAT: &str = "%Y-%b-%d %H:%M:%S";

/// Read-only snapshot returned by [`Worker::status`](super::Worker::status)
///
/// `Display` renders the three-line text form:
///
/// ```text
/// isDone=false
/// lastProcessTime=1970-Jan-01 00:00:00
/// sleepTime=50ms
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerStatus {
    pub name: String,
    pub state: WorkerState,
    pub is_done: bool,
    pub last_process_time: Option<DateTime<Utc>>,
    #[serde(with = "humantime_serde")]
    pub sleep_time: Duration,
}

impl WorkerStatus {
    /// Formatted last process time; the Unix epoch while no cycle has run
    pub fn last_process_time_display(&self) -> String {
        self.last_process_time
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
            .format(STATUS_TIME_FORMAT)
            .to_string()
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "isDone={}\nlastProcessTime={}\nsleepTime={}ms",
            self.is_done,
            self.last_process_time_display(),
            self.sleep_time.as_millis()
        )
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
