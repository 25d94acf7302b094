// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, AtomicU8, Ordering};

/// Lifecycle state of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    /// Never started; no execution context
    Idle,
    /// Run loop executing
    Running,
    /// Cancellation signaled, loop finishing its current cycle or wait
    StopRequested,
    /// Execution context cleared; `on_stop` has run or is running
    Stopped,
}

impl WorkerState {
    /// Whether cancellation has been requested or the run is over
    pub fn is_done(self) -> bool {
        matches!(self, WorkerState::StopRequested | WorkerState::Stopped)
    }

    fn to_u8(self) -> u8 {
        match self {
            WorkerState::Idle => 0,
            WorkerState::Running => 1,
            WorkerState::StopRequested => 2,
            WorkerState::Stopped => 3,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => WorkerState::Idle,
            1 => WorkerState::Running,
            2 => WorkerState::StopRequested,
            _ => WorkerState::Stopped,
        }
    }
}

/// Atomically shared [`WorkerState`]
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new(state: WorkerState) -> Self {
        Self(AtomicU8::new(state.to_u8()))
    }

    pub(crate) fn load(&self) -> WorkerState {
        WorkerState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn store(&self, state: WorkerState) {
        self.0.store(state.to_u8(), Ordering::Release);
    }

    /// Move `Running` to `StopRequested`; any other state is left alone.
    pub(crate) fn request_stop(&self) -> bool {
        self.0
            .compare_exchange(
                WorkerState::Running.to_u8(),
                WorkerState::StopRequested.to_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        StateCell::new(WorkerState::Idle)
    }
}

/// Millisecond timestamp of the last completed cycle.
///
/// Recording keeps the maximum seen so far, so readers never observe the
/// value going backwards even if the wall clock does.
#[derive(Debug)]
pub(crate) struct TimestampCell(AtomicI64);

impl TimestampCell {
    /// Below every representable timestamp, pre-1970 ones included
    const UNSET: i64 = i64::MIN;

    pub(crate) fn record(&self, at: DateTime<Utc>) {
        self.0.fetch_max(at.timestamp_millis(), Ordering::AcqRel);
    }

    pub(crate) fn get(&self) -> Option<DateTime<Utc>> {
        match self.0.load(Ordering::Acquire) {
            Self::UNSET => None,
            millis => DateTime::from_timestamp_millis(millis),
        }
    }
}

impl Default for TimestampCell {
    fn default() -> Self {
        Self(AtomicI64::new(Self::UNSET))
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
