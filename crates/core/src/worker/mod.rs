// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background worker lifecycle
//!
//! A [`Worker`] runs a [`Daemon`] on its own tokio task: `on_start`, an
//! optional startup delay, `init` once, then `process` and a cooperative
//! wait of `sleep_time` until stopped. Every exit path clears the
//! execution context and then calls `on_stop`.

mod controller;
mod daemon;
mod run;
mod state;
mod status;

pub use controller::{Worker, WorkerError, STOP_POLL_INTERVAL};
pub use daemon::Daemon;
pub use state::WorkerState;
pub use status::{WorkerStatus, STATUS_TIME_FORMAT};
