// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vigil-core: long-running background workers
//!
//! This crate provides:
//! - A worker lifecycle controller with cooperative stop and forced-kill escalation
//! - An interruptible timed wait used as the worker's suspension point
//! - A generic terminate utility for any tokio task
//! - TOML worker configuration

pub mod clock;
pub mod config;
pub mod terminate;
pub mod wait;
pub mod worker;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, WorkerConfig};
pub use terminate::{terminate, InterruptibleTask, Terminable, Termination, TERMINATE_POLL_INTERVAL};
pub use wait::{Interrupt, WaitOutcome};
pub use worker::{Daemon, Worker, WorkerError, WorkerState, WorkerStatus, STOP_POLL_INTERVAL};
