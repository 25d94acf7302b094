// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extension points a worker is built from

use async_trait::async_trait;
use std::time::Duration;

/// The work a [`Worker`](super::Worker) runs on its background task.
///
/// Hooks take `&self`: the worker shares one value between its run loop
/// and its callers, so per-cycle state lives behind interior mutability.
#[async_trait]
pub trait Daemon: Send + Sync + 'static {
    /// Error returned by the fallible hooks
    type Error: std::error::Error + Send + Sync + 'static;

    /// One unit of work. An error ends the run; retries are up to the
    /// implementation.
    async fn process(&self) -> Result<(), Self::Error>;

    /// Delay between the end of one cycle and the start of the next
    fn sleep_time(&self) -> Duration;

    /// Delay before `init` runs
    fn startup_delay(&self) -> Duration {
        Duration::ZERO
    }

    /// Runs once before the first cycle. An error ends the run.
    async fn init(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called first thing on the worker task
    async fn on_start(&self) {}

    /// Called after the run loop has exited and the worker is marked stopped.
    /// Errors are logged and dropped.
    async fn on_stop(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Unqualified type name used when a worker is not given an explicit name
pub(crate) fn type_label<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
