// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort graceful shutdown with escalation to a forced kill
//!
//! [`terminate`] works on anything [`Terminable`]: a [`Worker`], an
//! [`InterruptibleTask`], or a bare tokio [`JoinHandle`].
//!
//! Forced termination aborts a task at its current suspension point. It is
//! unsafe with respect to whatever the task was in the middle of: no
//! cleanup hooks run and partially-applied work stays partially applied.
//! Use it only after a cooperative stop has had its chance.
//!
//! [`Worker`]: crate::Worker

use crate::wait::Interrupt;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How often [`terminate`] checks whether the context has exited
pub const TERMINATE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How a shutdown request concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Nothing was running
    NotRunning,
    /// The context exited on its own within the timeout
    Exited,
    /// The context was still alive at the timeout and was force-killed
    Killed,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Termination::NotRunning => "not_running",
            Termination::Exited => "exited",
            Termination::Killed => "killed",
        })
    }
}

/// An execution context that can be woken, observed and killed
pub trait Terminable {
    /// Name used in logs
    fn label(&self) -> &str {
        "task"
    }

    /// Ask the context to wake up and notice it should stop
    fn interrupt(&self);

    fn is_alive(&self) -> bool;

    /// Abort the context immediately, abandoning any work in progress
    fn force_kill(&self);
}

/// Interrupt `ctx`, give it up to `timeout` to exit, then force-kill it.
///
/// Liveness is polled every [`TERMINATE_POLL_INTERVAL`]. A kill lands at
/// the task's next await point; code blocking a thread runs on until it
/// yields, even after this returns `Killed`.
pub async fn terminate<T: Terminable + ?Sized>(ctx: &T, timeout: Duration) -> Termination {
    if !ctx.is_alive() {
        return Termination::NotRunning;
    }
    ctx.interrupt();
    escalate(ctx, timeout, TERMINATE_POLL_INTERVAL).await
}

/// Poll `ctx` until it exits or `timeout` passes, killing it in the latter case
pub(crate) async fn escalate<T: Terminable + ?Sized>(
    ctx: &T,
    timeout: Duration,
    poll_interval: Duration,
) -> Termination {
    let started = Instant::now();
    while ctx.is_alive() {
        let elapsed = started.elapsed();
        if elapsed >= timeout {
            break;
        }
        tokio::time::sleep(poll_interval.min(timeout - elapsed)).await;
    }

    if !ctx.is_alive() {
        return Termination::Exited;
    }

    tracing::warn!(
        context = ctx.label(),
        timeout_ms = timeout.as_millis() as u64,
        "did not stop voluntarily, killing it"
    );
    ctx.force_kill();
    Termination::Killed
}

/// A spawned task paired with the [`Interrupt`] it listens on
pub struct InterruptibleTask<T> {
    handle: JoinHandle<T>,
    interrupt: Interrupt,
}

impl<T: Send + 'static> InterruptibleTask<T> {
    /// Spawn `f` on the current runtime, handing it the task's interrupt.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(Interrupt) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let interrupt = Interrupt::new();
        let handle = tokio::spawn(f(interrupt.clone()));
        Self { handle, interrupt }
    }
}

impl<T> InterruptibleTask<T> {
    pub fn interrupt_handle(&self) -> &Interrupt {
        &self.interrupt
    }

    /// Give up interrupt access and take the join handle
    pub fn into_handle(self) -> JoinHandle<T> {
        self.handle
    }
}

impl<T> Terminable for InterruptibleTask<T> {
    fn interrupt(&self) {
        self.interrupt.raise();
    }

    fn is_alive(&self) -> bool {
        !self.handle.is_finished()
    }

    fn force_kill(&self) {
        self.handle.abort();
    }
}

/// A bare task has no wake channel; `interrupt` does nothing and the
/// timeout is simply a grace period before the abort.
impl<T> Terminable for JoinHandle<T> {
    fn interrupt(&self) {}

    fn is_alive(&self) -> bool {
        !self.is_finished()
    }

    fn force_kill(&self) {
        self.abort();
    }
}

#[cfg(test)]
#[path = "terminate_tests.rs"]
mod tests;
