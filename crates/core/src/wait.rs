// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative, interruptible timed wait
//!
//! [`Interrupt`] is the single suspension point a worker loop sleeps on.
//! Raising the signal wakes a pending [`Interrupt::wait`] immediately; a
//! signal raised while nobody waits is kept and cuts the next wait short.
//! The primitive never records *why* it was raised; callers decide that
//! from their own state after the wait returns.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Result of a cooperative wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full duration elapsed
    Completed,
    /// The wait was cut short by [`Interrupt::raise`]
    Interrupted,
}

impl WaitOutcome {
    pub fn is_interrupted(self) -> bool {
        self == WaitOutcome::Interrupted
    }
}

/// Wake signal for a cooperative wait. Clones share the same signal.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    notify: Arc<Notify>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake the current (or next) waiter
    ///
    /// Signals do not accumulate: raising twice before a wait still only
    /// interrupts one wait.
    pub fn raise(&self) {
        self.notify.notify_one();
    }

    /// Suspend for `duration` unless interrupted first
    ///
    /// `reason` only labels diagnostics.
    pub async fn wait(&self, duration: Duration, reason: &str) -> WaitOutcome {
        tracing::debug!(reason, wait_ms = duration.as_millis() as u64, "waiting");
        let started = Instant::now();

        tokio::select! {
            biased;
            _ = self.notify.notified() => {
                tracing::debug!(
                    reason,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "wait interrupted"
                );
                WaitOutcome::Interrupted
            }
            _ = tokio::time::sleep(duration) => WaitOutcome::Completed,
        }
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
