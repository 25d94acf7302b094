// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The run loop executed on a worker's task

use super::controller::Core;
use super::daemon::Daemon;
use crate::clock::Clock;
use crate::wait::Interrupt;
use std::sync::Arc;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunExit {
    /// Stop was requested and observed
    Cancelled,
    /// Stop was requested during the startup delay; `init` never ran
    StartupAborted,
    InitFailed,
    ProcessFailed,
    /// A wait was interrupted without a stop request
    Interrupted,
    /// Force-killed while a hook was blocking; noticed once it returned
    Killed,
}

/// One started run of a worker
pub(crate) struct Run<D, C> {
    pub(crate) epoch: u64,
    pub(crate) daemon: Arc<D>,
    pub(crate) clock: C,
    pub(crate) core: Arc<Core>,
    pub(crate) interrupt: Interrupt,
}

impl<D: Daemon, C: Clock> Run<D, C> {
    pub(crate) async fn execute(self) {
        let guard = ReleaseGuard {
            core: Arc::clone(&self.core),
            epoch: self.epoch,
            released: false,
        };

        let exit = self.run_cycles().await;

        if !guard.release() {
            tracing::warn!(?exit, "killed run finished unwinding, skipping on_stop");
            return;
        }
        if let Err(e) = self.daemon.on_stop().await {
            tracing::error!(error = %e, "error in on_stop, ignoring");
        }
        tracing::info!(?exit, "worker exited");
    }

    async fn run_cycles(&self) -> RunExit {
        self.daemon.on_start().await;

        let delay = self.daemon.startup_delay();
        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "delaying worker startup");
            if self.interrupt.wait(delay, "startup-delay").await.is_interrupted() {
                return match self.interrupted("startup-delay") {
                    RunExit::Cancelled => RunExit::StartupAborted,
                    other => other,
                };
            }
        }
        if self.retired() {
            return RunExit::Killed;
        }
        tracing::debug!("worker running");

        if let Err(e) = self.daemon.init().await {
            tracing::error!(error = %e, "error in init, exiting");
            return RunExit::InitFailed;
        }

        while !self.cancelled() {
            tracing::debug!("invoking process");
            if let Err(e) = self.daemon.process().await {
                tracing::error!(error = %e, "error in process, exiting");
                return RunExit::ProcessFailed;
            }
            if self.retired() {
                return RunExit::Killed;
            }
            self.core.record_cycle(self.epoch, self.clock.now());

            if self.cancelled() {
                return RunExit::Cancelled;
            }
            let sleep_time = self.daemon.sleep_time();
            if self.interrupt.wait(sleep_time, "post-processing").await.is_interrupted() {
                return self.interrupted("post-processing");
            }
        }
        RunExit::Cancelled
    }

    fn cancelled(&self) -> bool {
        self.core.is_cancelled(self.epoch)
    }

    /// A kill retired this run while it was inside a hook
    fn retired(&self) -> bool {
        !self.core.is_current(self.epoch)
    }

    /// Classify an interrupted wait. Either way the run ends.
    fn interrupted(&self, reason: &str) -> RunExit {
        if self.cancelled() {
            tracing::info!(reason, "wait interrupted, worker is done");
            RunExit::Cancelled
        } else {
            tracing::error!(reason, "wait interrupted unexpectedly, exiting");
            RunExit::Interrupted
        }
    }
}

/// Clears the execution slot when the run ends, including when the task
/// is aborted or unwinds out of a hook.
struct ReleaseGuard {
    core: Arc<Core>,
    epoch: u64,
    released: bool,
}

impl ReleaseGuard {
    /// Whether the run still owned its slot, i.e. was not killed
    fn release(mut self) -> bool {
        self.released = true;
        self.core.release(self.epoch)
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        if !self.released {
            self.core.release(self.epoch);
        }
    }
}
