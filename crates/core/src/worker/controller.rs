// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker lifecycle controller
//!
//! A [`Worker`] owns at most one run loop at a time, spawned as a tokio
//! task by [`Worker::start`]. Stopping is cooperative: the state moves to
//! `StopRequested` and the loop's wait is interrupted. Only
//! [`Worker::stop_with_escalation`] (or [`terminate`](crate::terminate))
//! ever aborts the task.

use super::daemon::{type_label, Daemon};
use super::run::Run;
use super::state::{StateCell, TimestampCell, WorkerState};
use super::status::WorkerStatus;
use crate::clock::{Clock, SystemClock};
use crate::terminate::{escalate, Terminable, Termination};
use crate::wait::Interrupt;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// How often `stop_with_escalation` checks whether the loop has exited
pub const STOP_POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("worker {0} must be started from within a tokio runtime")]
    NoRuntime(String),
    #[error("worker {0} was killed and its task has not finished yet")]
    Unwinding(String),
}

/// The live run loop of a started worker
struct Execution {
    epoch: u64,
    handle: JoinHandle<()>,
    interrupt: Interrupt,
}

/// Execution contexts owned by a worker
#[derive(Default)]
struct Slot {
    active: Option<Execution>,
    /// Task of a force-killed run. An abort lands at the next await, so a
    /// blocking hook keeps it running after the kill returns.
    killed: Option<JoinHandle<()>>,
}

impl Slot {
    fn is_unwinding(&self) -> bool {
        self.killed.as_ref().is_some_and(|h| !h.is_finished())
    }
}

/// State shared between a worker's handles and its run loop
#[derive(Default)]
pub(crate) struct Core {
    state: StateCell,
    last_process: TimestampCell,
    epoch: AtomicU64,
    execution: Mutex<Slot>,
}

impl Core {
    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.execution.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether `epoch` is still the worker's latest run. Killing a run or
    /// starting a new one retires it.
    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::Acquire) == epoch
    }

    /// Record a completed cycle unless the run has been retired
    pub(crate) fn record_cycle(&self, epoch: u64, at: DateTime<Utc>) {
        if self.is_current(epoch) {
            self.last_process.record(at);
        }
    }

    /// Whether the run started as `epoch` should wind down
    pub(crate) fn is_cancelled(&self, epoch: u64) -> bool {
        !self.is_current(epoch) || self.state.load().is_done()
    }

    /// Terminal cleanup for the run started as `epoch`.
    ///
    /// Returns false, and changes nothing, when a forced kill already took
    /// the run's execution slot.
    pub(crate) fn release(&self, epoch: u64) -> bool {
        let mut slot = self.slot();
        if slot.active.as_ref().is_some_and(|e| e.epoch == epoch) {
            // Dropping our own handle only detaches it.
            slot.active.take();
            self.state.store(WorkerState::Stopped);
            return true;
        }
        false
    }
}

/// A long-running background worker driving a [`Daemon`].
///
/// Clones are handles to the same worker.
pub struct Worker<D: Daemon, C: Clock = SystemClock> {
    name: Arc<str>,
    daemon: Arc<D>,
    clock: C,
    core: Arc<Core>,
}

impl<D: Daemon, C: Clock> Clone for Worker<D, C> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            daemon: Arc::clone(&self.daemon),
            clock: self.clock.clone(),
            core: Arc::clone(&self.core),
        }
    }
}

impl<D: Daemon> Worker<D, SystemClock> {
    /// Create an idle worker named after the daemon's type
    pub fn new(daemon: D) -> Self {
        Self::with_clock(daemon, SystemClock)
    }
}

impl<D: Daemon, C: Clock> Worker<D, C> {
    /// Create an idle worker that timestamps cycles with `clock`
    pub fn with_clock(daemon: D, clock: C) -> Self {
        Self {
            name: type_label::<D>().into(),
            daemon: Arc::new(daemon),
            clock,
            core: Arc::new(Core::default()),
        }
    }

    /// Override the name used in logs and status
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into().into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared access to the hooks this worker runs
    pub fn daemon(&self) -> &D {
        &self.daemon
    }

    /// Spawn the run loop on the current tokio runtime.
    ///
    /// Already running is not an error: a warning is logged and nothing
    /// changes. The loop runs as an ordinary task, so it never holds the
    /// runtime (or the process) open on shutdown.
    ///
    /// Fails with [`WorkerError::Unwinding`] while a force-killed run is
    /// still executing, so two runs never overlap.
    pub fn start(&self) -> Result<(), WorkerError> {
        tracing::info!(worker = %self.name, "starting worker");
        let runtime =
            Handle::try_current().map_err(|_| WorkerError::NoRuntime(self.name.to_string()))?;

        let mut slot = self.core.slot();
        if slot.active.is_some() {
            tracing::warn!(worker = %self.name, "worker is already running, not starting it again");
            return Ok(());
        }
        if slot.is_unwinding() {
            tracing::warn!(worker = %self.name, "killed run has not finished, refusing to start");
            return Err(WorkerError::Unwinding(self.name.to_string()));
        }
        slot.killed = None;

        let epoch = self.core.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        let interrupt = Interrupt::new();
        self.core.state.store(WorkerState::Running);

        let run = Run {
            epoch,
            daemon: Arc::clone(&self.daemon),
            clock: self.clock.clone(),
            core: Arc::clone(&self.core),
            interrupt: interrupt.clone(),
        };
        let span = tracing::info_span!("worker", name = %self.name);
        let handle = runtime.spawn(run.execute().instrument(span));

        slot.active = Some(Execution {
            epoch,
            handle,
            interrupt,
        });
        Ok(())
    }

    /// Request a cooperative stop and wake the loop if it is waiting.
    ///
    /// Returns immediately; the loop exits at its next wait or iteration
    /// boundary.
    pub fn stop(&self) {
        let slot = self.core.slot();
        let Some(execution) = slot.active.as_ref() else {
            tracing::warn!(worker = %self.name, "worker is already stopped");
            return;
        };
        if self.core.state.request_stop() {
            tracing::info!(worker = %self.name, "stop requested");
        }
        execution.interrupt.raise();
    }

    /// Wake the loop's current (or next) wait without requesting a stop.
    ///
    /// The loop treats an interrupted wait without a stop request as an
    /// anomaly and ends the run.
    pub fn interrupt(&self) {
        let slot = self.core.slot();
        let Some(execution) = slot.active.as_ref() else {
            tracing::warn!(worker = %self.name, "worker is already stopped");
            return;
        };
        execution.interrupt.raise();
    }

    /// Stop, then wait up to `timeout` for the loop to exit; force-kill it
    /// if it is still alive.
    ///
    /// A forced kill aborts the task wherever it is suspended. The cycle in
    /// progress is abandoned and `on_stop` does not run. `is_alive()` is
    /// false once this returns.
    ///
    /// The abort only takes effect at the task's next await point. A hook
    /// that blocks keeps running until it returns; the killed run then
    /// skips the rest of its work, and [`start`](Self::start) refuses to
    /// launch a new run until it has finished (see
    /// [`is_unwinding`](Self::is_unwinding)).
    pub async fn stop_with_escalation(&self, timeout: Duration) -> Termination {
        let was_alive = self.is_alive();
        self.stop();
        if !was_alive {
            return Termination::NotRunning;
        }
        escalate(self, timeout, STOP_POLL_INTERVAL).await
    }

    /// Abort the run loop and clear the execution context
    fn kill(&self) {
        let abort = {
            let mut slot = self.core.slot();
            let Some(execution) = slot.active.take() else {
                tracing::warn!(worker = %self.name, "worker is already stopped");
                return;
            };
            self.core.epoch.fetch_add(1, Ordering::AcqRel);
            self.core.state.store(WorkerState::Stopped);
            let abort = execution.handle.abort_handle();
            slot.killed = Some(execution.handle);
            abort
        };
        abort.abort();
        tracing::warn!(worker = %self.name, "worker killed, current cycle abandoned");
    }

    pub fn is_alive(&self) -> bool {
        self.core
            .slot()
            .active
            .as_ref()
            .is_some_and(|e| !e.handle.is_finished())
    }

    /// True while a force-killed run is still executing a blocking hook
    pub fn is_unwinding(&self) -> bool {
        self.core.slot().is_unwinding()
    }

    /// True once a stop has been requested or the run has ended
    pub fn is_done(&self) -> bool {
        self.core.state.load().is_done()
    }

    pub fn state(&self) -> WorkerState {
        self.core.state.load()
    }

    /// Completion time of the most recent cycle, `None` before the first
    pub fn last_process_time(&self) -> Option<DateTime<Utc>> {
        self.core.last_process.get()
    }

    pub fn status(&self) -> WorkerStatus {
        let state = self.state();
        WorkerStatus {
            name: self.name.to_string(),
            state,
            is_done: state.is_done(),
            last_process_time: self.last_process_time(),
            sleep_time: self.daemon.sleep_time(),
        }
    }
}

impl<D: Daemon, C: Clock> Terminable for Worker<D, C> {
    fn label(&self) -> &str {
        &self.name
    }

    fn interrupt(&self) {
        Worker::interrupt(self);
    }

    fn is_alive(&self) -> bool {
        Worker::is_alive(self)
    }

    fn force_kill(&self) {
        self.kill();
    }
}

impl<D: Daemon, C: Clock> std::fmt::Debug for Worker<D, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("last_process_time", &self.last_process_time())
            .finish()
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
