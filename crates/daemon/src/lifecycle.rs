// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: logging, startup, shutdown.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};
use vigil_core::{ConfigError, Termination, Worker, WorkerConfig, WorkerError, WorkerStatus};

use crate::heartbeat::HeartbeatDaemon;

/// How often the main loop checks whether the worker died on its own
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Log file path has no file name")]
    BadLogPath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why the daemon began shutting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownCause {
    Signal,
    RunForElapsed,
    /// The worker's run ended without a stop request
    WorkerExited,
}

/// Final report printed when the daemon exits
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub status: WorkerStatus,
    pub beats: u64,
    pub cause: ShutdownCause,
    pub termination: Termination,
}

/// Start the heartbeat worker and run until a signal, the `run_for`
/// deadline, or the worker exiting by itself.
pub async fn run(
    config: &WorkerConfig,
    run_for: Option<Duration>,
) -> Result<RunSummary, LifecycleError> {
    let mut worker = Worker::new(HeartbeatDaemon::new(config));
    if let Some(name) = &config.name {
        worker = worker.with_name(name.clone());
    }

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    worker.start()?;
    info!(worker = worker.name(), "Daemon ready");

    let cause = tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
            ShutdownCause::Signal
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down...");
            ShutdownCause::Signal
        }
        _ = deadline(run_for) => {
            info!("Run time elapsed, shutting down...");
            ShutdownCause::RunForElapsed
        }
        _ = exited(&worker) => {
            warn!("Worker exited before shutdown was requested");
            ShutdownCause::WorkerExited
        }
    };

    let termination = worker.stop_with_escalation(config.stop_timeout).await;
    info!(%termination, "Daemon stopped");

    Ok(RunSummary {
        status: worker.status(),
        beats: worker.daemon().beats(),
        cause,
        termination,
    })
}

async fn deadline(run_for: Option<Duration>) {
    match run_for {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

async fn exited(worker: &Worker<HeartbeatDaemon>) {
    while worker.is_alive() {
        tokio::time::sleep(EXIT_POLL_INTERVAL).await;
    }
}

/// Install the global subscriber. Logs go to stderr unless the config names
/// a log file; the returned guard flushes the file writer on drop.
pub fn setup_logging(
    config: &WorkerConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(log_path) = &config.log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    let dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let file_name = log_path.file_name().ok_or(LifecycleError::BadLogPath)?;

    let file_appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(Some(guard))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
