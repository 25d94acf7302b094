// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat daemon: proves liveness by rewriting a file every cycle

use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use vigil_core::{Daemon, WorkerConfig};

#[derive(Debug, Error)]
pub enum HeartbeatError {
    #[error("failed to prepare heartbeat directory {0}: {1}")]
    Prepare(PathBuf, #[source] std::io::Error),
    #[error("failed to write heartbeat {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),
}

/// Counts beats and, when configured, writes `<beats> <rfc3339>` to a file
pub struct HeartbeatDaemon {
    sleep_time: Duration,
    startup_delay: Duration,
    heartbeat_file: Option<PathBuf>,
    beats: AtomicU64,
}

impl HeartbeatDaemon {
    pub fn new(config: &WorkerConfig) -> Self {
        Self {
            sleep_time: config.sleep_time,
            startup_delay: config.startup_delay,
            heartbeat_file: config.heartbeat_file.clone(),
            beats: AtomicU64::new(0),
        }
    }

    pub fn beats(&self) -> u64 {
        self.beats.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Daemon for HeartbeatDaemon {
    type Error = HeartbeatError;

    async fn process(&self) -> Result<(), HeartbeatError> {
        let beat = self.beats() + 1;
        if let Some(path) = &self.heartbeat_file {
            let line = format!("{} {}\n", beat, Utc::now().to_rfc3339());
            tokio::fs::write(path, line)
                .await
                .map_err(|e| HeartbeatError::Write(path.clone(), e))?;
        }
        self.beats.store(beat, Ordering::SeqCst);
        tracing::debug!(beat, "heartbeat");
        Ok(())
    }

    fn sleep_time(&self) -> Duration {
        self.sleep_time
    }

    fn startup_delay(&self) -> Duration {
        self.startup_delay
    }

    async fn init(&self) -> Result<(), HeartbeatError> {
        let Some(parent) = self.heartbeat_file.as_ref().and_then(|p| p.parent()) else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| HeartbeatError::Prepare(parent.to_path_buf(), e))
    }

    async fn on_start(&self) {
        match &self.heartbeat_file {
            Some(path) => tracing::info!(file = %path.display(), "heartbeat starting"),
            None => tracing::info!("heartbeat starting without a file"),
        }
    }

    async fn on_stop(&self) -> Result<(), HeartbeatError> {
        tracing::info!(beats = self.beats(), "heartbeat stopped");
        Ok(())
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
