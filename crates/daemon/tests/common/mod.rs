// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for vigild integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Temp directory holding a worker config and its heartbeat file.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn heartbeat_path(&self) -> PathBuf {
        self.path().join("run").join("heartbeat")
    }

    /// Write `worker.toml` with a fast cadence plus any extra lines.
    pub fn write_config(&self, extra: &str) -> PathBuf {
        let config = format!(
            "sleep_time = \"20ms\"\nstop_timeout = \"2s\"\nheartbeat_file = {:?}\n{}",
            self.heartbeat_path().display().to_string(),
            extra
        );
        let path = self.path().join("worker.toml");
        fs::write(&path, config).expect("Failed to write config");
        path
    }

    /// Poll until the heartbeat file exists.
    pub fn wait_for_heartbeat(&self, timeout: Duration) -> bool {
        let started = Instant::now();
        while started.elapsed() < timeout {
            if self.heartbeat_path().exists() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        false
    }
}
