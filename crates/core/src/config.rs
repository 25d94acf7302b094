// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker configuration
//!
//! Loaded from TOML; durations use humantime syntax (`250ms`, `5s`, `1m`).
//!
//! ```toml
//! name = "heartbeat"
//! sleep_time = "2s"
//! startup_delay = "500ms"
//! stop_timeout = "5s"
//! heartbeat_file = "/var/run/vigil/heartbeat"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkerConfig {
    /// Overrides the type-derived worker name
    pub name: Option<String>,
    /// Delay between cycles
    #[serde(with = "humantime_serde")]
    pub sleep_time: Duration,
    /// Delay before the first cycle
    #[serde(with = "humantime_serde")]
    pub startup_delay: Duration,
    /// How long a stop waits before force-killing the worker
    #[serde(with = "humantime_serde")]
    pub stop_timeout: Duration,
    pub heartbeat_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: None,
            sleep_time: Duration::from_secs(1),
            startup_delay: Duration::ZERO,
            stop_timeout: Duration::from_secs(5),
            heartbeat_file: None,
            log_file: None,
        }
    }
}

impl WorkerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: WorkerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sleep_time.is_zero() {
            return Err(ConfigError::Invalid("sleep_time must be greater than zero".into()));
        }
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ConfigError::Invalid("name must not be blank".into()));
        }
        Ok(())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_sleep_time(mut self, sleep_time: Duration) -> Self {
        self.sleep_time = sleep_time;
        self
    }

    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    pub fn with_heartbeat_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.heartbeat_file = Some(path.into());
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
