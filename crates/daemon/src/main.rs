// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! vigil daemon (vigild)
//!
//! Runs a heartbeat worker in the foreground until signaled.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod heartbeat;
mod lifecycle;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use vigil_core::WorkerConfig;

use crate::lifecycle::ShutdownCause;

#[derive(Parser)]
#[command(
    name = "vigild",
    version,
    about = "Run a heartbeat worker until SIGINT/SIGTERM"
)]
struct Cli {
    /// Worker config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this long (e.g. "30s", "500ms")
    #[arg(long, value_parser = humantime::parse_duration)]
    run_for: Option<Duration>,

    /// Override the worker name
    #[arg(long)]
    name: Option<String>,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => WorkerConfig::load(path)?,
        None => WorkerConfig::default(),
    };
    if let Some(name) = cli.name {
        config = config.with_name(name);
        config.validate()?;
    }

    // Held until exit so buffered file logs are flushed
    let _log_guard = lifecycle::setup_logging(&config)?;

    let summary = match lifecycle::run(&config, cli.run_for).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Failed to run daemon: {}", e);
            return Err(e.into());
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.status);
        println!("beats={}", summary.beats);
        println!("termination={}", summary.termination);
    }

    if summary.cause == ShutdownCause::WorkerExited {
        anyhow::bail!("worker {} exited before shutdown was requested", summary.status.name);
    }
    Ok(())
}
