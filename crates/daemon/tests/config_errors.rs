// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! vigild rejects bad configuration before starting the worker.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

mod common;

use assert_cmd::Command;
use common::Project;
use predicates::prelude::*;

#[test]
fn missing_config_file_fails() {
    let project = Project::new();

    Command::cargo_bin("vigild")
        .unwrap()
        .arg("--config")
        .arg(project.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}

#[test]
fn unknown_key_fails() {
    let project = Project::new();
    let config = project.write_config("interval = \"1s\"");

    Command::cargo_bin("vigild")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn zero_sleep_time_fails() {
    let project = Project::new();
    let path = project.path().join("worker.toml");
    std::fs::write(&path, "sleep_time = \"0ms\"\n").unwrap();

    Command::cargo_bin("vigild")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sleep_time must be greater than zero"));
}

#[test]
fn bad_run_for_is_a_usage_error() {
    Command::cargo_bin("vigild")
        .unwrap()
        .args(["--run-for", "eventually"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--run-for"));
}
