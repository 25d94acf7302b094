// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn empty_config_uses_defaults() {
    let config = WorkerConfig::from_toml_str("").unwrap();
    assert_eq!(config, WorkerConfig::default());
    assert_eq!(config.sleep_time, Duration::from_secs(1));
    assert_eq!(config.startup_delay, Duration::ZERO);
    assert_eq!(config.stop_timeout, Duration::from_secs(5));
}

#[test]
fn parses_humantime_durations() {
    let config = WorkerConfig::from_toml_str(
        r#"
        name = "reaper"
        sleep_time = "250ms"
        startup_delay = "2s"
        stop_timeout = "1m"
        heartbeat_file = "/tmp/beat"
        "#,
    )
    .unwrap();

    assert_eq!(config.name.as_deref(), Some("reaper"));
    assert_eq!(config.sleep_time, Duration::from_millis(250));
    assert_eq!(config.startup_delay, Duration::from_secs(2));
    assert_eq!(config.stop_timeout, Duration::from_secs(60));
    assert_eq!(config.heartbeat_file, Some(PathBuf::from("/tmp/beat")));
}

#[parameterized(
    zero_sleep = { "sleep_time = \"0s\"" },
    blank_name = { "name = \"  \"" },
)]
fn rejects_invalid_values(toml: &str) {
    let err = WorkerConfig::from_toml_str(toml).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
}

#[parameterized(
    unknown_key = { "sleep = \"1s\"" },
    bad_duration = { "sleep_time = \"soon\"" },
    wrong_type = { "stop_timeout = 5" },
)]
fn rejects_malformed_toml(toml: &str) {
    let err = WorkerConfig::from_toml_str(toml).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("worker.toml");
    std::fs::write(&path, "sleep_time = \"75ms\"\n").unwrap();

    let config = WorkerConfig::load(&path).unwrap();
    assert_eq!(config.sleep_time, Duration::from_millis(75));
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = WorkerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read(p, _) if p == path));
}

#[test]
fn builder_setters_chain() {
    let config = WorkerConfig::new()
        .with_name("beat")
        .with_sleep_time(Duration::from_millis(10))
        .with_startup_delay(Duration::from_millis(5))
        .with_stop_timeout(Duration::from_millis(200))
        .with_heartbeat_file("/tmp/hb");

    assert!(config.validate().is_ok());
    assert_eq!(config.name.as_deref(), Some("beat"));
    assert_eq!(config.stop_timeout, Duration::from_millis(200));
}
