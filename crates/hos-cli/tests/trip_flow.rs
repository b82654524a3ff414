//! End-to-end tests for the `hos` binary.
//!
//! Each test runs against an isolated HOME and config file so the user's
//! own database and environment never leak in.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn hos_binary() -> String {
    env!("CARGO_BIN_EXE_hos").to_string()
}

/// Writes a config file pointing the database into the temp directory.
fn write_config(temp: &Path) -> PathBuf {
    let config_path = temp.join("config.toml");
    let db_path = temp.join("data").join("hos.db");
    std::fs::write(
        &config_path,
        format!("database_path = {:?}\n", db_path.to_string_lossy()),
    )
    .unwrap();
    config_path
}

fn hos(temp: &Path, args: &[&str]) -> Output {
    let config_path = write_config(temp);
    Command::new(hos_binary())
        .env("HOME", temp)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("ORS_API_KEY")
        .env_remove("HOS_ORS_API_KEY")
        .env_remove("HOS_ORS_BASE_URL")
        .arg("--config")
        .arg(&config_path)
        .args(args)
        .output()
        .expect("failed to run hos")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "hos should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

const PLAN_ARGS: [&str; 11] = [
    "plan",
    "--current",
    "38.8951,-77.0364",
    "--pickup",
    "39.0997,-94.5786",
    "--dropoff",
    "41.8781,-87.6298",
    "--start",
    "2025-10-15T08:00:00Z",
    "--cycle-used",
    "12",
];

#[test]
fn test_simulate_json_multi_day_trip() {
    let temp = TempDir::new().unwrap();
    let output = hos(
        temp.path(),
        &[
            "simulate",
            "--drive-hours",
            "25",
            "--miles",
            "1500",
            "--start",
            "2025-10-15T08:00:00Z",
            "--cycle-used",
            "60",
            "--json",
        ],
    );
    let json = stdout_json(&output);

    assert_eq!(json["summary"]["days_simulated"], 3);
    assert_eq!(json["summary"]["total_drive_hours"], 25.0);
    assert_eq!(json["days"][0]["date"], "2025-10-15");
    assert_eq!(json["fuel_stops"].as_array().unwrap().len(), 1);
    assert!(
        json["violations"]
            .as_array()
            .unwrap()
            .iter()
            .any(|v| v["type"] == "CYCLE_LIMIT_EXCEEDED")
    );
}

#[test]
fn test_simulate_text_output() {
    let temp = TempDir::new().unwrap();
    let output = hos(
        temp.path(),
        &[
            "simulate",
            "--drive-hours",
            "5",
            "--miles",
            "100",
            "--start",
            "2025-10-15T08:00:00Z",
        ],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("DAY 1 (2025-10-15)"));
    assert!(stdout.contains("Remaining drive:   0.00h"));
}

#[test]
fn test_simulate_rejects_negative_drive_hours() {
    let temp = TempDir::new().unwrap();
    let output = hos(
        temp.path(),
        &[
            "simulate",
            "--drive-hours=-5",
            "--miles",
            "100",
            "--start",
            "2025-10-15T08:00:00Z",
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid trip inputs"));
}

#[test]
fn test_plan_save_list_show_delete() {
    let temp = TempDir::new().unwrap();

    let mut plan_args = PLAN_ARGS.to_vec();
    plan_args.extend([
        "--name",
        "DC to Chicago",
        "--drive-hours",
        "25",
        "--miles",
        "1500",
        "--json",
    ]);
    let planned = stdout_json(&hos(temp.path(), &plan_args));
    let id = planned["trip"]["id"].as_str().unwrap().to_string();
    assert_eq!(planned["total_miles"], 1500.0);
    assert!(temp.path().join("data").join("hos.db").exists());

    let listed = stdout_json(&hos(temp.path(), &["trips", "list", "--json"]));
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());
    assert_eq!(listed[0]["name"], "DC to Chicago");

    let shown = stdout_json(&hos(temp.path(), &["trips", "show", &id, "--json"]));
    assert_eq!(shown["hos_sim"], planned["hos_sim"]);

    let deleted = hos(temp.path(), &["trips", "delete", &id]);
    assert!(deleted.status.success());

    let listed = stdout_json(&hos(temp.path(), &["trips", "list", "--json"]));
    assert!(listed.as_array().unwrap().is_empty());

    let missing = hos(temp.path(), &["trips", "show", &id]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("trip not found"));
}

#[test]
fn test_plan_rejects_invalid_coordinate() {
    let temp = TempDir::new().unwrap();
    let mut args = PLAN_ARGS.to_vec();
    args[2] = "95.0,-77.0";
    let output = hos(temp.path(), &args);
    assert!(!output.status.success());
    assert!(!temp.path().join("data").join("hos.db").exists());
}

#[test]
fn test_plan_without_api_key_fails() {
    let temp = TempDir::new().unwrap();
    let output = hos(temp.path(), &PLAN_ARGS);

    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("missing OpenRouteService API key"),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!temp.path().join("data").join("hos.db").exists());
}

#[test]
fn test_plan_reports_unreachable_routing_provider() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path());
    let output = Command::new(hos_binary())
        .env("HOME", temp.path())
        .env_remove("XDG_CONFIG_HOME")
        .env("HOS_ORS_API_KEY", "test-key")
        .env("HOS_ORS_BASE_URL", "http://127.0.0.1:1")
        .arg("--config")
        .arg(&config_path)
        .args(PLAN_ARGS)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("routing failed"));
    assert!(!temp.path().join("data").join("hos.db").exists());
}

#[test]
fn test_simulate_rejects_zero_length_break_rules() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path());
    let mut config = std::fs::read_to_string(&config_path).unwrap();
    config.push_str("\n[rules]\nbreak_after_hours = 0.0\nbreak_hours = 0.0\n");
    std::fs::write(&config_path, config).unwrap();

    let output = Command::new(hos_binary())
        .env("HOME", temp.path())
        .env_remove("XDG_CONFIG_HOME")
        .arg("--config")
        .arg(&config_path)
        .args([
            "simulate",
            "--drive-hours",
            "5",
            "--miles",
            "100",
            "--start",
            "2025-10-15T08:00:00Z",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid HOS rules"), "stderr: {stderr}");
    assert!(stderr.contains("break_after_hours"), "stderr: {stderr}");
}

#[test]
fn test_rules_override_from_environment_is_validated() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path());
    let output = Command::new(hos_binary())
        .env("HOME", temp.path())
        .env_remove("XDG_CONFIG_HOME")
        .env("HOS_RULES__FUEL_INTERVAL_MILES", "0.000001")
        .arg("--config")
        .arg(&config_path)
        .args([
            "simulate",
            "--drive-hours",
            "5",
            "--miles",
            "100",
            "--start",
            "2025-10-15T08:00:00Z",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("fuel_interval_miles"));
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();
    let output = hos(temp.path(), &[]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage:"));
}
