//! Shared utilities for CLI commands.

use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, Utc};
use hos_core::{SimulationResult, TripParams, validate_trip_inputs};

use crate::Config;
use crate::cli::ScheduleArgs;

/// Naive formats accepted in addition to RFC 3339; interpreted as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a trip start time.
///
/// Supports:
/// - RFC 3339: "2025-10-15T08:00:00Z", "2025-10-15T08:00:00-05:00"
/// - Naive, taken as UTC: "2025-10-15T08:00", "2025-10-15 08:00:00"
pub fn parse_datetime(s: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    anyhow::bail!("Invalid start time: {s}. Use ISO 8601 (e.g., 2025-10-15T08:00:00Z)")
}

/// Opens the trip database, ensuring the parent directory exists.
pub fn open_database(config: &Config) -> anyhow::Result<hos_db::Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    hos_db::Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

/// Validates inputs and runs the simulator with the configured rules.
pub fn run_simulation(
    drive_hours: f64,
    miles: f64,
    schedule: &ScheduleArgs,
    rules: &hos_core::HosRules,
) -> anyhow::Result<(TripParams, SimulationResult)> {
    let start = parse_datetime(&schedule.start)?;
    rules
        .validate()
        .context("invalid HOS rules in configuration")?;
    validate_trip_inputs(drive_hours, miles, schedule.cycle_used, schedule.avg_speed)
        .context("invalid trip inputs")?;
    for (field, value) in [
        ("pickup hours", schedule.pickup_hours),
        ("dropoff hours", schedule.dropoff_hours),
    ] {
        if !value.is_finite() || value < 0.0 {
            anyhow::bail!("{field} must be a finite non-negative number, got {value}");
        }
    }

    let params = TripParams {
        pickup_hours: schedule.pickup_hours,
        dropoff_hours: schedule.dropoff_hours,
        avg_speed_mph: schedule.avg_speed,
        ..TripParams::new(drive_hours, miles, start, schedule.cycle_used)
    };
    let result = hos_core::simulate(&params, rules);
    tracing::debug!(
        days = result.summary.days_simulated,
        violations = result.violations.len(),
        "simulation finished"
    );
    Ok((params, result))
}
