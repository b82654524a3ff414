//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hos_core::Coordinate;

/// Hours-of-Service trip planner.
///
/// Simulates a driver's schedule for a point-to-point trip against daily drive
/// limits, mandatory breaks, the on-duty window and the 8-day cycle cap.
#[derive(Debug, Parser)]
#[command(name = "hos", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Simulate a schedule from known drive hours and miles.
    Simulate(SimulateArgs),

    /// Route a trip, simulate its schedule and save it.
    Plan(PlanArgs),

    /// Manage saved trips.
    #[command(subcommand)]
    Trips(TripsAction),
}

/// Options shared by every command that runs the simulator.
#[derive(Debug, Clone, Args)]
pub struct ScheduleArgs {
    /// Trip start time (ISO 8601, e.g. 2025-10-15T08:00:00Z).
    #[arg(long)]
    pub start: String,

    /// Cycle hours already used in the current 8-day window.
    #[arg(long, default_value_t = 0.0)]
    pub cycle_used: f64,

    /// On-duty hours spent at pickup.
    #[arg(long, default_value_t = hos_core::simulation::DEFAULT_PICKUP_HOURS)]
    pub pickup_hours: f64,

    /// On-duty hours spent at dropoff.
    #[arg(long, default_value_t = hos_core::simulation::DEFAULT_DROPOFF_HOURS)]
    pub dropoff_hours: f64,

    /// Average speed used to place fuel stops.
    #[arg(long, default_value_t = hos_core::simulation::DEFAULT_AVG_SPEED_MPH)]
    pub avg_speed: f64,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Total drive hours for the trip.
    #[arg(long)]
    pub drive_hours: f64,

    /// Total trip distance in miles.
    #[arg(long)]
    pub miles: f64,

    #[command(flatten)]
    pub schedule: ScheduleArgs,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Driver's current location as "lat,lng".
    #[arg(long, allow_hyphen_values = true)]
    pub current: Coordinate,

    /// Pickup location as "lat,lng".
    #[arg(long, allow_hyphen_values = true)]
    pub pickup: Coordinate,

    /// Dropoff location as "lat,lng".
    #[arg(long, allow_hyphen_values = true)]
    pub dropoff: Coordinate,

    /// Trip name.
    #[arg(long, default_value = "")]
    pub name: String,

    /// Known drive hours; with --miles, skips the routing provider.
    #[arg(long, requires = "miles")]
    pub drive_hours: Option<f64>,

    /// Known distance in miles; with --drive-hours, skips the routing provider.
    #[arg(long, requires = "drive_hours")]
    pub miles: Option<f64>,

    /// Do not save the trip.
    #[arg(long)]
    pub no_save: bool,

    #[command(flatten)]
    pub schedule: ScheduleArgs,
}

/// Saved trip actions.
#[derive(Debug, Subcommand)]
pub enum TripsAction {
    /// List saved trips, newest first.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show a saved trip and its schedule.
    Show {
        /// Trip ID.
        id: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved trip.
    Delete {
        /// Trip ID.
        id: String,
    },
}
