//! Hours-of-Service trip planner CLI library.
//!
//! This crate provides the CLI interface for the HOS trip planner.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, PlanArgs, ScheduleArgs, SimulateArgs, TripsAction};
pub use config::Config;
