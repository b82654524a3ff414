//! Core domain logic for the Hours-of-Service trip planner.
//!
//! This crate contains the fundamental types and logic for:
//! - Fuel planning: distance-indexed refueling waypoints
//! - Simulation: day-by-day duty-status schedules under a rule set
//! - Validation: coordinates and numeric trip inputs

mod event;
pub mod event_kind;
mod fuel;
mod geo;
mod rules;
pub mod simulation;
mod units;

pub use event::{Event, Violation, ViolationKind};
pub use event_kind::{EventKind, UnknownEventKind};
pub use fuel::{FuelStop, plan_fuel_stops};
pub use geo::{Coordinate, ValidationError, validate_trip_inputs};
pub use rules::HosRules;
pub use simulation::{
    DayState, DaySummary, DayTotals, SimulationResult, SimulationSummary, TripParams, simulate,
    simulate_day,
};
pub use units::round2;
