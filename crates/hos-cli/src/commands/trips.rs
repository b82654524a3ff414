//! Trips command: list, show and delete saved trips.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use hos_core::{Coordinate, SimulationResult};
use hos_db::{Database, TripRecord};
use serde::Serialize;

use crate::Config;
use crate::cli::TripsAction;
use crate::commands::render::write_schedule;
use crate::commands::util::open_database;

/// Trip metadata as emitted in JSON output.
#[derive(Debug, Serialize)]
pub struct TripJson {
    pub id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub current: Coordinate,
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
    pub cycle_hours_used: f64,
    pub total_drive_hours: f64,
    pub total_miles: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&TripRecord> for TripJson {
    fn from(trip: &TripRecord) -> Self {
        Self {
            id: trip.id.clone(),
            name: trip.name.clone(),
            start_time: trip.start_time,
            current: trip.current,
            pickup: trip.pickup,
            dropoff: trip.dropoff,
            cycle_hours_used: trip.cycle_hours_used,
            total_drive_hours: trip.total_drive_hours,
            total_miles: trip.total_miles,
            created_at: trip.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct TripDetailJson<'a> {
    trip: TripJson,
    hos_sim: Option<&'a SimulationResult>,
}

pub fn run<W: Write>(writer: &mut W, action: &TripsAction, config: &Config) -> Result<()> {
    let mut db = open_database(config)?;

    match action {
        TripsAction::List { json } => list(writer, &db, *json),
        TripsAction::Show { id, json } => show(writer, &db, id, *json),
        TripsAction::Delete { id } => {
            if !db.delete_trip(id)? {
                bail!("trip not found: {id}");
            }
            writeln!(writer, "Deleted trip {id}")?;
            Ok(())
        }
    }
}

fn list<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let trips = db.list_trips()?;

    if json {
        let rows: Vec<TripJson> = trips.iter().map(TripJson::from).collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }

    if trips.is_empty() {
        writeln!(writer, "No trips saved.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<8}  {:<16}  {:<24}  {:>6}  {:>9}  {:>4}",
        "ID", "CREATED", "NAME", "DRIVE", "MILES", "DAYS"
    )?;
    for trip in &trips {
        let id_short = &trip.id[..8.min(trip.id.len())];
        let days = trip
            .simulation
            .as_ref()
            .map_or_else(|| "-".to_string(), |s| s.summary.days_simulated.to_string());
        writeln!(
            writer,
            "{id_short:<8}  {:<16}  {:<24}  {:>5.2}h  {:>9.2}  {days:>4}",
            trip.created_at.format("%Y-%m-%d %H:%M"),
            truncate(trip.display_name(), 24),
            trip.total_drive_hours,
            trip.total_miles,
        )?;
    }
    Ok(())
}

fn show<W: Write>(writer: &mut W, db: &Database, id: &str, json: bool) -> Result<()> {
    let Some(trip) = db.get_trip(id)? else {
        bail!("trip not found: {id}");
    };

    if json {
        let detail = TripDetailJson {
            trip: TripJson::from(&trip),
            hos_sim: trip.simulation.as_ref(),
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&detail)?)?;
        return Ok(());
    }

    write_trip_header(writer, &trip)?;
    writeln!(writer)?;
    match &trip.simulation {
        Some(simulation) => write_schedule(writer, simulation)?,
        None => writeln!(writer, "No schedule stored for this trip.")?,
    }
    Ok(())
}

/// Writes the trip identity block shared by `plan` and `trips show`.
pub fn write_trip_header<W: Write>(writer: &mut W, trip: &TripRecord) -> std::io::Result<()> {
    writeln!(writer, "Trip {} - {}", trip.id, trip.display_name())?;
    writeln!(writer, "Start:    {}", trip.start_time.to_rfc3339())?;
    writeln!(writer, "Current:  {}", trip.current)?;
    writeln!(writer, "Pickup:   {}", trip.pickup)?;
    writeln!(writer, "Dropoff:  {}", trip.dropoff)?;
    writeln!(writer, "Cycle:    {:.2}h used", trip.cycle_hours_used)
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max - 1).collect();
    out.push('…');
    out
}
