//! Storage layer for the trip planner.
//!
//! Persists planned trips, together with the schedule simulated for them,
//! using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in RFC 3339 format with millisecond precision
//! (e.g., `2025-10-15T08:00:00.000Z`), so lexicographic ordering matches
//! chronological ordering.
//!
//! The `simulation` column stores the full [`SimulationResult`] as JSON. It is
//! nullable so a trip can be recorded before (or without) a simulation run.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use hos_core::{Coordinate, SimulationResult};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;
use uuid::Uuid;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for trip {trip_id}: {timestamp}")]
    TimestampParse {
        trip_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// Stored trip data could not be decoded.
    #[error("invalid trip data for {trip_id}: {message}")]
    InvalidTripData { trip_id: String, message: String },
    /// Failed to encode a simulation for storage.
    #[error("failed to encode simulation: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A trip ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub current: Coordinate,
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
    pub cycle_hours_used: f64,
    pub total_drive_hours: f64,
    pub total_miles: f64,
    pub simulation: Option<SimulationResult>,
}

/// A stored trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub current: Coordinate,
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
    pub cycle_hours_used: f64,
    pub total_drive_hours: f64,
    pub total_miles: f64,
    pub simulation: Option<SimulationResult>,
    pub created_at: DateTime<Utc>,
}

impl TripRecord {
    /// Display name, falling back to a placeholder for unnamed trips.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unnamed"
        } else {
            &self.name
        }
    }
}

const TRIP_COLUMNS: &str = "
    id, name, start_time,
    current_lat, current_lng, pickup_lat, pickup_lng, dropoff_lat, dropoff_lng,
    cycle_hours_used, total_drive_hours, total_miles, simulation, created_at
";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- start_time, created_at: RFC 3339 (e.g., '2025-10-15T08:00:00.000Z')
            -- simulation: JSON-encoded schedule, NULL when not simulated
            CREATE TABLE IF NOT EXISTS trips (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                start_time TEXT NOT NULL,
                current_lat REAL NOT NULL,
                current_lng REAL NOT NULL,
                pickup_lat REAL NOT NULL,
                pickup_lng REAL NOT NULL,
                dropoff_lat REAL NOT NULL,
                dropoff_lng REAL NOT NULL,
                cycle_hours_used REAL NOT NULL DEFAULT 0,
                total_drive_hours REAL NOT NULL DEFAULT 0,
                total_miles REAL NOT NULL DEFAULT 0,
                simulation TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_trips_created ON trips(created_at);
            ",
        )?;
        Ok(())
    }

    /// Stores a new trip and returns the stored record.
    pub fn insert_trip(&mut self, trip: &NewTrip) -> Result<TripRecord, DbError> {
        self.insert_trip_at(trip, Utc::now())
    }

    fn insert_trip_at(
        &mut self,
        trip: &NewTrip,
        created_at: DateTime<Utc>,
    ) -> Result<TripRecord, DbError> {
        let id = Uuid::new_v4().to_string();
        let simulation = trip
            .simulation
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(DbError::Encode)?;

        self.conn.execute(
            &format!("INSERT INTO trips ({TRIP_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"),
            params![
                id,
                trip.name,
                format_timestamp(trip.start_time),
                trip.current.lat(),
                trip.current.lng(),
                trip.pickup.lat(),
                trip.pickup.lng(),
                trip.dropoff.lat(),
                trip.dropoff.lng(),
                trip.cycle_hours_used,
                trip.total_drive_hours,
                trip.total_miles,
                simulation,
                format_timestamp(created_at),
            ],
        )?;
        tracing::debug!(trip_id = %id, name = %trip.name, "trip stored");

        self.get_trip(&id)?
            .ok_or_else(|| DbError::InvalidTripData {
                trip_id: id,
                message: "trip missing after insert".to_string(),
            })
    }

    /// Fetches a trip by ID.
    pub fn get_trip(&self, id: &str) -> Result<Option<TripRecord>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?"))?;
        let row = stmt.query_row([id], TripRow::from_row).optional()?;
        row.map(TripRow::into_record).transpose()
    }

    /// Lists all trips, newest first.
    pub fn list_trips(&self) -> Result<Vec<TripRecord>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([], TripRow::from_row)?;
        let mut trips = Vec::new();
        for row in rows {
            trips.push(row?.into_record()?);
        }
        Ok(trips)
    }

    /// Deletes a trip. Returns whether a row was removed.
    pub fn delete_trip(&mut self, id: &str) -> Result<bool, DbError> {
        let deleted = self.conn.execute("DELETE FROM trips WHERE id = ?", [id])?;
        Ok(deleted > 0)
    }
}

/// Raw column values for a trip row.
struct TripRow {
    id: String,
    name: String,
    start_time: String,
    coords: [f64; 6],
    cycle_hours_used: f64,
    total_drive_hours: f64,
    total_miles: f64,
    simulation: Option<String>,
    created_at: String,
}

impl TripRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            start_time: row.get(2)?,
            coords: [
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
            ],
            cycle_hours_used: row.get(9)?,
            total_drive_hours: row.get(10)?,
            total_miles: row.get(11)?,
            simulation: row.get(12)?,
            created_at: row.get(13)?,
        })
    }

    fn into_record(self) -> Result<TripRecord, DbError> {
        let [current_lat, current_lng, pickup_lat, pickup_lng, dropoff_lat, dropoff_lng] =
            self.coords;
        let coordinate = |lat, lng| {
            Coordinate::new(lat, lng).map_err(|err| DbError::InvalidTripData {
                trip_id: self.id.clone(),
                message: err.to_string(),
            })
        };
        let current = coordinate(current_lat, current_lng)?;
        let pickup = coordinate(pickup_lat, pickup_lng)?;
        let dropoff = coordinate(dropoff_lat, dropoff_lng)?;

        let simulation = self
            .simulation
            .as_deref()
            .map(serde_json::from_str::<SimulationResult>)
            .transpose()
            .map_err(|err| DbError::InvalidTripData {
                trip_id: self.id.clone(),
                message: err.to_string(),
            })?;

        Ok(TripRecord {
            start_time: parse_timestamp(&self.start_time, &self.id)?,
            created_at: parse_timestamp(&self.created_at, &self.id)?,
            id: self.id,
            name: self.name,
            current,
            pickup,
            dropoff,
            cycle_hours_used: self.cycle_hours_used,
            total_drive_hours: self.total_drive_hours,
            total_miles: self.total_miles,
            simulation,
        })
    }
}

fn parse_timestamp(timestamp: &str, trip_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            trip_id: trip_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
