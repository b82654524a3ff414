//! Coordinates and trip input validation.
//!
//! The simulator assumes well-formed numeric inputs; everything here runs at
//! the boundary before it is invoked.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for trip inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("latitude must be between -90 and 90, got {value}")]
    LatitudeOutOfRange { value: f64 },

    /// Longitude outside [-180, 180] or not finite.
    #[error("longitude must be between -180 and 180, got {value}")]
    LongitudeOutOfRange { value: f64 },

    /// A coordinate string was not `lat,lng`.
    #[error("invalid coordinate {input:?}: expected \"lat,lng\"")]
    MalformedCoordinate { input: String },

    /// A numeric trip input was negative, NaN or infinite.
    #[error("{field} must be a finite non-negative number, got {value}")]
    InvalidQuantity { field: &'static str, value: f64 },

    /// Average speed must be strictly positive.
    #[error("average speed must be positive, got {value}")]
    NonPositiveSpeed { value: f64 },

    /// A configured HOS rule value is outside its usable range.
    #[error("rule {field} must be {expected}, got {value}")]
    InvalidRule {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
}

/// A validated WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Creates a coordinate after range validation.
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::LatitudeOutOfRange { value: lat });
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(ValidationError::LongitudeOutOfRange { value: lng });
        }
        Ok(Self { lat, lng })
    }

    pub const fn lat(&self) -> f64 {
        self.lat
    }

    pub const fn lng(&self) -> f64 {
        self.lng
    }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = ValidationError;

    fn try_from((lat, lng): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(lat, lng)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coord: Coordinate) -> Self {
        (coord.lat, coord.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for Coordinate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedCoordinate {
            input: s.to_string(),
        };
        let (lat, lng) = s.split_once(',').ok_or_else(malformed)?;
        let lat: f64 = lat.trim().parse().map_err(|_| malformed())?;
        let lng: f64 = lng.trim().parse().map_err(|_| malformed())?;
        Self::new(lat, lng)
    }
}

/// Checks the numeric preconditions of the simulator.
pub fn validate_trip_inputs(
    total_drive_hours: f64,
    total_miles: f64,
    cycle_used: f64,
    avg_speed_mph: f64,
) -> Result<(), ValidationError> {
    for (field, value) in [
        ("drive hours", total_drive_hours),
        ("miles", total_miles),
        ("cycle hours used", cycle_used),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidQuantity { field, value });
        }
    }
    if !avg_speed_mph.is_finite() || avg_speed_mph <= 0.0 {
        return Err(ValidationError::NonPositiveSpeed {
            value: avg_speed_mph,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_coordinate() {
        let coord = Coordinate::new(38.8951, -77.0364).unwrap();
        assert!((coord.lat() - 38.8951).abs() < f64::EPSILON);
        assert!((coord.lng() + 77.0364).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(matches!(
            Coordinate::new(200.0, 0.0),
            Err(ValidationError::LatitudeOutOfRange { .. })
        ));
        assert!(matches!(
            Coordinate::new(0.0, 200.0),
            Err(ValidationError::LongitudeOutOfRange { .. })
        ));
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn parses_lat_lng_string() {
        let coord: Coordinate = "39.0997, -94.5786".parse().unwrap();
        assert_eq!(coord, Coordinate::new(39.0997, -94.5786).unwrap());
    }

    #[test]
    fn rejects_malformed_string() {
        for input in ["39.0997", "a,b", ""] {
            assert!(matches!(
                input.parse::<Coordinate>(),
                Err(ValidationError::MalformedCoordinate { .. })
            ));
        }
    }

    #[test]
    fn deserializes_from_pair_with_validation() {
        let coord: Coordinate = serde_json::from_str("[41.8781, -87.6298]").unwrap();
        assert!((coord.lat() - 41.8781).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<Coordinate>("[200, 200]").is_err());
    }

    #[test]
    fn validates_trip_quantities() {
        assert!(validate_trip_inputs(5.0, 100.0, 12.0, 55.0).is_ok());
        assert!(validate_trip_inputs(0.0, 0.0, 0.0, 55.0).is_ok());
        assert_eq!(
            validate_trip_inputs(-1.0, 100.0, 0.0, 55.0),
            Err(ValidationError::InvalidQuantity {
                field: "drive hours",
                value: -1.0
            })
        );
        assert!(validate_trip_inputs(5.0, f64::INFINITY, 0.0, 55.0).is_err());
        assert!(matches!(
            validate_trip_inputs(5.0, 100.0, 0.0, 0.0),
            Err(ValidationError::NonPositiveSpeed { .. })
        ));
    }
}
