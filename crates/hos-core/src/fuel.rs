//! Distance-indexed fuel stop planning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::units::{hours, round2};

/// Intervals shorter than this produce no plan.
pub const MIN_FUEL_INTERVAL_MILES: f64 = 1.0;

/// A planned refueling waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStop {
    /// Distance from the trip origin in miles.
    pub mile: f64,
    /// Arrival estimate at constant average speed, ignoring any stoppage.
    pub eta: DateTime<Utc>,
}

/// Plans one fuel stop at every multiple of `interval_miles` strictly below
/// `total_miles`, in increasing mile order.
///
/// Returns an empty plan when the trip is no longer than one interval, when
/// the interval is under [`MIN_FUEL_INTERVAL_MILES`], when the speed is not
/// positive, or when `total_miles` is not finite.
pub fn plan_fuel_stops(
    total_miles: f64,
    start: DateTime<Utc>,
    avg_speed_mph: f64,
    interval_miles: f64,
) -> Vec<FuelStop> {
    if interval_miles.is_nan()
        || interval_miles < MIN_FUEL_INTERVAL_MILES
        || avg_speed_mph.is_nan()
        || avg_speed_mph <= 0.0
        || !total_miles.is_finite()
    {
        return Vec::new();
    }

    let mut stops = Vec::new();
    let mut mile = interval_miles;
    while mile < total_miles {
        stops.push(FuelStop {
            mile: round2(mile),
            eta: start + hours(mile / avg_speed_mph),
        });
        mile += interval_miles;
    }
    stops
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 15, 8, 0, 0).unwrap()
    }

    #[test]
    fn plans_stop_every_thousand_miles() {
        let stops = plan_fuel_stops(2500.0, t0(), 50.0, 1000.0);

        assert_eq!(stops.len(), 2);
        assert!((stops[0].mile - 1000.0).abs() < f64::EPSILON);
        assert_eq!(stops[0].eta, t0() + Duration::hours(20));
        assert!((stops[1].mile - 2000.0).abs() < f64::EPSILON);
        assert_eq!(stops[1].eta, t0() + Duration::hours(40));
    }

    #[test]
    fn short_trip_has_no_stops() {
        assert!(plan_fuel_stops(900.0, t0(), 50.0, 1000.0).is_empty());
    }

    #[test]
    fn stop_exactly_at_total_is_excluded() {
        let stops = plan_fuel_stops(2000.0, t0(), 55.0, 1000.0);
        assert_eq!(stops.len(), 1);
        assert!(plan_fuel_stops(1000.0, t0(), 55.0, 1000.0).is_empty());
    }

    #[test]
    fn degenerate_inputs_yield_empty_plan() {
        assert!(plan_fuel_stops(5000.0, t0(), 0.0, 1000.0).is_empty());
        assert!(plan_fuel_stops(5000.0, t0(), 55.0, 0.0).is_empty());
        assert!(plan_fuel_stops(5000.0, t0(), 55.0, 1e-12).is_empty());
        assert!(plan_fuel_stops(f64::INFINITY, t0(), 55.0, 1000.0).is_empty());
        assert!(plan_fuel_stops(5000.0, t0(), f64::NAN, 1000.0).is_empty());
    }
}
