//! Numeric helpers shared by the planner and the simulator.

use chrono::Duration;

/// Tolerance for comparisons against zero on accumulated hours.
pub const EPSILON: f64 = 1e-6;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Rounds to two decimals for reporting. Internal accumulators never go through this.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts fractional hours into a millisecond-resolution duration.
#[allow(clippy::cast_possible_truncation)]
pub fn hours(value: f64) -> Duration {
    Duration::milliseconds((value * MILLIS_PER_HOUR).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert!((round2(1.005_1) - 1.01).abs() < f64::EPSILON);
        assert!((round2(18.181_818) - 18.18).abs() < f64::EPSILON);
        assert!((round2(0.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hours_converts_fractions() {
        assert_eq!(hours(0.5), Duration::minutes(30));
        assert_eq!(hours(10.0), Duration::hours(10));
        assert_eq!(hours(1.0 / 3.0), Duration::milliseconds(1_200_000));
    }
}
