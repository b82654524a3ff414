//! Regulatory rule set consumed by the simulator.

use serde::{Deserialize, Serialize};

use crate::fuel::MIN_FUEL_INTERVAL_MILES;
use crate::geo::ValidationError;

/// Hours-of-Service limits for a single jurisdiction.
///
/// The default matches the simplified FMCSA property-carrying rules. Every
/// field can be overridden individually from configuration; missing fields
/// fall back to the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HosRules {
    /// Max driving hours per day.
    pub drive_limit_hours: f64,
    /// Cumulative driving since the last break that forces a break.
    pub break_after_hours: f64,
    pub break_hours: f64,
    /// Daily on-duty window. Driving, breaks, fuel stops and other
    /// on-duty work all consume it.
    pub on_duty_window_hours: f64,
    /// Off-duty rest appended to the end of every simulated day.
    pub daily_reset_hours: f64,
    /// 8-day cycle cap. Exceeding it is recorded, not enforced.
    pub cycle_limit_hours: f64,
    pub fuel_stop_hours: f64,
    pub fuel_interval_miles: f64,
    /// Safety ceiling on simulated days.
    pub max_days: u32,
}

impl Default for HosRules {
    fn default() -> Self {
        Self {
            drive_limit_hours: 11.0,
            break_after_hours: 8.0,
            break_hours: 0.5,
            on_duty_window_hours: 14.0,
            daily_reset_hours: 10.0,
            cycle_limit_hours: 70.0,
            fuel_stop_hours: 0.5,
            fuel_interval_miles: 1000.0,
            max_days: 60,
        }
    }
}

impl HosRules {
    /// Checks that every limit is usable by the simulator.
    ///
    /// Zero-length breaks, an empty on-duty window or a vanishing fuel
    /// interval would stop the daily loop from making progress.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            ("drive_limit_hours", self.drive_limit_hours, true),
            ("break_after_hours", self.break_after_hours, true),
            ("break_hours", self.break_hours, true),
            ("on_duty_window_hours", self.on_duty_window_hours, true),
            ("daily_reset_hours", self.daily_reset_hours, false),
            ("cycle_limit_hours", self.cycle_limit_hours, false),
            ("fuel_stop_hours", self.fuel_stop_hours, false),
        ];
        for (field, value, strictly_positive) in checks {
            let in_range = if strictly_positive {
                value > 0.0
            } else {
                value >= 0.0
            };
            if !value.is_finite() || !in_range {
                return Err(ValidationError::InvalidRule {
                    field,
                    expected: if strictly_positive {
                        "a finite positive number"
                    } else {
                        "a finite non-negative number"
                    },
                    value,
                });
            }
        }

        if !self.fuel_interval_miles.is_finite()
            || self.fuel_interval_miles < MIN_FUEL_INTERVAL_MILES
        {
            return Err(ValidationError::InvalidRule {
                field: "fuel_interval_miles",
                expected: "a finite number of at least 1 mile",
                value: self.fuel_interval_miles,
            });
        }
        if self.max_days == 0 {
            return Err(ValidationError::InvalidRule {
                field: "max_days",
                expected: "at least 1",
                value: 0.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let rules: HosRules =
            serde_json::from_str(r#"{"cycle_limit_hours": 60.0, "max_days": 8}"#).unwrap();
        assert!((rules.cycle_limit_hours - 60.0).abs() < f64::EPSILON);
        assert_eq!(rules.max_days, 8);
        assert!((rules.drive_limit_hours - 11.0).abs() < f64::EPSILON);
        assert!((rules.on_duty_window_hours - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_rules_are_valid() {
        assert_eq!(HosRules::default().validate(), Ok(()));
    }

    #[test]
    fn zero_length_break_is_rejected() {
        let rules = HosRules {
            break_after_hours: 0.0,
            break_hours: 0.0,
            ..HosRules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(ValidationError::InvalidRule {
                field: "break_after_hours",
                ..
            })
        ));
    }

    #[test]
    fn unusable_limits_are_rejected() {
        let cases = [
            (
                "drive_limit_hours",
                HosRules {
                    drive_limit_hours: 0.0,
                    ..HosRules::default()
                },
            ),
            (
                "break_hours",
                HosRules {
                    break_hours: 0.0,
                    ..HosRules::default()
                },
            ),
            (
                "on_duty_window_hours",
                HosRules {
                    on_duty_window_hours: f64::NAN,
                    ..HosRules::default()
                },
            ),
            (
                "fuel_stop_hours",
                HosRules {
                    fuel_stop_hours: -0.5,
                    ..HosRules::default()
                },
            ),
            (
                "fuel_interval_miles",
                HosRules {
                    fuel_interval_miles: 1e-9,
                    ..HosRules::default()
                },
            ),
            (
                "max_days",
                HosRules {
                    max_days: 0,
                    ..HosRules::default()
                },
            ),
        ];
        for (expected_field, rules) in cases {
            match rules.validate() {
                Err(ValidationError::InvalidRule { field, .. }) => {
                    assert_eq!(field, expected_field);
                }
                other => panic!("{expected_field}: expected InvalidRule, got {other:?}"),
            }
        }
    }
}
