//! Duty-status kinds as the single source of truth for event type strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a timed occurrence in a driver's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Drive,
    Break,
    OnDutyNotDriving,
    OffDuty,
    FuelStop,
}

impl EventKind {
    /// String representation used in reports and storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Drive => "DRIVE",
            Self::Break => "BREAK",
            Self::OnDutyNotDriving => "ON_DUTY_NOT_DRIVING",
            Self::OffDuty => "OFF_DUTY",
            Self::FuelStop => "FUEL_STOP",
        }
    }

    /// Whether time spent in this status counts as rest in the daily totals.
    pub const fn is_rest(&self) -> bool {
        matches!(self, Self::OffDuty | Self::Break)
    }

    /// Whether this status eats into the daily on-duty window.
    pub const fn consumes_on_duty_window(&self) -> bool {
        !matches!(self, Self::OffDuty)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRIVE" => Ok(Self::Drive),
            "BREAK" => Ok(Self::Break),
            "ON_DUTY_NOT_DRIVING" | "ON_DUTY_NOT_DRIVE" => Ok(Self::OnDutyNotDriving),
            "OFF_DUTY" => Ok(Self::OffDuty),
            "FUEL_STOP" => Ok(Self::FuelStop),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event kind strings.
#[derive(Debug, Clone)]
pub struct UnknownEventKind(String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}
