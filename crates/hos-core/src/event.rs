//! Timed duty-status events and regulatory violations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event_kind::EventKind;
use crate::units::{hours, round2};

/// An atomic timed occurrence within a simulated day.
///
/// `end` is always `start` plus the unrounded duration, so consecutive events
/// chain without gaps even though `duration` is reported to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Duration in hours, rounded to two decimals.
    pub duration: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Event {
    /// Builds an event of `duration_hours` starting at `start`.
    pub fn new(
        kind: EventKind,
        duration_hours: f64,
        start: DateTime<Utc>,
        note: Option<String>,
    ) -> Self {
        Self {
            kind,
            duration: round2(duration_hours),
            start,
            end: start + hours(duration_hours),
            note,
        }
    }
}

/// Category of regulatory breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// Cumulative cycle hours went over the cycle cap.
    CycleLimitExceeded,
    /// Drive time was left over when the day ceiling was reached.
    IncompleteRoute,
}

impl ViolationKind {
    /// String representation used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CycleLimitExceeded => "CYCLE_LIMIT_EXCEEDED",
            Self::IncompleteRoute => "INCOMPLETE_ROUTE",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A regulatory breach detected during simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub time: DateTime<Utc>,
}
