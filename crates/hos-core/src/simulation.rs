//! Hours-of-Service schedule simulation.
//!
//! Turns a trip's total drive time and distance into a day-by-day sequence of
//! duty-status events that respects the limits in [`HosRules`].
//!
//! # Algorithm Summary
//!
//! 1. Plan fuel stops once for the whole trip distance
//! 2. Build one day at a time from a [`DayState`] until drive time runs out or
//!    the day ceiling is reached
//! 3. Within a day, alternate drive chunks, mandatory breaks and fuel stops
//!    until the drive limit, the on-duty window or the trip runs out
//! 4. Close every day with the off-duty reset and aggregate its totals
//!
//! Limit breaches are reported as [`Violation`]s; the simulation itself never fails.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{Event, Violation, ViolationKind};
use crate::event_kind::EventKind;
use crate::fuel::{FuelStop, plan_fuel_stops};
use crate::rules::HosRules;
use crate::units::{EPSILON, round2};

/// Default on-duty time spent loading at the start of the trip.
pub const DEFAULT_PICKUP_HOURS: f64 = 1.0;
/// Default on-duty time spent unloading at the end of the trip.
pub const DEFAULT_DROPOFF_HOURS: f64 = 1.0;
/// Default average speed used to convert drive time into distance.
pub const DEFAULT_AVG_SPEED_MPH: f64 = 55.0;

/// Inputs for a single simulation run.
///
/// Callers must supply finite, non-negative values; see
/// [`validate_trip_inputs`](crate::validate_trip_inputs).
#[derive(Debug, Clone, PartialEq)]
pub struct TripParams {
    pub total_drive_hours: f64,
    pub total_miles: f64,
    pub start: DateTime<Utc>,
    /// Cycle hours already used before the trip starts.
    pub cycle_used: f64,
    pub pickup_hours: f64,
    pub dropoff_hours: f64,
    pub avg_speed_mph: f64,
}

impl TripParams {
    /// Creates params with default pickup, dropoff and speed.
    pub const fn new(
        total_drive_hours: f64,
        total_miles: f64,
        start: DateTime<Utc>,
        cycle_used: f64,
    ) -> Self {
        Self {
            total_drive_hours,
            total_miles,
            start,
            cycle_used,
            pickup_hours: DEFAULT_PICKUP_HOURS,
            dropoff_hours: DEFAULT_DROPOFF_HOURS,
            avg_speed_mph: DEFAULT_AVG_SPEED_MPH,
        }
    }
}

/// State carried from one simulated day to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct DayState {
    /// Drive hours still to cover.
    pub remaining_drive: f64,
    /// Cumulative cycle hours, never decremented.
    pub used_cycle: f64,
    /// Simulation clock.
    pub current: DateTime<Utc>,
    /// Index of the next unconsumed entry in the fuel plan.
    pub fuel_cursor: usize,
    pub miles_covered: f64,
}

impl DayState {
    /// State at the very start of a trip.
    pub const fn initial(params: &TripParams) -> Self {
        Self {
            remaining_drive: params.total_drive_hours,
            used_cycle: params.cycle_used,
            current: params.start,
            fuel_cursor: 0,
            miles_covered: 0.0,
        }
    }

    /// Whether drive time is left, within floating tolerance.
    pub fn has_drive_remaining(&self) -> bool {
        self.remaining_drive > EPSILON
    }
}

/// Hours per category for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DayTotals {
    pub drive: f64,
    /// Off-duty plus break time.
    pub rest: f64,
    pub on_duty: f64,
}

impl DayTotals {
    fn from_events(events: &[Event]) -> Self {
        let mut totals = Self::default();
        for event in events {
            match event.kind {
                EventKind::Drive => totals.drive += event.duration,
                EventKind::OffDuty | EventKind::Break => totals.rest += event.duration,
                EventKind::OnDutyNotDriving => totals.on_duty += event.duration,
                EventKind::FuelStop => {}
            }
        }
        Self {
            drive: round2(totals.drive),
            rest: round2(totals.rest),
            on_duty: round2(totals.on_duty),
        }
    }
}

/// Output for one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub events: Vec<Event>,
    pub violations: Vec<Violation>,
    pub fuel_stops: Vec<FuelStop>,
    #[serde(rename = "summary")]
    pub totals: DayTotals,
}

/// Whole-trip totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub total_drive_hours: f64,
    pub total_miles: f64,
    pub cycle_hours_used: f64,
    pub remaining_drive_hours: f64,
    pub days_simulated: usize,
}

/// Result of [`simulate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub days: Vec<DaySummary>,
    pub violations: Vec<Violation>,
    pub fuel_stops: Vec<FuelStop>,
    pub summary: SimulationSummary,
}

/// Simulates the trip day by day under `rules`.
///
/// Always terminates within `rules.max_days` days. Drive time left over at
/// that point is reported as an `INCOMPLETE_ROUTE` violation.
pub fn simulate(params: &TripParams, rules: &HosRules) -> SimulationResult {
    let fuel_stops = plan_fuel_stops(
        params.total_miles,
        params.start,
        params.avg_speed_mph,
        rules.fuel_interval_miles,
    );

    let mut state = DayState::initial(params);
    let mut days: Vec<DaySummary> = Vec::new();
    let mut violations = Vec::new();

    while state.has_drive_remaining() && days.len() < rules.max_days as usize {
        let (day, next) = simulate_day(params, rules, &fuel_stops, state);
        tracing::debug!(
            day = days.len() + 1,
            date = %day.date,
            drive = day.totals.drive,
            remaining = next.remaining_drive,
            cycle = next.used_cycle,
            "simulated day"
        );
        if violations.is_empty() {
            if let Some(first) = day.violations.first() {
                tracing::warn!(
                    used_cycle = next.used_cycle,
                    limit = rules.cycle_limit_hours,
                    time = %first.time,
                    "cycle limit exceeded"
                );
            }
        }
        violations.extend(day.violations.iter().cloned());
        days.push(day);
        state = next;
    }

    if state.has_drive_remaining() {
        tracing::warn!(
            remaining = state.remaining_drive,
            days = days.len(),
            "route incomplete at day ceiling"
        );
        violations.push(Violation {
            kind: ViolationKind::IncompleteRoute,
            time: state.current,
        });
    }

    SimulationResult {
        summary: SimulationSummary {
            total_drive_hours: round2(params.total_drive_hours),
            total_miles: round2(params.total_miles),
            cycle_hours_used: round2(state.used_cycle),
            remaining_drive_hours: round2(state.remaining_drive.max(0.0)),
            days_simulated: days.len(),
        },
        days,
        violations,
        fuel_stops,
    }
}

/// Builds a single day starting from `state`.
///
/// Returns the finished day and the state to start the next day from.
/// `fuel_stops` is the full trip plan; only entries at or after
/// `state.fuel_cursor` are considered.
pub fn simulate_day(
    params: &TripParams,
    rules: &HosRules,
    fuel_stops: &[FuelStop],
    mut state: DayState,
) -> (DaySummary, DayState) {
    let mut day = DayBuilder::new(state.current);
    let mut on_duty_remaining = rules.on_duty_window_hours;
    let mut drive_today = 0.0;
    let mut since_last_break = 0.0;

    if state.current == params.start && params.pickup_hours > 0.0 {
        day.push(EventKind::OnDutyNotDriving, params.pickup_hours, Some("pickup"));
        on_duty_remaining -= params.pickup_hours;
        state.used_cycle += params.pickup_hours;
    }

    while drive_today < rules.drive_limit_hours
        && on_duty_remaining > EPSILON
        && state.has_drive_remaining()
    {
        if since_last_break >= rules.break_after_hours {
            // A break that takes no time can never reset the counter.
            if rules.break_hours <= EPSILON {
                break;
            }
            day.push(EventKind::Break, rules.break_hours, Some("mandatory_break"));
            on_duty_remaining -= rules.break_hours;
            since_last_break = 0.0;
            continue;
        }

        // Chunks end at the break trigger so the break lands before further driving.
        let allowed = (rules.drive_limit_hours - drive_today)
            .min(rules.break_after_hours - since_last_break)
            .min(on_duty_remaining)
            .min(state.remaining_drive);
        if allowed <= EPSILON {
            break;
        }

        day.push(EventKind::Drive, allowed, None);
        drive_today += allowed;
        since_last_break += allowed;
        on_duty_remaining -= allowed;
        state.remaining_drive -= allowed;
        state.used_cycle += allowed;
        state.miles_covered += allowed * params.avg_speed_mph;

        while let Some(stop) = fuel_stops
            .get(state.fuel_cursor)
            .filter(|stop| state.miles_covered >= stop.mile)
        {
            day.push(
                EventKind::FuelStop,
                rules.fuel_stop_hours,
                Some(&format!("fuel_at_{}mi", stop.mile)),
            );
            day.fuel_stops.push(stop.clone());
            on_duty_remaining -= rules.fuel_stop_hours;
            state.used_cycle += rules.fuel_stop_hours;
            state.fuel_cursor += 1;
        }

        if state.used_cycle > rules.cycle_limit_hours {
            day.violations.push(Violation {
                kind: ViolationKind::CycleLimitExceeded,
                time: day.clock,
            });
        }
    }

    if !state.has_drive_remaining() && params.dropoff_hours > 0.0 {
        day.push(EventKind::OnDutyNotDriving, params.dropoff_hours, Some("dropoff"));
        state.used_cycle += params.dropoff_hours;
    }

    day.push(EventKind::OffDuty, rules.daily_reset_hours, None);

    state.current = day.clock;
    (day.finish(), state)
}

/// Accumulates one day's events on a running clock.
struct DayBuilder {
    clock: DateTime<Utc>,
    events: Vec<Event>,
    violations: Vec<Violation>,
    fuel_stops: Vec<FuelStop>,
}

impl DayBuilder {
    const fn new(clock: DateTime<Utc>) -> Self {
        Self {
            clock,
            events: Vec::new(),
            violations: Vec::new(),
            fuel_stops: Vec::new(),
        }
    }

    fn push(&mut self, kind: EventKind, duration_hours: f64, note: Option<&str>) {
        let event = Event::new(kind, duration_hours, self.clock, note.map(String::from));
        self.clock = event.end;
        self.events.push(event);
    }

    fn finish(self) -> DaySummary {
        let date = self
            .events
            .first()
            .map_or_else(|| self.clock.date_naive(), |event| event.start.date_naive());
        DaySummary {
            date,
            totals: DayTotals::from_events(&self.events),
            events: self.events,
            violations: self.violations,
            fuel_stops: self.fuel_stops,
        }
    }
}
