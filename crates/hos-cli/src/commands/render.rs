//! Human-readable schedule rendering.

use std::io::{self, Write};

use hos_core::{DaySummary, SimulationResult};

const TIME_FORMAT: &str = "%H:%M";
const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Writes the day-by-day schedule, violations and summary.
pub fn write_schedule<W: Write>(writer: &mut W, result: &SimulationResult) -> io::Result<()> {
    if result.days.is_empty() {
        writeln!(writer, "No driving required.")?;
    }

    for (index, day) in result.days.iter().enumerate() {
        write_day(writer, index + 1, day)?;
        writeln!(writer)?;
    }

    write_heading(writer, "VIOLATIONS")?;
    if result.violations.is_empty() {
        writeln!(writer, "(none)")?;
    }
    for violation in &result.violations {
        writeln!(
            writer,
            "{} at {}",
            violation.kind,
            violation.time.format(STAMP_FORMAT)
        )?;
    }

    let summary = &result.summary;
    writeln!(writer)?;
    write_heading(writer, "SUMMARY")?;
    writeln!(writer, "Days simulated:    {}", summary.days_simulated)?;
    writeln!(writer, "Total drive:       {:.2}h", summary.total_drive_hours)?;
    writeln!(writer, "Total miles:       {:.2}", summary.total_miles)?;
    writeln!(writer, "Fuel stops:        {}", result.fuel_stops.len())?;
    writeln!(writer, "Cycle hours used:  {:.2}", summary.cycle_hours_used)?;
    writeln!(writer, "Remaining drive:   {:.2}h", summary.remaining_drive_hours)?;
    Ok(())
}

fn write_day<W: Write>(writer: &mut W, number: usize, day: &DaySummary) -> io::Result<()> {
    write_heading(writer, &format!("DAY {number} ({})", day.date))?;
    for event in &day.events {
        let line = format!(
            "  {}-{}  {:<19} {:>6.2}h  {}",
            event.start.format(TIME_FORMAT),
            event.end.format(TIME_FORMAT),
            event.kind.as_str(),
            event.duration,
            event.note.as_deref().unwrap_or_default(),
        );
        writeln!(writer, "{}", line.trim_end())?;
    }
    writeln!(
        writer,
        "  Drive {:.2}h | Rest {:.2}h | On duty {:.2}h",
        day.totals.drive, day.totals.rest, day.totals.on_duty
    )?;
    for stop in &day.fuel_stops {
        writeln!(
            writer,
            "  Fuel stop at mile {} (planned ETA {})",
            stop.mile,
            stop.eta.format(STAMP_FORMAT)
        )?;
    }
    for violation in &day.violations {
        writeln!(
            writer,
            "  ! {} at {}",
            violation.kind,
            violation.time.format(TIME_FORMAT)
        )?;
    }
    Ok(())
}

fn write_heading<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "─".repeat(title.chars().count()))
}
