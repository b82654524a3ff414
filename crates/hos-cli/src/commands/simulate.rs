//! Simulate command: runs the HOS engine on known totals.

use std::io::Write;

use anyhow::Result;

use crate::Config;
use crate::cli::SimulateArgs;
use crate::commands::render::write_schedule;
use crate::commands::util::run_simulation;

pub fn run<W: Write>(writer: &mut W, args: &SimulateArgs, config: &Config) -> Result<()> {
    let (_, result) = run_simulation(args.drive_hours, args.miles, &args.schedule, &config.rules)?;

    if args.schedule.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        write_schedule(writer, &result)?;
    }
    Ok(())
}
