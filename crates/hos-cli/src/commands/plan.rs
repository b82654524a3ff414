//! Plan command: route a trip, simulate its schedule and save it.

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use hos_db::NewTrip;
use hos_route::{Route, RouteClient};
use serde::Serialize;
use serde_json::Value;

use crate::Config;
use crate::cli::PlanArgs;
use crate::commands::render::write_schedule;
use crate::commands::trips::{TripJson, write_trip_header};
use crate::commands::util::{open_database, parse_datetime, run_simulation};

/// Full plan response.
#[derive(Debug, Serialize)]
struct PlanJson<'a> {
    trip: Option<TripJson>,
    route: &'a Value,
    total_hours: f64,
    total_miles: f64,
    hos_sim: &'a hos_core::SimulationResult,
}

pub fn run<W: Write>(writer: &mut W, args: &PlanArgs, config: &Config) -> Result<()> {
    // Fail on bad input before spending a routing request.
    parse_datetime(&args.schedule.start)?;
    config
        .rules
        .validate()
        .context("invalid HOS rules in configuration")?;

    let route = match (args.drive_hours, args.miles) {
        (Some(drive_hours), Some(miles)) => Route {
            geometry: Value::Null,
            drive_hours,
            miles,
        },
        _ => fetch_route(args, config)?,
    };

    let (params, simulation) =
        run_simulation(route.drive_hours, route.miles, &args.schedule, &config.rules)?;

    let trip = if args.no_save {
        None
    } else {
        let mut db = open_database(config)?;
        let stored = db
            .insert_trip(&NewTrip {
                name: args.name.clone(),
                start_time: params.start,
                current: args.current,
                pickup: args.pickup,
                dropoff: args.dropoff,
                cycle_hours_used: params.cycle_used,
                total_drive_hours: route.drive_hours,
                total_miles: route.miles,
                simulation: Some(simulation.clone()),
            })
            .context("failed to save trip")?;
        tracing::info!(trip_id = %stored.id, "trip saved");
        Some(stored)
    };

    if args.schedule.json {
        let output = PlanJson {
            trip: trip.as_ref().map(TripJson::from),
            route: &route.geometry,
            total_hours: route.drive_hours,
            total_miles: route.miles,
            hos_sim: &simulation,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        if let Some(trip) = &trip {
            write_trip_header(writer, trip)?;
            writeln!(writer)?;
        }
        writeln!(
            writer,
            "Route: {:.2}h driving, {:.2} miles",
            route.drive_hours, route.miles
        )?;
        writeln!(writer)?;
        write_schedule(writer, &simulation)?;
    }
    Ok(())
}

fn fetch_route(args: &PlanArgs, config: &Config) -> Result<Route> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow!("missing OpenRouteService API key (set HOS_ORS_API_KEY, ORS_API_KEY or config.toml)")
    })?;
    let client =
        RouteClient::new(api_key, &config.ors_base_url).context("failed to create routing client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    runtime
        .block_on(client.directions(&[args.current, args.pickup, args.dropoff]))
        .context("routing failed")
}
