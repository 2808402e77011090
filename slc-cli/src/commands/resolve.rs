//! One-shot resolution.

use console::style;
use serde_json::json;
use slc::{Resolution, SourceReadings, UnitSystem};

use super::common::{format_speed, Stores};
use crate::error::CliError;

/// Resolve once and print the outputs.
pub fn run(stores: &Stores, as_json: bool) -> Result<(), CliError> {
    let mut resolver = stores.resolver();
    resolver.update_source_readings();
    let resolution = resolver.evaluate();
    let units = resolver.config().units;

    if as_json {
        let output = json!({
            "readings": resolver.readings(),
            "resolution": resolution,
            "previous_limit": resolver.previous_limit(),
        });
        let text =
            serde_json::to_string_pretty(&output).map_err(|e| CliError::Output(e.to_string()))?;
        println!("{}", text);
    } else {
        print_readings(resolver.readings(), units);
        println!();
        print_resolution(&resolution, units);
    }

    Ok(())
}

fn print_readings(readings: &SourceReadings, units: UnitSystem) {
    println!("{}", style("Readings").bold());
    println!("  Dashboard:    {}", format_speed(readings.dashboard, units));
    println!("  Navigation:   {}", format_speed(readings.nav, units));
    println!("  Offline maps: {}", format_speed(readings.map, units));
}

/// Print a resolution in display units.
pub fn print_resolution(resolution: &Resolution, units: UnitSystem) {
    println!("{}", style("Resolution").bold());
    if resolution.speed_limit == 0.0 {
        println!("  Speed limit:  {}", style("unknown").yellow());
    } else {
        println!(
            "  Speed limit:  {} ({})",
            style(format_speed(resolution.speed_limit, units)).green(),
            resolution.origin
        );
        println!("  Offset:       {}", format_speed(resolution.offset, units));
        println!(
            "  Target speed: {}",
            format_speed(resolution.desired_speed_limit, units)
        );
    }
    if resolution.experimental_mode {
        println!("  {}", style("Deferring to experimental mode").cyan());
    }
}
