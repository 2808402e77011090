//! Control loop command.
//!
//! Ticks the resolver at a fixed rate the way the driving control loop
//! does, logging whenever the resolved outputs change.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use slc::params::keys;
use slc::{ParamStore, Resolution, SpeedLimitResolver};

use super::common::{format_speed, Stores};
use crate::error::CliError;

/// Upper bound on the loop rate.
const MAX_HZ: u32 = 100;

/// Run the control loop.
pub fn run(stores: &Stores, hz: u32, ticks: Option<u64>) -> Result<(), CliError> {
    if hz == 0 || hz > MAX_HZ {
        return Err(CliError::Usage(format!(
            "--hz must be between 1 and {}, got {}",
            MAX_HZ, hz
        )));
    }

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
        .map_err(|e| CliError::Signal(e.to_string()))?;

    let period = Duration::from_secs_f64(1.0 / hz as f64);
    let mut resolver = stores.resolver();
    let mut last: Option<Resolution> = None;
    let mut tick: u64 = 0;

    tracing::info!(hz = hz, "Speed limit control loop started");

    while running.load(Ordering::SeqCst) && ticks.map_or(true, |max| tick < max) {
        let started = Instant::now();

        let resolution = tick_once(stores, &mut resolver);
        if last != Some(resolution) {
            let units = resolver.config().units;
            tracing::info!(
                speed_limit = %format_speed(resolution.speed_limit, units),
                target = %format_speed(resolution.desired_speed_limit, units),
                origin = %resolution.origin,
                experimental_mode = resolution.experimental_mode,
                "Speed limit changed"
            );
            last = Some(resolution);
        }

        tick += 1;
        if let Some(remaining) = period.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    tracing::info!(ticks = tick, "Speed limit control loop stopped");
    Ok(())
}

/// One control loop iteration.
///
/// A raised settings flag is lowered before the settings are read, so an
/// edit landing after the reload raises it again for the next tick.
fn tick_once(stores: &Stores, resolver: &mut SpeedLimitResolver) -> Resolution {
    if stores.live.get_bool(keys::TOGGLES_UPDATED) {
        if let Err(e) = stores.live.put_bool(keys::TOGGLES_UPDATED, false) {
            tracing::warn!(error = %e, "Failed to clear settings flag");
        }
        resolver.refresh_config();
    }

    resolver.update_source_readings();
    resolver.evaluate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slc::{LimitOrigin, LimitSource};

    fn stores_in(dir: &tempfile::TempDir) -> Stores {
        let stores = Stores::open(Some(dir.path().join("params")), Some(dir.path().join("live")));
        stores.params.put("SLCPriority1", "Dashboard").unwrap();
        stores.params.put("SLCPriority2", "OfflineMaps").unwrap();
        stores
            .live
            .put_json_float(LimitSource::Dashboard.live_key(), 20.0)
            .unwrap();
        stores
            .live
            .put_json_float(LimitSource::OfflineMaps.live_key(), 31.0)
            .unwrap();
        stores
    }

    #[test]
    fn test_rejects_out_of_range_rate() {
        let dir = tempfile::TempDir::new().unwrap();
        let stores = stores_in(&dir);

        assert!(matches!(run(&stores, 0, Some(1)), Err(CliError::Usage(_))));
        assert!(matches!(
            run(&stores, MAX_HZ + 1, Some(1)),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn test_tick_reloads_and_lowers_flag() {
        let dir = tempfile::TempDir::new().unwrap();
        let stores = stores_in(&dir);
        let mut resolver = stores.resolver();

        assert_eq!(tick_once(&stores, &mut resolver).speed_limit, 20.0);

        stores.params.put("SLCPriority1", "Highest").unwrap();
        stores.live.put_bool(keys::TOGGLES_UPDATED, true).unwrap();

        let resolution = tick_once(&stores, &mut resolver);
        assert_eq!(resolution.speed_limit, 31.0);
        assert_eq!(resolution.origin, LimitOrigin::Highest);
        assert!(!stores.live.get_bool(keys::TOGGLES_UPDATED));
    }

    #[test]
    fn test_edit_after_reload_applies_next_tick() {
        let dir = tempfile::TempDir::new().unwrap();
        let stores = stores_in(&dir);
        let mut resolver = stores.resolver();

        stores.params.put("SLCPriority1", "Highest").unwrap();
        stores.live.put_bool(keys::TOGGLES_UPDATED, true).unwrap();
        assert_eq!(tick_once(&stores, &mut resolver).speed_limit, 31.0);

        // A second edit arriving once the first reload is done
        stores.params.put("SLCPriority1", "Lowest").unwrap();
        stores.live.put_bool(keys::TOGGLES_UPDATED, true).unwrap();

        let resolution = tick_once(&stores, &mut resolver);
        assert_eq!(resolution.speed_limit, 20.0);
        assert_eq!(resolution.origin, LimitOrigin::Lowest);
        assert!(!stores.live.get_bool(keys::TOGGLES_UPDATED));
    }

    #[test]
    fn test_flag_lowered_before_settings_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let stores = stores_in(&dir);
        let mut resolver = stores.resolver();

        stores.params.put("SLCPriority1", "Highest").unwrap();
        stores.live.put_bool(keys::TOGGLES_UPDATED, true).unwrap();
        tick_once(&stores, &mut resolver);

        // Reload happened and the flag is down, so nothing pending is hidden
        assert!(resolver.config().use_highest());
        assert!(!stores.live.get_bool(keys::TOGGLES_UPDATED));

        stores.params.put("SLCPriority1", "Dashboard").unwrap();
        assert_eq!(tick_once(&stores, &mut resolver).origin, LimitOrigin::Highest);

        stores.live.put_bool(keys::TOGGLES_UPDATED, true).unwrap();
        assert_eq!(
            tick_once(&stores, &mut resolver).origin,
            LimitOrigin::Source(LimitSource::Dashboard)
        );
    }

    #[test]
    fn test_run_stops_after_ticks() {
        let dir = tempfile::TempDir::new().unwrap();
        let stores = stores_in(&dir);
        stores.live.put_bool(keys::TOGGLES_UPDATED, true).unwrap();

        run(&stores, MAX_HZ, Some(3)).unwrap();

        assert!(!stores.live.get_bool(keys::TOGGLES_UPDATED));
        assert_eq!(stores.params.get_float("PreviousSpeedLimit"), 20.0);
    }
}
