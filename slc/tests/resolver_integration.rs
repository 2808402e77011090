//! Integration tests for the speed limit resolver.
//!
//! These tests drive the resolver through file-backed stores the way a
//! deployed control loop does:
//! - settings and the previous limit in a persistent per-key file store
//! - readings published by other processes into a live per-key file store
//! - settings reloads triggered by the settings-changed flag
//!
//! Run with: `cargo test --test resolver_integration`

use std::sync::Arc;

use tempfile::TempDir;

use slc::params::keys;
use slc::{FileParamStore, LimitOrigin, LimitSource, ParamStore, SpeedLimitResolver};

// ============================================================================
// Helper Functions
// ============================================================================

/// Persistent and live stores rooted in a temp dir.
struct Stores {
    _dir: TempDir,
    params: Arc<FileParamStore>,
    live: Arc<FileParamStore>,
}

impl Stores {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let params = Arc::new(FileParamStore::new(dir.path().join("config/params")));
        let live = Arc::new(FileParamStore::new(dir.path().join("shm/live")));
        Self {
            _dir: dir,
            params,
            live,
        }
    }

    /// A fresh resolver, as after a process restart.
    fn resolver(&self) -> SpeedLimitResolver {
        SpeedLimitResolver::new(
            Arc::clone(&self.params) as Arc<dyn ParamStore>,
            Arc::clone(&self.live) as Arc<dyn ParamStore>,
        )
    }

    fn set(&self, key: &str, value: &str) {
        self.params.put(key, value).expect("write setting");
    }

    fn publish(&self, source: LimitSource, value: f64) {
        self.live
            .put_json_float(source.live_key(), value)
            .expect("publish reading");
    }
}

/// Settings used by most scenarios: metric offsets 0/4/7/11 km/h.
fn standard_settings(stores: &Stores) {
    stores.set(keys::IS_METRIC, "1");
    stores.set("Offset1", "0");
    stores.set("Offset2", "4");
    stores.set("Offset3", "7");
    stores.set("Offset4", "11");
    stores.set("SLCPriority1", "Dashboard");
    stores.set("SLCPriority2", "Navigation");
    stores.set("SLCPriority3", "OfflineMaps");
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Dashboard reading in band 2 gets the band 2 offset.
#[test]
fn test_dashboard_limit_with_offset() {
    let stores = Stores::new();
    standard_settings(&stores);
    stores.publish(LimitSource::Dashboard, 20.0);

    let mut resolver = stores.resolver();
    resolver.update_source_readings();
    let resolution = resolver.evaluate();

    assert_eq!(resolution.speed_limit, 20.0);
    assert!((resolution.offset - 4.0 / 3.6).abs() < 1e-9);
    assert!((resolution.desired_speed_limit - (20.0 + 4.0 / 3.6)).abs() < 1e-9);
    assert_eq!(resolution.origin, LimitOrigin::Source(LimitSource::Dashboard));
}

/// The previous limit survives a restart and is used as the fallback.
#[test]
fn test_previous_limit_survives_restart() {
    let stores = Stores::new();
    standard_settings(&stores);
    stores.set(keys::SLC_FALLBACK, "2");

    {
        let mut resolver = stores.resolver();
        stores.publish(LimitSource::OfflineMaps, 26.8224);
        resolver.update_source_readings();
        assert_eq!(resolver.speed_limit(), 26.8224);
    }

    // Restart: map reading is gone
    stores.publish(LimitSource::OfflineMaps, 0.0);
    let mut resolver = stores.resolver();
    assert_eq!(resolver.previous_limit(), 26.8224);

    resolver.update_source_readings();
    let resolution = resolver.evaluate();
    assert_eq!(resolution.speed_limit, 26.8224);
    assert_eq!(resolution.origin, LimitOrigin::PreviousLimit);
    assert!(!resolution.experimental_mode);
}

/// Experimental mode is requested only while nothing is known.
#[test]
fn test_experimental_mode_handoff() {
    let stores = Stores::new();
    standard_settings(&stores);
    stores.set(keys::SLC_FALLBACK, "1");

    let mut resolver = stores.resolver();
    resolver.update_source_readings();
    let resolution = resolver.evaluate();
    assert_eq!(resolution.speed_limit, 0.0);
    assert_eq!(resolution.desired_speed_limit, 0.0);
    assert!(resolution.experimental_mode);

    stores.publish(LimitSource::Navigation, 13.4);
    resolver.update_source_readings();
    let resolution = resolver.evaluate();
    assert_eq!(resolution.speed_limit, 13.4);
    assert!(!resolution.experimental_mode);
}

/// Settings edits apply only once the settings-changed flag is raised.
#[test]
fn test_settings_reload_on_flag() {
    let stores = Stores::new();
    standard_settings(&stores);
    stores.publish(LimitSource::Dashboard, 20.0);
    stores.publish(LimitSource::OfflineMaps, 31.0);

    let mut resolver = stores.resolver();
    resolver.update_source_readings();
    assert_eq!(resolver.speed_limit(), 20.0);

    stores.set("SLCPriority1", "Highest");
    resolver.update_source_readings();
    assert_eq!(resolver.speed_limit(), 20.0);

    stores.live.put_bool(keys::TOGGLES_UPDATED, true).unwrap();
    resolver.update_source_readings();
    let resolution = resolver.evaluate();
    assert_eq!(resolution.speed_limit, 31.0);
    assert_eq!(resolution.origin, LimitOrigin::Highest);

    // Highest does not overwrite the remembered limit from the priority path
    assert_eq!(stores.params.get_float(keys::PREVIOUS_SPEED_LIMIT), 20.0);
}

/// Readings published by one resolver are seen by another.
#[test]
fn test_published_readings_reach_consumer() {
    let stores = Stores::new();
    standard_settings(&stores);

    let mut publisher = stores.resolver();
    publisher.set_reading(LimitSource::Navigation, 24.6);
    publisher.publish_reading(LimitSource::Navigation).unwrap();

    let mut consumer = stores.resolver();
    consumer.update_source_readings();
    assert_eq!(consumer.readings().nav, 24.6);
    assert_eq!(consumer.speed_limit(), 24.6);
}

/// A malformed live value reads as "no reading" rather than failing.
#[test]
fn test_malformed_live_value_is_absence() {
    let stores = Stores::new();
    standard_settings(&stores);
    stores.set(keys::SLC_FALLBACK, "1");
    stores.publish(LimitSource::Dashboard, 20.0);

    std::fs::write(stores.live.path().join(keys::CAR_SPEED_LIMIT), "garbage").unwrap();

    let mut resolver = stores.resolver();
    resolver.update_source_readings();
    assert_eq!(resolver.speed_limit(), 0.0);
    assert!(resolver.experimental_mode());
}

/// Settings written by one process and limits remembered by another land in
/// the same persistent store without clobbering each other.
#[test]
fn test_settings_writer_and_resolver_share_store() {
    let stores = Stores::new();
    standard_settings(&stores);
    stores.publish(LimitSource::Dashboard, 20.0);

    let settings = FileParamStore::new(stores.params.path());
    let writer = std::thread::spawn(move || {
        for value in 0..100 {
            settings.put_int("Offset4", value).expect("write setting");
        }
    });

    let mut resolver = stores.resolver();
    for _ in 0..100 {
        resolver.update_source_readings();
    }
    writer.join().expect("writer thread");

    assert_eq!(stores.params.get_float(keys::PREVIOUS_SPEED_LIMIT), 20.0);
    assert_eq!(stores.params.get_int("Offset4"), 99);
    assert_eq!(stores.params.get("SLCPriority1").as_deref(), Some("Dashboard"));
}
