//! Speed limit resolution.
//!
//! Decides which speed limit governs the vehicle's target speed from the
//! cached source readings and the loaded configuration.
//!
//! # Resolution Order
//!
//! ```text
//! 1. usable = readings strictly above CRUISING_SPEED
//! 2. first slot Highest and usable non-empty → max(usable)
//! 3. first slot Lowest  and usable non-empty → min(usable)
//! 4. first usable source in priority order   → that reading
//!                                              (remembered as previous limit)
//! 5. fallback PreviousLimit                   → remembered previous limit
//! 6. otherwise                                → 0 (no limit known)
//! ```
//!
//! Only step 4 updates the previous limit, and every change is persisted
//! immediately so it survives restarts.
//!
//! # Usage
//!
//! ```ignore
//! let mut resolver = SpeedLimitResolver::new(params, live);
//!
//! // Once per control cycle
//! resolver.update_source_readings();
//! let resolution = resolver.evaluate();
//! if resolution.experimental_mode {
//!     // hand speed limit control to experimental mode
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{FallbackMode, SlcConfig};
use crate::params::{keys, ParamStore, ParamsResult};
use crate::source::{LimitSource, SourceReadings};

/// Which branch of the resolution produced the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitOrigin {
    /// Highest usable reading.
    Highest,
    /// Lowest usable reading.
    Lowest,
    /// First usable source in the priority list.
    Source(LimitSource),
    /// Remembered previous limit (fallback).
    PreviousLimit,
    /// Nothing known.
    None,
}

impl fmt::Display for LimitOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitOrigin::Highest => write!(f, "highest"),
            LimitOrigin::Lowest => write!(f, "lowest"),
            LimitOrigin::Source(source) => write!(f, "{}", source),
            LimitOrigin::PreviousLimit => write!(f, "previous limit"),
            LimitOrigin::None => write!(f, "none"),
        }
    }
}

/// Outputs of one evaluation, all derived from a single resolved limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    /// Effective speed limit (m/s), `0` when unknown.
    pub speed_limit: f64,
    /// Offset for the limit's band (m/s).
    pub offset: f64,
    /// Target speed: limit plus offset, or `0` when the limit is unknown.
    pub desired_speed_limit: f64,
    /// Whether the control loop should defer to experimental mode.
    pub experimental_mode: bool,
    /// Branch that produced the limit.
    pub origin: LimitOrigin,
}

/// Resolves the active speed limit once per control cycle.
///
/// Owned by the control loop; all state is private to the instance.
pub struct SpeedLimitResolver {
    /// Persistent store: settings and the previous limit.
    params: Arc<dyn ParamStore>,

    /// Volatile store shared with the processes publishing readings.
    live: Arc<dyn ParamStore>,

    readings: SourceReadings,
    config: SlcConfig,

    /// Last limit chosen through the priority list (m/s).
    previous_limit: f64,
}

impl SpeedLimitResolver {
    /// Create a resolver and load its configuration.
    ///
    /// Readings start at zero until the first [`update_source_readings`].
    ///
    /// [`update_source_readings`]: Self::update_source_readings
    pub fn new(params: Arc<dyn ParamStore>, live: Arc<dyn ParamStore>) -> Self {
        let mut resolver = Self {
            params,
            live,
            readings: SourceReadings::default(),
            config: SlcConfig::default(),
            previous_limit: 0.0,
        };
        resolver.refresh_config();
        resolver
    }

    /// Current cached readings.
    pub fn readings(&self) -> &SourceReadings {
        &self.readings
    }

    /// Current configuration.
    pub fn config(&self) -> &SlcConfig {
        &self.config
    }

    /// Remembered previous limit (m/s).
    pub fn previous_limit(&self) -> f64 {
        self.previous_limit
    }

    /// Replace the configuration without touching the store.
    ///
    /// The next settings-changed refresh reloads from the store again.
    pub fn set_config(&mut self, config: SlcConfig) {
        self.config = config;
    }

    /// Refresh the cached readings from the live store.
    ///
    /// Each reading is read on its own; absent or malformed values become
    /// `0`. When the settings-changed flag is raised the configuration is
    /// reloaded before returning. The flag itself is left for the control
    /// loop to clear.
    pub fn update_source_readings(&mut self) {
        for source in LimitSource::ALL {
            let value = read_limit(self.live.as_ref(), source.live_key());
            self.readings.set(source, value);
        }

        if self.live.get_bool(keys::TOGGLES_UPDATED) {
            self.refresh_config();
        }
    }

    /// Reload configuration and the previous limit from the persistent store.
    pub fn refresh_config(&mut self) {
        self.config = SlcConfig::load(self.params.as_ref());
        self.previous_limit = sanitize(self.params.get_float(keys::PREVIOUS_SPEED_LIMIT));

        tracing::info!(
            config = %self.config.summary(),
            previous_limit = self.previous_limit,
            "Speed limit controller settings loaded"
        );
    }

    /// Resolve the effective speed limit (m/s), `0` when unknown.
    pub fn resolve(&mut self) -> f64 {
        self.resolve_with_origin().0
    }

    /// Resolve the effective speed limit and report which branch chose it.
    pub fn resolve_with_origin(&mut self) -> (f64, LimitOrigin) {
        if self.config.use_highest() {
            if let Some(limit) = self.readings.highest() {
                return (limit, LimitOrigin::Highest);
            }
        } else if self.config.use_lowest() {
            if let Some(limit) = self.readings.lowest() {
                return (limit, LimitOrigin::Lowest);
            }
        }

        let winner = self
            .config
            .priority_sources()
            .find(|source| self.readings.is_usable(*source));

        if let Some(source) = winner {
            let limit = self.readings.get(source);
            self.update_previous_limit(limit);
            return (limit, LimitOrigin::Source(source));
        }

        match self.config.fallback {
            FallbackMode::PreviousLimit => (self.previous_limit, LimitOrigin::PreviousLimit),
            FallbackMode::None | FallbackMode::ExperimentalMode => (0.0, LimitOrigin::None),
        }
    }

    /// Offset for a limit's band (m/s).
    pub fn offset_for(&self, limit: f64) -> f64 {
        self.config.offsets.offset_for(limit)
    }

    /// Resolve once and derive every output from that value.
    pub fn evaluate(&mut self) -> Resolution {
        let (speed_limit, origin) = self.resolve_with_origin();
        let offset = self.offset_for(speed_limit);
        let known = speed_limit != 0.0;

        Resolution {
            speed_limit,
            offset,
            desired_speed_limit: if known { speed_limit + offset } else { 0.0 },
            experimental_mode: !known && self.config.fallback == FallbackMode::ExperimentalMode,
            origin,
        }
    }

    /// Effective speed limit (m/s).
    pub fn speed_limit(&mut self) -> f64 {
        self.evaluate().speed_limit
    }

    /// Offset for the effective speed limit (m/s).
    pub fn offset(&mut self) -> f64 {
        self.evaluate().offset
    }

    /// Effective speed limit plus offset, `0` when the limit is unknown.
    pub fn desired_speed_limit(&mut self) -> f64 {
        self.evaluate().desired_speed_limit
    }

    /// Whether the control loop should defer to experimental mode.
    pub fn experimental_mode(&mut self) -> bool {
        self.evaluate().experimental_mode
    }

    /// Replace one cached reading (m/s). Negative or non-finite values are
    /// stored as `0`.
    pub fn set_reading(&mut self, source: LimitSource, value: f64) {
        self.readings.set(source, sanitize(value));
    }

    /// Publish one cached reading to the live store.
    pub fn publish_reading(&self, source: LimitSource) -> ParamsResult<()> {
        self.live
            .put_json_float(source.live_key(), self.readings.get(source))
    }

    /// Publish every cached reading to the live store.
    pub fn publish_readings(&self) -> ParamsResult<()> {
        for source in LimitSource::ALL {
            self.publish_reading(source)?;
        }
        Ok(())
    }

    fn update_previous_limit(&mut self, limit: f64) {
        if self.previous_limit == limit {
            return;
        }

        if let Err(e) = self.params.put_float(keys::PREVIOUS_SPEED_LIMIT, limit) {
            tracing::warn!(error = %e, limit = limit, "Failed to persist previous speed limit");
        }

        tracing::debug!(
            from = self.previous_limit,
            to = limit,
            "Previous speed limit updated"
        );
        self.previous_limit = limit;
    }
}

impl fmt::Debug for SpeedLimitResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeedLimitResolver")
            .field("readings", &self.readings)
            .field("config", &self.config)
            .field("previous_limit", &self.previous_limit)
            .finish_non_exhaustive()
    }
}

/// Read a JSON-encoded speed, treating anything unusable as `0`.
fn read_limit(store: &dyn ParamStore, key: &str) -> f64 {
    let value = store.get_json_float(key);
    let sanitized = sanitize(value);
    if sanitized != value {
        tracing::debug!(key = key, value = value, "Discarding invalid speed reading");
    }
    sanitized
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}
