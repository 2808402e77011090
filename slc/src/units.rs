//! Speed unit conversions and fixed speed thresholds.
//!
//! All speeds inside the resolver are meters/second. User-facing settings
//! (offsets, display) are km/h or mph depending on the configured unit
//! system and are converted once at load time.

/// Miles per hour to kilometers per hour.
pub const MPH_TO_KPH: f64 = 1.609344;

/// Kilometers per hour to meters per second.
pub const KPH_TO_MS: f64 = 1.0 / 3.6;

/// Miles per hour to meters per second.
pub const MPH_TO_MS: f64 = MPH_TO_KPH * KPH_TO_MS;

/// Meters per second to kilometers per hour.
pub const MS_TO_KPH: f64 = 3.6;

/// Meters per second to miles per hour.
pub const MS_TO_MPH: f64 = MS_TO_KPH / MPH_TO_KPH;

/// Minimum cruising speed (m/s).
///
/// Roughly the speed a car creeps at in drive without touching the pedals.
/// Speed limit readings at or below this are noise, not limits.
pub const CRUISING_SPEED: f64 = 5.0;

/// Unit system used for settings and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    /// km/h
    Metric,
    /// mph
    #[default]
    Imperial,
}

impl UnitSystem {
    /// Select the unit system from the `IsMetric` flag.
    pub fn from_is_metric(is_metric: bool) -> Self {
        if is_metric {
            UnitSystem::Metric
        } else {
            UnitSystem::Imperial
        }
    }

    /// Factor converting one display unit to meters/second.
    pub fn offset_conversion(&self) -> f64 {
        match self {
            UnitSystem::Metric => KPH_TO_MS,
            UnitSystem::Imperial => MPH_TO_MS,
        }
    }

    /// Convert a value in this unit system to meters/second.
    pub fn to_ms(&self, value: f64) -> f64 {
        value * self.offset_conversion()
    }

    /// Convert meters/second to this unit system.
    pub fn from_ms(&self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value * MS_TO_KPH,
            UnitSystem::Imperial => value * MS_TO_MPH,
        }
    }

    /// Short unit label.
    pub fn label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}
