//! Speed limit sources and their live readings.

use serde::Serialize;

use crate::params::keys;
use crate::units::CRUISING_SPEED;

/// A speed limit source.
///
/// The set is fixed; configuration tokens are parsed into it once at load
/// time so lookups during resolution are a plain `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LimitSource {
    /// Sign recognition reported by the car's own dashboard.
    Dashboard,
    /// Active navigation route.
    Navigation,
    /// Downloaded offline map data.
    OfflineMaps,
}

impl LimitSource {
    /// All sources in the default priority order.
    pub const ALL: [LimitSource; 3] = [
        LimitSource::Dashboard,
        LimitSource::Navigation,
        LimitSource::OfflineMaps,
    ];

    /// Live store key the source's reading is published under.
    pub fn live_key(&self) -> &'static str {
        match self {
            LimitSource::Dashboard => keys::CAR_SPEED_LIMIT,
            LimitSource::Navigation => keys::NAV_SPEED_LIMIT,
            LimitSource::OfflineMaps => keys::MAP_SPEED_LIMIT,
        }
    }

    /// Configuration token for this source.
    pub fn token(&self) -> &'static str {
        match self {
            LimitSource::Dashboard => "Dashboard",
            LimitSource::Navigation => "Navigation",
            LimitSource::OfflineMaps => "OfflineMaps",
        }
    }
}

impl std::fmt::Display for LimitSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl std::str::FromStr for LimitSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dashboard" => Ok(Self::Dashboard),
            "Navigation" => Ok(Self::Navigation),
            // Older settings spell it with a space
            "OfflineMaps" | "Offline Maps" => Ok(Self::OfflineMaps),
            other => Err(format!("unknown speed limit source '{}'", other)),
        }
    }
}

/// Cached readings of every source (m/s, `0` meaning no reading).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SourceReadings {
    /// Dashboard reading.
    pub dashboard: f64,
    /// Offline map reading.
    pub map: f64,
    /// Navigation reading.
    pub nav: f64,
}

impl SourceReadings {
    /// Create readings from explicit values.
    pub fn new(dashboard: f64, map: f64, nav: f64) -> Self {
        Self { dashboard, map, nav }
    }

    /// Reading for a source.
    pub fn get(&self, source: LimitSource) -> f64 {
        match source {
            LimitSource::Dashboard => self.dashboard,
            LimitSource::Navigation => self.nav,
            LimitSource::OfflineMaps => self.map,
        }
    }

    /// Replace the reading for a source.
    pub fn set(&mut self, source: LimitSource, value: f64) {
        match source {
            LimitSource::Dashboard => self.dashboard = value,
            LimitSource::Navigation => self.nav = value,
            LimitSource::OfflineMaps => self.map = value,
        }
    }

    /// Whether a source currently reports a usable limit.
    pub fn is_usable(&self, source: LimitSource) -> bool {
        is_usable(self.get(source))
    }

    /// Readings above the cruising threshold.
    pub fn usable(&self) -> impl Iterator<Item = f64> + '_ {
        [self.dashboard, self.map, self.nav]
            .into_iter()
            .filter(|limit| is_usable(*limit))
    }

    /// Highest usable reading.
    pub fn highest(&self) -> Option<f64> {
        self.usable().reduce(f64::max)
    }

    /// Lowest usable reading.
    pub fn lowest(&self) -> Option<f64> {
        self.usable().reduce(f64::min)
    }
}

/// A reading is usable when it is strictly above the cruising threshold.
pub fn is_usable(limit: f64) -> bool {
    limit > CRUISING_SPEED
}
