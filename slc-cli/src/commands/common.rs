//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use slc::units::{KPH_TO_MS, MPH_TO_MS};
use slc::{FileParamStore, LimitSource, ParamStore, SpeedLimitResolver, UnitSystem};

/// Speed limit source selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SourceArg {
    /// Dashboard sign recognition
    Dashboard,
    /// Navigation route
    Navigation,
    /// Offline map data
    OfflineMaps,
}

impl From<SourceArg> for LimitSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Dashboard => LimitSource::Dashboard,
            SourceArg::Navigation => LimitSource::Navigation,
            SourceArg::OfflineMaps => LimitSource::OfflineMaps,
        }
    }
}

/// Speed unit for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SpeedUnitArg {
    /// Meters per second
    Ms,
    /// Kilometers per hour
    Kph,
    /// Miles per hour
    Mph,
}

impl SpeedUnitArg {
    /// Convert a value in this unit to meters/second.
    pub fn to_ms(self, value: f64) -> f64 {
        match self {
            SpeedUnitArg::Ms => value,
            SpeedUnitArg::Kph => value * KPH_TO_MS,
            SpeedUnitArg::Mph => value * MPH_TO_MS,
        }
    }
}

/// The persistent and live stores selected on the command line.
pub struct Stores {
    pub params: Arc<FileParamStore>,
    pub live: Arc<FileParamStore>,
}

impl Stores {
    /// Open stores in the given directories, falling back to the defaults.
    pub fn open(params: Option<PathBuf>, live: Option<PathBuf>) -> Self {
        let params = params
            .map(|path| FileParamStore::new(path))
            .unwrap_or_else(FileParamStore::persistent);
        let live = live
            .map(|path| FileParamStore::new(path))
            .unwrap_or_else(FileParamStore::live);

        tracing::debug!(
            params = %params.path().display(),
            live = %live.path().display(),
            "Parameter stores"
        );

        Self {
            params: Arc::new(params),
            live: Arc::new(live),
        }
    }

    /// Build a resolver over these stores.
    pub fn resolver(&self) -> SpeedLimitResolver {
        SpeedLimitResolver::new(
            Arc::clone(&self.params) as Arc<dyn ParamStore>,
            Arc::clone(&self.live) as Arc<dyn ParamStore>,
        )
    }
}

/// Format a speed in m/s for display in the given unit system.
pub fn format_speed(value_ms: f64, units: UnitSystem) -> String {
    format!("{:.0} {}", units.from_ms(value_ms), units.label())
}
