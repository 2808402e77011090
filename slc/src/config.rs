//! Speed limit controller configuration.
//!
//! Settings live in the persistent parameter store and are reloaded only
//! when the settings-changed flag is raised, never on every control cycle.
//!
//! # Parameters
//!
//! | Key | Type | Meaning |
//! |-----|------|---------|
//! | `IsMetric` | bool | offsets are km/h (`1`) or mph (`0`) |
//! | `Offset1`..`Offset4` | int | offset per band, whole km/h or mph |
//! | `SLCPriority1`..`SLCPriority3` | string | `Dashboard`, `Navigation`, `OfflineMaps`, `Highest`, `Lowest` |
//! | `SLCFallback` | int | `0` none, `1` experimental mode, `2` previous limit |

use crate::offset::OffsetBands;
use crate::params::{keys, ParamStore};
use crate::source::LimitSource;
use crate::units::UnitSystem;

/// One slot of the priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityEntry {
    /// Use this source's reading if usable.
    Source(LimitSource),
    /// Use the highest usable reading (only honored in the first slot).
    Highest,
    /// Use the lowest usable reading (only honored in the first slot).
    Lowest,
}

impl std::fmt::Display for PriorityEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityEntry::Source(source) => write!(f, "{}", source),
            PriorityEntry::Highest => write!(f, "Highest"),
            PriorityEntry::Lowest => write!(f, "Lowest"),
        }
    }
}

impl std::str::FromStr for PriorityEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Highest" => Ok(Self::Highest),
            "Lowest" => Ok(Self::Lowest),
            other => other.parse().map(Self::Source),
        }
    }
}

/// Behavior when no source reports a usable limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackMode {
    /// Report no limit.
    #[default]
    None,
    /// Report no limit and ask the control loop to hand over to
    /// experimental mode.
    ExperimentalMode,
    /// Keep enforcing the last limit chosen through the priority list.
    PreviousLimit,
}

impl FallbackMode {
    /// Decode the `SLCFallback` parameter. Unknown values mean `None`.
    pub fn from_param(value: i64) -> Self {
        match value {
            1 => FallbackMode::ExperimentalMode,
            2 => FallbackMode::PreviousLimit,
            _ => FallbackMode::None,
        }
    }

    /// Encode as the `SLCFallback` parameter.
    pub fn to_param(&self) -> i64 {
        match self {
            FallbackMode::None => 0,
            FallbackMode::ExperimentalMode => 1,
            FallbackMode::PreviousLimit => 2,
        }
    }
}

impl std::fmt::Display for FallbackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackMode::None => write!(f, "none"),
            FallbackMode::ExperimentalMode => write!(f, "experimental-mode"),
            FallbackMode::PreviousLimit => write!(f, "previous-limit"),
        }
    }
}

/// Resolved configuration of the speed limit controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SlcConfig {
    /// Unit system the offsets were entered in.
    pub units: UnitSystem,

    /// Offsets per band, already converted to m/s.
    pub offsets: OffsetBands,

    /// Priority slots in order. Unknown or missing tokens leave a slot empty.
    pub priorities: [Option<PriorityEntry>; 3],

    /// Fallback when nothing usable is reported.
    pub fallback: FallbackMode,
}

impl Default for SlcConfig {
    fn default() -> Self {
        Self {
            units: UnitSystem::default(),
            offsets: OffsetBands::default(),
            priorities: LimitSource::ALL.map(|source| Some(PriorityEntry::Source(source))),
            fallback: FallbackMode::None,
        }
    }
}

impl SlcConfig {
    /// Load configuration from the persistent store.
    ///
    /// Missing or malformed values fall back to zero/empty; this never fails.
    pub fn load(params: &dyn ParamStore) -> Self {
        let units = UnitSystem::from_is_metric(params.get_bool(keys::IS_METRIC));
        let settings = keys::OFFSET_KEYS.map(|key| params.get_int(key));
        let offsets = OffsetBands::from_settings(settings, units);

        let priorities = keys::PRIORITY_KEYS.map(|key| {
            let token = params.get(key)?;
            match token.parse::<PriorityEntry>() {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(key = key, error = %e, "Ignoring priority slot");
                    None
                }
            }
        });

        let fallback = FallbackMode::from_param(params.get_int(keys::SLC_FALLBACK));

        Self {
            units,
            offsets,
            priorities,
            fallback,
        }
    }

    /// Whether the first slot asks for the highest usable reading.
    pub fn use_highest(&self) -> bool {
        self.priorities[0] == Some(PriorityEntry::Highest)
    }

    /// Whether the first slot asks for the lowest usable reading.
    pub fn use_lowest(&self) -> bool {
        self.priorities[0] == Some(PriorityEntry::Lowest)
    }

    /// Sources named in the priority list, in order.
    ///
    /// `Highest`/`Lowest` and empty slots are skipped.
    pub fn priority_sources(&self) -> impl Iterator<Item = LimitSource> + '_ {
        self.priorities.iter().filter_map(|entry| match entry {
            Some(PriorityEntry::Source(source)) => Some(*source),
            _ => None,
        })
    }

    /// Replace the priority slots.
    pub fn with_priorities(mut self, priorities: [Option<PriorityEntry>; 3]) -> Self {
        self.priorities = priorities;
        self
    }

    /// Set the offsets (m/s).
    pub fn with_offsets(mut self, offsets: [f64; 4]) -> Self {
        self.offsets = OffsetBands::new(offsets);
        self
    }

    /// Set the fallback mode.
    pub fn with_fallback(mut self, fallback: FallbackMode) -> Self {
        self.fallback = fallback;
        self
    }

    /// Short single-line description for logs.
    pub fn summary(&self) -> String {
        let priorities: Vec<String> = self
            .priorities
            .iter()
            .map(|entry| match entry {
                Some(e) => e.to_string(),
                None => "-".to_string(),
            })
            .collect();
        format!(
            "priorities=[{}] fallback={} units={}",
            priorities.join(", "),
            self.fallback,
            self.units
        )
    }
}
