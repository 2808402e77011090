//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path`
//! commands for the persistent settings store. `config set` also raises the
//! settings-changed flag so a running control loop reloads.

use std::str::FromStr;

use clap::Subcommand;
use slc::params::keys;
use slc::{FallbackMode, ParamStore, PriorityEntry};

use super::common::Stores;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., SLCPriority1)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., SLCPriority1)
        key: String,

        /// Value to set (`none` clears a priority slot)
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// A user-editable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    IsMetric,
    Offset(usize),
    Priority(usize),
    Fallback,
    PreviousSpeedLimit,
}

impl ConfigKey {
    /// Every key, in listing order.
    pub fn all() -> Vec<ConfigKey> {
        keys::CONFIG_KEYS
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }

    /// Parameter name in the store.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::IsMetric => keys::IS_METRIC,
            ConfigKey::Offset(i) => keys::OFFSET_KEYS[*i],
            ConfigKey::Priority(i) => keys::PRIORITY_KEYS[*i],
            ConfigKey::Fallback => keys::SLC_FALLBACK,
            ConfigKey::PreviousSpeedLimit => keys::PREVIOUS_SPEED_LIMIT,
        }
    }

    /// Hint describing accepted values.
    pub fn hint(&self) -> &'static str {
        match self {
            ConfigKey::IsMetric => "true/false",
            ConfigKey::Offset(_) => "whole km/h or mph",
            ConfigKey::Priority(_) => "Dashboard, Navigation, OfflineMaps, Highest, Lowest, none",
            ConfigKey::Fallback => "none, experimental, previous (or 0/1/2)",
            ConfigKey::PreviousSpeedLimit => "m/s",
        }
    }

    /// Validate a user value and return the form stored in the params store.
    ///
    /// `Ok(None)` means the key should be removed; only priority slots can be
    /// cleared, with `none` or an empty value.
    pub fn normalize(&self, value: &str) -> Result<Option<String>, String> {
        let value = value.trim();
        if let ConfigKey::Priority(_) = self {
            if value.is_empty() || value.eq_ignore_ascii_case("none") {
                return Ok(None);
            }
        }
        self.normalize_value(value).map(Some)
    }

    fn normalize_value(&self, value: &str) -> Result<String, String> {
        match self {
            ConfigKey::IsMetric => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" | "metric" => Ok("1".to_string()),
                "0" | "false" | "no" | "off" | "imperial" => Ok("0".to_string()),
                _ => Err(format!("expected true or false, got '{}'", value)),
            },
            ConfigKey::Offset(_) => value
                .parse::<i64>()
                .map(|v| v.to_string())
                .map_err(|_| format!("expected a whole number, got '{}'", value)),
            ConfigKey::Priority(_) => value
                .parse::<PriorityEntry>()
                .map(|entry| entry.to_string()),
            ConfigKey::Fallback => {
                let mode = match value.to_ascii_lowercase().as_str() {
                    "0" | "none" => FallbackMode::None,
                    "1" | "experimental" | "experimental-mode" => FallbackMode::ExperimentalMode,
                    "2" | "previous" | "previous-limit" => FallbackMode::PreviousLimit,
                    _ => return Err(format!("unknown fallback mode '{}'", value)),
                };
                Ok(mode.to_param().to_string())
            }
            ConfigKey::PreviousSpeedLimit => match value.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Ok(v.to_string()),
                _ => Err(format!("expected a non-negative speed, got '{}'", value)),
            },
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == keys::IS_METRIC {
            return Ok(ConfigKey::IsMetric);
        }
        if s == keys::SLC_FALLBACK {
            return Ok(ConfigKey::Fallback);
        }
        if s == keys::PREVIOUS_SPEED_LIMIT {
            return Ok(ConfigKey::PreviousSpeedLimit);
        }
        if let Some(i) = keys::OFFSET_KEYS.iter().position(|k| *k == s) {
            return Ok(ConfigKey::Offset(i));
        }
        if let Some(i) = keys::PRIORITY_KEYS.iter().position(|k| *k == s) {
            return Ok(ConfigKey::Priority(i));
        }
        Err(())
    }
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, stores: &Stores) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(stores, &key),
        ConfigCommands::Set { key, value } => run_set(stores, &key, &value),
        ConfigCommands::List => run_list(stores),
        ConfigCommands::Path => run_path(stores),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'slc config list' to see available keys.",
            key
        ))
    })
}

/// Get a configuration value.
fn run_get(stores: &Stores, key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    match stores.params.get(config_key.name()) {
        Some(value) if !value.is_empty() => println!("{}", value),
        _ => println!("(not set)"),
    }

    Ok(())
}

/// Set a configuration value.
fn run_set(stores: &Stores, key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let normalized = config_key.normalize(value).map_err(|e| {
        CliError::Config(format!(
            "Invalid value for {}: {} (expected {})",
            config_key.name(),
            e,
            config_key.hint()
        ))
    })?;

    match &normalized {
        Some(value) => stores.params.put(config_key.name(), value)?,
        None => stores.params.remove(config_key.name())?,
    }
    stores.live.put_bool(keys::TOGGLES_UPDATED, true)?;

    match normalized {
        Some(value) => println!("Set {} = {}", config_key.name(), value),
        None => println!("Cleared {}", config_key.name()),
    }

    Ok(())
}

/// List all configuration settings.
fn run_list(stores: &Stores) -> Result<(), CliError> {
    println!("Speed Limit Controller Settings");
    println!("===============================");
    println!();

    for key in ConfigKey::all() {
        match stores.params.get(key.name()) {
            Some(value) if !value.is_empty() => println!("  {} = {}", key.name(), value),
            _ => println!("  {} = (not set)", key.name()),
        }
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path(stores: &Stores) -> Result<(), CliError> {
    println!("{}", stores.params.path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_parse() {
        let all = ConfigKey::all();
        assert_eq!(all.len(), keys::CONFIG_KEYS.len());
        for key in all {
            assert_eq!(key.name().parse::<ConfigKey>(), Ok(key));
        }
    }

    #[test]
    fn test_unknown_key() {
        assert!("CarSpeedLimit".parse::<ConfigKey>().is_err());
        assert!(parse_key("Offset5").is_err());
    }

    #[test]
    fn test_normalize_values() {
        assert_eq!(ConfigKey::IsMetric.normalize("true"), Ok(Some("1".to_string())));
        assert_eq!(ConfigKey::IsMetric.normalize("imperial"), Ok(Some("0".to_string())));
        assert!(ConfigKey::IsMetric.normalize("maybe").is_err());

        assert_eq!(ConfigKey::Offset(0).normalize(" -3 "), Ok(Some("-3".to_string())));
        assert!(ConfigKey::Offset(0).normalize("2.5").is_err());

        assert_eq!(
            ConfigKey::Priority(2).normalize("Offline Maps"),
            Ok(Some("OfflineMaps".to_string()))
        );
        assert!(ConfigKey::Priority(0).normalize("Fastest").is_err());
        assert_eq!(ConfigKey::Priority(1).normalize("none"), Ok(None));
        assert_eq!(ConfigKey::Priority(1).normalize(" "), Ok(None));
        assert!(ConfigKey::Offset(1).normalize("none").is_err());
        assert!(ConfigKey::Fallback.normalize("").is_err());

        assert_eq!(ConfigKey::Fallback.normalize("previous"), Ok(Some("2".to_string())));
        assert_eq!(ConfigKey::Fallback.normalize("1"), Ok(Some("1".to_string())));
        assert!(ConfigKey::Fallback.normalize("3").is_err());

        assert_eq!(
            ConfigKey::PreviousSpeedLimit.normalize("20.5"),
            Ok(Some("20.5".to_string()))
        );
        assert!(ConfigKey::PreviousSpeedLimit.normalize("-1").is_err());
    }

    #[test]
    fn test_set_raises_settings_flag() {
        let dir = tempfile::TempDir::new().unwrap();
        let stores = Stores::open(
            Some(dir.path().join("params")),
            Some(dir.path().join("live")),
        );

        run_set(&stores, "SLCFallback", "experimental").unwrap();

        assert_eq!(stores.params.get_int(keys::SLC_FALLBACK), 1);
        assert!(stores.live.get_bool(keys::TOGGLES_UPDATED));
    }

    #[test]
    fn test_set_none_clears_priority_slot() {
        let dir = tempfile::TempDir::new().unwrap();
        let stores = Stores::open(Some(dir.path().join("params")), Some(dir.path().join("live")));

        run_set(&stores, "SLCPriority2", "Navigation").unwrap();
        stores.live.put_bool(keys::TOGGLES_UPDATED, false).unwrap();

        run_set(&stores, "SLCPriority2", "none").unwrap();
        assert!(stores.params.get("SLCPriority2").is_none());
        assert!(stores.live.get_bool(keys::TOGGLES_UPDATED));

        run_set(&stores, "SLCPriority1", "Dashboard").unwrap();
        run_set(&stores, "SLCPriority1", "").unwrap();
        assert!(stores.params.get("SLCPriority1").is_none());

        let resolver = stores.resolver();
        assert_eq!(resolver.config().priorities, [None, None, None]);
    }

    #[test]
    fn test_set_rejects_invalid_value() {
        let dir = tempfile::TempDir::new().unwrap();
        let stores = Stores::open(
            Some(dir.path().join("params")),
            Some(dir.path().join("live")),
        );

        let err = run_set(&stores, "Offset1", "fast").unwrap_err();
        assert!(err.to_string().contains("Offset1"));
        assert!(stores.params.get("Offset1").is_none());
        assert!(!stores.live.get_bool(keys::TOGGLES_UPDATED));
    }
}
