//! Key/value parameter stores.
//!
//! The resolver talks to two external stores through the same seam:
//!
//! - the **persistent store** holding user settings and the remembered
//!   previous speed limit, and
//! - the **live store**, a volatile store shared between processes where
//!   detectors publish the current speed limit readings.
//!
//! # Design Principles
//!
//! - **String values**: every value is stored as text, typed accessors parse
//!   on read
//! - **Default on missing**: typed reads never fail, absent or malformed
//!   values read as the type's zero value
//! - **Shared by reference**: methods take `&self` and stores lock
//!   internally, so one store can sit behind an `Arc` for several owners
//!
//! # Example
//!
//! ```
//! use slc::params::{keys, MemoryParamStore, ParamStore};
//!
//! let store = MemoryParamStore::new();
//! assert_eq!(store.get_int(keys::OFFSET_KEYS[0]), 0);
//!
//! store.put_int(keys::OFFSET_KEYS[0], 5).unwrap();
//! assert_eq!(store.get_int(keys::OFFSET_KEYS[0]), 5);
//! ```

mod file;
pub mod keys;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use file::{default_live_path, default_params_path, FileParamStore};
pub use memory::MemoryParamStore;

/// Errors raised by explicit store writes.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// I/O error writing or removing a key file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot name an entry in the store.
    #[error("Invalid parameter key '{key}'")]
    InvalidKey { key: String },

    /// A value could not be encoded for storage.
    #[error("Failed to encode value for {key}: {reason}")]
    Encode { key: String, reason: String },
}

/// Result type for store writes.
pub type ParamsResult<T> = Result<T, ParamsError>;

/// Key/value store interface.
///
/// Implementors provide raw string access; the typed accessors are provided
/// on top and follow the default-on-missing policy.
pub trait ParamStore: Send + Sync {
    /// Raw value for `key`, `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a raw value.
    fn put(&self, key: &str, value: &str) -> ParamsResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> ParamsResult<()>;

    /// All keys currently present, sorted.
    fn keys(&self) -> Vec<String>;

    /// Boolean flag, `false` when absent or unrecognized.
    fn get_bool(&self, key: &str) -> bool {
        self.get(key).map(|v| parse_bool(&v)).unwrap_or(false)
    }

    /// Integer value, `0` when absent or malformed.
    fn get_int(&self, key: &str) -> i64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Float value, `0.0` when absent or malformed.
    fn get_float(&self, key: &str) -> f64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0.0)
    }

    /// JSON-encoded number, `0.0` when absent or malformed.
    fn get_json_float(&self, key: &str) -> f64 {
        match self.get(key) {
            Some(raw) if !raw.trim().is_empty() => {
                match serde_json::from_str::<f64>(raw.trim()) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::debug!(key = key, raw = %raw, error = %e, "Malformed JSON number");
                        0.0
                    }
                }
            }
            _ => 0.0,
        }
    }

    /// Store a boolean flag as `1`/`0`.
    fn put_bool(&self, key: &str, value: bool) -> ParamsResult<()> {
        self.put(key, if value { "1" } else { "0" })
    }

    /// Store an integer.
    fn put_int(&self, key: &str, value: i64) -> ParamsResult<()> {
        self.put(key, &value.to_string())
    }

    /// Store a float.
    fn put_float(&self, key: &str, value: f64) -> ParamsResult<()> {
        self.put(key, &value.to_string())
    }

    /// Store a float JSON-encoded.
    fn put_json_float(&self, key: &str, value: f64) -> ParamsResult<()> {
        if !value.is_finite() {
            return Err(ParamsError::Encode {
                key: key.to_string(),
                reason: format!("{} is not a finite number", value),
            });
        }
        let encoded = serde_json::to_string(&value).map_err(|e| ParamsError::Encode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.put(key, &encoded)
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
