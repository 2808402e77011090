//! In-process parameter store.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{ParamStore, ParamsResult};

/// Parameter store held entirely in memory.
///
/// Writes never fail. Useful for tests and for running the resolver with a
/// live store owned by the same process as the publishers.
#[derive(Debug, Default)]
pub struct MemoryParamStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryParamStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl ParamStore for MemoryParamStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) -> ParamsResult<()> {
        self.values
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ParamsResult<()> {
        self.values.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }
}
