//! In-memory property store with JSON dump support.
//!
//! Used as a standalone storage target (an arena controller, a world-level
//! registry) and by tooling that inspects property dumps exported from a server.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::HostError;
use crate::host::PropertyStore;

/// Errors while reading or writing a property dump file.
#[derive(Debug, Error)]
pub enum StoreFileError {
    /// Filesystem failure.
    #[error("failed to access property dump: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a JSON object of string values.
    #[error("failed to parse property dump: {0}")]
    Parse(#[from] serde_json::Error),
}

/// `BTreeMap`-backed [`PropertyStore`]. Keys iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryPropertyStore {
    entries: BTreeMap<String, String>,
}

impl MemoryPropertyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON object file (`{"key": "value", ...}`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreFileError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the store as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreFileError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Value at `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert a value directly.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove a key, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn property(&self, key: &str) -> Result<Option<String>, HostError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_property(&mut self, key: &str, value: String) -> Result<(), HostError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
