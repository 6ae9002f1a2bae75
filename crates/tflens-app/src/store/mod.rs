//! Persisted string key-value store behind the selection state
//!
//! Reads never fail: a missing key is `None`. Writes are synchronous and
//! visible to the next read in the same process.

pub mod file;
pub mod selection;

use std::collections::BTreeMap;

use tflens_core::prelude::*;

pub use file::FileKvStore;
pub use selection::{
    CollapseMap, KeySet, KeySetPurpose, SelectionScope, SelectionSnapshot, SelectionStore,
};

/// String key-value storage
pub trait KvStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value`. The new value is visible to `get` even when
    /// persisting it fails.
    fn set(&mut self, key: &str, value: String) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Process-local store, used by tests and headless mode
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    values: BTreeMap<String, String>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}
