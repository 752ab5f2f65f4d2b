//! In-memory durable store for tests and embedded use.
//!
//! "Durability" is the lifetime of the process; nothing touches disk.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;
use crate::storage::DurableStore;

/// HashMap-backed [`DurableStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn put(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            (namespace.to_string(), key.to_string()),
            value.to_string(),
        );
        Ok(())
    }
}
