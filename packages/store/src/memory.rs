//! In-memory repository.

use std::{collections::BTreeMap, sync::Mutex};

use crate::{Repository, StoreError};

/// Repository holding values in memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    values: Mutex<BTreeMap<String, serde_json::Value>>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn values(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, serde_json::Value>>, StoreError> {
        self.values.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl Repository for MemoryRepository {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.values()?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<bool, StoreError> {
        self.values()?.insert(key.to_owned(), value.clone());
        Ok(true)
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.values()?.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.values()?.keys().cloned().collect())
    }
}
