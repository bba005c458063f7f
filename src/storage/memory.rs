use std::{collections::HashMap, sync::Mutex};

use crate::errors::{ExpenseError, Result};

use super::StorageBackend;

/// Process-local storage, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a slot with a raw payload, bypassing serialization.
    pub fn with_slot(key: impl Into<String>, payload: impl Into<String>) -> Self {
        let storage = Self::default();
        if let Ok(mut slots) = storage.slots.lock() {
            slots.insert(key.into(), payload.into());
        }
        storage
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| ExpenseError::Storage("memory storage poisoned".into()))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| ExpenseError::Storage("memory storage poisoned".into()))?;
        slots.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}
