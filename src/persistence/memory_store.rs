//! In-process key-value store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::KeyValueStore;
use crate::error::TallyError;

/// `HashMap`-backed store. Contents live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, TallyError> {
        self.entries
            .lock()
            .map_err(|_| TallyError::Internal("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, TallyError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TallyError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), TallyError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
