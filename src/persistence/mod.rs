//! Persistence layer: versioned JSON records in a local key-value store.
//!
//! [`KeyValueStore`] is the storage seam (one string value per key).
//! [`StatePersistence`] owns the record formats, versioning and timestamp
//! handling on top of it. Backends: [`FileStore`] for durable local
//! storage and [`MemoryStore`] for tests or when persistence is disabled.

pub mod file_store;
pub mod memory_store;
pub mod models;
pub mod state_store;

use std::fmt;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use state_store::StatePersistence;

use crate::error::TallyError;

/// Synchronous string key-value storage.
///
/// Access is local and fast; callers hold the state lock while saving so
/// writes land in mutation order.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a storage error ([`TallyError::Io`] or [`TallyError::Persistence`])
    /// if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, TallyError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a storage error ([`TallyError::Io`] or [`TallyError::Persistence`])
    /// if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), TallyError>;

    /// Deletes `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a storage error ([`TallyError::Io`] or [`TallyError::Persistence`])
    /// if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), TallyError>;
}
