//! Versioned load/save of service state on top of a [`KeyValueStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use super::KeyValueStore;
use super::models::{ArchiveRecord, LiveStateRecord, STORAGE_VERSION, VersionProbe};
use crate::domain::{Archive, LiveEvent};
use crate::error::TallyError;

/// Storage key of the live event record.
pub const LIVE_STATE_KEY: &str = "beverage-counter.live";
/// Storage key of the archive record.
pub const ARCHIVE_KEY: &str = "beverage-counter.events";
/// Storage key of the persisted session flag.
pub const AUTH_KEY: &str = "beverage-counter.auth";

/// Reads and writes the live event, the archive and the session flag.
///
/// Loads never fail: missing, unreadable or foreign-version records are
/// logged and reported as `None`. Saves return their error so the caller
/// can log it without failing the operation that triggered the save.
#[derive(Debug, Clone)]
pub struct StatePersistence {
    store: Arc<dyn KeyValueStore>,
}

impl StatePersistence {
    /// Wraps a storage backend.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Writes the live event.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Serialization`] if the record cannot be encoded
    /// and a storage error if the write fails.
    pub fn save_live(&self, live: &LiveEvent, now: DateTime<Utc>) -> Result<(), TallyError> {
        let record = LiveStateRecord::capture(live, now);
        self.store
            .set(LIVE_STATE_KEY, &serde_json::to_string(&record)?)
    }

    /// Reads the live event, reconciled against the catalog.
    #[must_use]
    pub fn load_live(&self) -> Option<LiveEvent> {
        self.load_record::<LiveStateRecord>(LIVE_STATE_KEY)
            .map(LiveStateRecord::restore)
    }

    /// Writes the archive.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Serialization`] if the record cannot be encoded
    /// and a storage error if the write fails.
    pub fn save_archive(&self, archive: &Archive, now: DateTime<Utc>) -> Result<(), TallyError> {
        let record = ArchiveRecord::capture(archive, now);
        self.store.set(ARCHIVE_KEY, &serde_json::to_string(&record)?)
    }

    /// Reads the archive.
    #[must_use]
    pub fn load_archive(&self) -> Option<Archive> {
        self.load_record::<ArchiveRecord>(ARCHIVE_KEY)
            .map(ArchiveRecord::restore)
    }

    /// Persists the session flag. Clearing removes the key.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn set_authenticated(&self, authenticated: bool) -> Result<(), TallyError> {
        if authenticated {
            self.store.set(AUTH_KEY, "true")
        } else {
            self.store.remove(AUTH_KEY)
        }
    }

    /// Reads the session flag. Unreadable storage counts as signed out.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        match self.store.get(AUTH_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session flag");
                false
            }
        }
    }

    fn load_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, "no stored record");
                return None;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored record");
                return None;
            }
        };

        match serde_json::from_str::<VersionProbe>(&raw) {
            Ok(probe) if probe.version == STORAGE_VERSION => {}
            Ok(probe) => {
                tracing::warn!(
                    key,
                    found = %probe.version,
                    expected = STORAGE_VERSION,
                    "ignoring stored record with unexpected version"
                );
                return None;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring unreadable stored record");
                return None;
            }
        }

        serde_json::from_str(&raw)
            .inspect_err(|e| tracing::warn!(key, error = %e, "ignoring malformed stored record"))
            .ok()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{SubsecRound, TimeZone};

    use super::*;
    use crate::domain::{BeverageId, EventId};
    use crate::persistence::{FileStore, MemoryStore};

    fn memory() -> (Arc<MemoryStore>, StatePersistence) {
        let store = Arc::new(MemoryStore::new());
        let persistence = StatePersistence::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
        (store, persistence)
    }

    fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }

    #[test]
    fn empty_store_loads_nothing() {
        let (_, persistence) = memory();
        assert!(persistence.load_live().is_none());
        assert!(persistence.load_archive().is_none());
        assert!(!persistence.is_authenticated());
    }

    #[test]
    fn live_round_trip_keeps_millisecond_timestamps() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let Ok(store) = FileStore::open(dir.path()) else {
            panic!("open failed");
        };
        let persistence = StatePersistence::new(Arc::new(store));

        let Some(started) = Utc.timestamp_opt(1_700_000_000, 123_000_000).single() else {
            panic!("bad timestamp");
        };
        let Some(served) = Utc.timestamp_opt(1_700_000_042, 987_000_000).single() else {
            panic!("bad timestamp");
        };
        let mut live = LiveEvent::new(started);
        live.set_details("Summer Party", started.date_naive());
        let water = BeverageId::new("hugo");
        assert!(live.toggle_availability(&water).is_ok());
        assert!(live.add_serving(&water, 3, served).is_ok());

        assert!(persistence.save_live(&live, served).is_ok());
        let Some(loaded) = persistence.load_live() else {
            panic!("nothing loaded");
        };
        assert_eq!(loaded, live);
        assert_eq!(
            loaded.beverage(&water).and_then(|b| b.last_increment),
            Some(served)
        );
    }

    #[test]
    fn archive_round_trip() {
        let (_, persistence) = memory();
        let t = now();
        let mut live = LiveEvent::new(t);
        assert!(live.add_serving(&BeverageId::new("mojito"), 2, t).is_ok());
        let Ok(completed) = live.finalize("Gala", t.date_naive(), t) else {
            panic!("finalize failed");
        };
        let mut archive = Archive::new();
        let id: EventId = archive.append(completed);

        assert!(persistence.save_archive(&archive, t).is_ok());
        let Some(loaded) = persistence.load_archive() else {
            panic!("nothing loaded");
        };
        assert_eq!(loaded, archive);
        assert!(loaded.contains(id));
    }

    #[test]
    fn foreign_version_is_ignored() {
        let (store, persistence) = memory();
        let raw = r#"{"version":"1.0","beverages":[],"lastSaved":"2024-01-01T00:00:00Z","eventDate":"2024-01-01","totalServed":0}"#;
        assert!(store.set(LIVE_STATE_KEY, raw).is_ok());
        assert!(persistence.load_live().is_none());
    }

    #[test]
    fn malformed_record_is_ignored() {
        let (store, persistence) = memory();
        assert!(store.set(ARCHIVE_KEY, "{not json").is_ok());
        assert!(persistence.load_archive().is_none());
        assert!(store.set(ARCHIVE_KEY, r#"{"version":"2.0","events":7}"#).is_ok());
        assert!(persistence.load_archive().is_none());
    }

    #[test]
    fn session_flag_set_and_clear() {
        let (store, persistence) = memory();
        assert!(persistence.set_authenticated(true).is_ok());
        assert!(persistence.is_authenticated());
        assert!(persistence.set_authenticated(false).is_ok());
        assert!(!persistence.is_authenticated());
        assert!(matches!(store.get(AUTH_KEY), Ok(None)));
    }
}
