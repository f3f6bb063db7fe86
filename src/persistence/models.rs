//! Stored record formats for the live event and the archive.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog;
use crate::domain::{Archive, Beverage, CompletedEvent, HistoryEntry, LiveEvent};

/// Schema version written into every record. Records carrying any other
/// version are treated as absent on load.
pub const STORAGE_VERSION: &str = "2.0";

/// Persisted live event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStateRecord {
    /// Schema version.
    pub version: String,
    /// Full beverage list including counts and undo slots.
    pub beverages: Vec<Beverage>,
    /// Serving history of the live event.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// When the record was written.
    pub last_saved: DateTime<Utc>,
    /// Event name, omitted while blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    /// Event date.
    pub event_date: NaiveDate,
    /// When the event started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_started: Option<DateTime<Utc>>,
    /// Sum of all counts at save time.
    pub total_served: u64,
}

impl LiveStateRecord {
    /// Captures `live` as a record stamped with `now`.
    #[must_use]
    pub fn capture(live: &LiveEvent, now: DateTime<Utc>) -> Self {
        let name = live.name();
        Self {
            version: STORAGE_VERSION.to_string(),
            beverages: live.beverages().to_vec(),
            history: live.history().to_vec(),
            last_saved: now.trunc_subsecs(3),
            event_name: (!name.is_empty()).then(|| name.to_string()),
            event_date: live.date(),
            event_started: Some(live.started_at()),
            total_served: live.total_served(),
        }
    }

    /// Rebuilds the live event.
    ///
    /// Catalog beverages missing from the record are appended fresh, after
    /// the stored ones, so a catalog extension never hides new drinks. A
    /// record without a start time is treated as started when it was saved.
    #[must_use]
    pub fn restore(self) -> LiveEvent {
        let mut beverages = self.beverages;
        let stored = beverages.len();
        for def in catalog::BEVERAGES {
            if !beverages.iter().any(|b| b.id.as_str() == def.id) {
                beverages.push(Beverage::from_definition(def));
            }
        }
        if beverages.len() > stored {
            tracing::debug!(
                added = beverages.len() - stored,
                "catalog beverages added to restored state"
            );
        }

        LiveEvent::from_parts(
            self.event_name.unwrap_or_default(),
            self.event_date,
            self.event_started.unwrap_or(self.last_saved),
            beverages,
            self.history,
        )
    }
}

/// Persisted archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRecord {
    /// Schema version.
    pub version: String,
    /// Completed events in append order.
    pub events: Vec<CompletedEvent>,
    /// When the record was written.
    pub last_updated: DateTime<Utc>,
}

impl ArchiveRecord {
    /// Captures `archive` as a record stamped with `now`.
    #[must_use]
    pub fn capture(archive: &Archive, now: DateTime<Utc>) -> Self {
        Self {
            version: STORAGE_VERSION.to_string(),
            events: archive.events().to_vec(),
            last_updated: now.trunc_subsecs(3),
        }
    }

    /// Rebuilds the archive, keeping append order.
    #[must_use]
    pub fn restore(self) -> Archive {
        Archive::from_events(self.events)
    }
}

/// Minimal view used to check a record's version before full parsing.
#[derive(Debug, Deserialize)]
pub(crate) struct VersionProbe {
    pub(crate) version: String,
}
