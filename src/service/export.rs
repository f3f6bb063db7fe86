//! Archive export document and import parsing.
//!
//! Exports always use the current schema. Imports accept the current
//! schema and the previous one, which had no history and stored the
//! event name, date and completion time under different keys.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::statistics::EventStatistics;
use crate::domain::{Archive, BeverageSnapshot, CompletedEvent, EventId};
use crate::error::TallyError;

/// Version written by [`ExportDocument::build`].
pub const EXPORT_VERSION: &str = "2.0";
/// Previous export schema, still accepted on import.
pub const LEGACY_EXPORT_VERSION: &str = "1.0";

/// Export header.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// When the export was produced.
    pub exported_at: DateTime<Utc>,
    /// Export schema version.
    pub version: String,
    /// Number of exported events.
    pub total_events: usize,
}

/// A completed event with display fields added.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportedEvent {
    /// The archived event.
    #[serde(flatten)]
    pub event: CompletedEvent,
    /// Long-form date, e.g. `"Saturday, June 1, 2024"`.
    pub formatted_date: String,
    /// Duration label, e.g. `"2h 5min"`.
    pub duration: String,
}

/// Full archive export.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExportDocument {
    /// Export header.
    pub metadata: ExportMetadata,
    /// Statistics over the exported events.
    pub statistics: EventStatistics,
    /// Events, newest first.
    pub events: Vec<ExportedEvent>,
}

impl ExportDocument {
    /// Builds an export of the whole archive.
    #[must_use]
    pub fn build(archive: &Archive, top_n: usize, now: DateTime<Utc>) -> Self {
        let events: Vec<ExportedEvent> = archive
            .newest_first()
            .into_iter()
            .map(|event| ExportedEvent {
                formatted_date: format_long_date(event.event_date),
                duration: event.duration_label(),
                event: event.clone(),
            })
            .collect();

        Self {
            metadata: ExportMetadata {
                exported_at: now,
                version: EXPORT_VERSION.to_string(),
                total_events: events.len(),
            },
            statistics: archive.statistics(top_n),
            events,
        }
    }
}

/// Formats a date as `"Saturday, June 1, 2024"`.
#[must_use]
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[derive(Debug, Deserialize)]
struct ImportProbe {
    metadata: ProbeMetadata,
}

#[derive(Debug, Deserialize)]
struct ProbeMetadata {
    version: String,
}

#[derive(Debug, Deserialize)]
struct CurrentImport {
    events: Vec<CompletedEvent>,
}

#[derive(Debug, Deserialize)]
struct LegacyImport {
    events: Vec<LegacyEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyEvent {
    id: String,
    name: String,
    date: NaiveDate,
    completed_at: DateTime<Utc>,
    #[serde(default)]
    beverages: Vec<BeverageSnapshot>,
    #[serde(default)]
    duration: Option<String>,
}

impl LegacyEvent {
    fn upgrade(self) -> CompletedEvent {
        let started_at = self
            .duration
            .as_deref()
            .and_then(parse_duration_label)
            .and_then(|d| self.completed_at.checked_sub_signed(d))
            .unwrap_or(self.completed_at);
        let total_served = self.beverages.iter().map(|b| u64::from(b.count)).sum();

        let mut event = CompletedEvent {
            id: EventId::from_foreign(&self.id),
            event_name: self.name,
            event_date: self.date,
            event_started_at: started_at,
            event_completed_at: self.completed_at,
            total_served,
            beverages: self.beverages,
            history: Vec::new(),
        };
        event.merge_duplicate_beverages();
        // 1.0 kept no history; one serving per beverage keeps edits consistent.
        let history = event
            .beverages
            .iter()
            .filter(|b| b.count > 0)
            .map(|b| b.as_served_entry(event.event_completed_at))
            .collect();
        event.history = history;
        event
    }
}

/// Parses an export document of either supported version.
///
/// # Errors
///
/// Returns [`TallyError::ImportRejected`] for malformed JSON, a missing or
/// unknown version, or events that do not match the declared schema.
pub fn parse_import(raw: &str) -> Result<Vec<CompletedEvent>, TallyError> {
    let probe: ImportProbe = serde_json::from_str(raw)
        .map_err(|e| TallyError::ImportRejected(format!("not an export document: {e}")))?;

    match probe.metadata.version.as_str() {
        EXPORT_VERSION => serde_json::from_str::<CurrentImport>(raw)
            .map(|doc| {
                doc.events
                    .into_iter()
                    .map(|mut event| {
                        event.merge_duplicate_beverages();
                        event
                    })
                    .collect()
            })
            .map_err(|e| TallyError::ImportRejected(format!("invalid events: {e}"))),
        LEGACY_EXPORT_VERSION => serde_json::from_str::<LegacyImport>(raw)
            .map(|doc| doc.events.into_iter().map(LegacyEvent::upgrade).collect())
            .map_err(|e| TallyError::ImportRejected(format!("invalid legacy events: {e}"))),
        other => Err(TallyError::ImportRejected(format!(
            "unsupported export version {other:?}"
        ))),
    }
}

/// Parses `"2h 5min"` or `"45min"`.
fn parse_duration_label(label: &str) -> Option<TimeDelta> {
    let label = label.trim();
    let (hours, rest) = match label.split_once('h') {
        Some((h, rest)) => (h.trim().parse::<u32>().ok()?, rest.trim()),
        None => (0, label),
    };
    let minutes = rest.strip_suffix("min")?.trim().parse::<u32>().ok()?;
    TimeDelta::try_hours(i64::from(hours))?.checked_add(&TimeDelta::try_minutes(i64::from(minutes))?)
}
