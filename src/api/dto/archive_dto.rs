//! Archive DTOs: listing, editing and import results.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CompletedEvent, HistoryEntry};
use crate::service::ImportSummary;

/// Response body for `GET /events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Archived events, newest first.
    pub events: Vec<CompletedEvent>,
    /// Number of archived events.
    pub total: usize,
}

/// Request body for `PUT /events/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EditEventRequest {
    /// New event name.
    pub name: String,
    /// New event date as `YYYY-MM-DD`.
    pub date: String,
    /// Replacement history; counts are recomputed from it.
    pub history: Vec<HistoryEntry>,
}

/// Response body for `DELETE /events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClearArchiveResponse {
    /// Number of removed events.
    pub removed: usize,
}

/// Response body for `POST /import`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// Events added.
    pub imported: usize,
    /// Events skipped because they were already archived.
    pub skipped: usize,
    /// Archive size after the import.
    pub total_events: usize,
}

impl From<ImportSummary> for ImportResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            imported: summary.imported,
            skipped: summary.skipped,
            total_events: summary.total_events,
        }
    }
}
