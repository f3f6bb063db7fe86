//! Live event DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Beverage, HistoryEntry, LiveEvent};
use crate::service::ResetConfirmation;

/// Full live event view for `GET /event`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiveEventResponse {
    /// Event name (empty until set).
    pub name: String,
    /// Event date.
    pub date: NaiveDate,
    /// When the event started.
    pub started_at: DateTime<Utc>,
    /// Sum of all counts.
    pub total_served: u64,
    /// Every beverage, in catalog order.
    pub beverages: Vec<Beverage>,
    /// Serving history, oldest first.
    pub history: Vec<HistoryEntry>,
}

impl From<LiveEvent> for LiveEventResponse {
    fn from(live: LiveEvent) -> Self {
        Self {
            name: live.name().to_string(),
            date: live.date(),
            started_at: live.started_at(),
            total_served: live.total_served(),
            beverages: live.beverages().to_vec(),
            history: live.history().to_vec(),
        }
    }
}

/// Request body for `PUT /event`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    /// Event name.
    pub name: String,
    /// Event date as `YYYY-MM-DD`; omitted keeps the current date.
    #[serde(default)]
    pub date: Option<String>,
}

/// Request body for `POST /event/finalize`. Omitted fields fall back to
/// the live event's details.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FinalizeEventRequest {
    /// Event name override.
    #[serde(default)]
    pub name: Option<String>,
    /// Event date override as `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
}

/// Request body for `POST /event/reset`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetEventRequest {
    /// First acknowledgement.
    #[serde(default)]
    pub acknowledged: bool,
    /// Second acknowledgement.
    #[serde(default)]
    pub confirmed: bool,
    /// Shared secret.
    #[serde(default)]
    pub password: String,
}

impl From<ResetEventRequest> for ResetConfirmation {
    fn from(req: ResetEventRequest) -> Self {
        Self {
            acknowledged: req.acknowledged,
            confirmed: req.confirmed,
            password: req.password,
        }
    }
}
