//! Archive handlers: completed events, statistics, export and import.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    ClearArchiveResponse, EditEventRequest, EventListResponse, ImportResponse, parse_date,
};
use crate::api::session_guard::ActiveSession;
use crate::app_state::AppState;
use crate::domain::statistics::EventStatistics;
use crate::domain::{CompletedEvent, EventId};
use crate::error::{ErrorResponse, TallyError};
use crate::service::ExportDocument;

/// `GET /events`: List archived events, newest first.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Archive",
    summary = "List completed events",
    description = "Returns every archived event ordered by event date, then completion time, newest first.",
    responses(
        (status = 200, description = "Archived events", body = EventListResponse),
    )
)]
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, TallyError> {
    let events = state.tally_service.list_events().await;
    Ok(Json(EventListResponse {
        total: events.len(),
        events,
    }))
}

/// `GET /events/{id}`: One archived event.
///
/// # Errors
///
/// Returns [`TallyError::EventNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Archive",
    summary = "Get a completed event",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Archived event", body = CompletedEvent),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, TallyError> {
    let event = state.tally_service.get_event(EventId::from_uuid(id)).await?;
    Ok(Json(event))
}

/// `PUT /events/{id}`: Replace an archived event's history and details.
///
/// # Errors
///
/// Returns [`TallyError::EventNotFound`] for an unknown id,
/// [`TallyError::InvalidDate`] for a malformed date and
/// [`TallyError::InvalidRequest`] for a blank name or zero amounts.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "Archive",
    summary = "Edit a completed event",
    description = "Replaces name, date and history, then recomputes every beverage count from the history (clamped at zero) and the event total. History entries for unknown beverages add them under the `custom` category.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = EditEventRequest,
    responses(
        (status = 200, description = "Edited event", body = CompletedEvent),
        (status = 400, description = "Invalid edit", body = ErrorResponse),
        (status = 401, description = "No active session", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn edit_event(
    _session: ActiveSession,
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<EditEventRequest>,
) -> Result<impl IntoResponse, TallyError> {
    let date = parse_date(&req.date)?;
    let event = state
        .tally_service
        .edit_event(EventId::from_uuid(id), req.history, &req.name, date)
        .await?;
    Ok(Json(event))
}

/// `DELETE /events/{id}`: Remove an archived event.
///
/// # Errors
///
/// Never fails for unknown ids; deletion is idempotent.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Archive",
    summary = "Delete a completed event",
    description = "Removes the event if present. Deleting an unknown id also answers 204.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 204, description = "Event deleted or already absent"),
        (status = 401, description = "No active session", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    _session: ActiveSession,
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, TallyError> {
    let _ = state
        .tally_service
        .delete_event(EventId::from_uuid(id))
        .await;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /events`: Empty the archive.
///
/// # Errors
///
/// Returns [`TallyError::Unauthorized`] without a session.
#[utoipa::path(
    delete,
    path = "/api/v1/events",
    tag = "Archive",
    summary = "Clear the archive",
    responses(
        (status = 200, description = "Archive cleared", body = ClearArchiveResponse),
        (status = 401, description = "No active session", body = ErrorResponse),
    )
)]
pub async fn clear_archive(
    _session: ActiveSession,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, TallyError> {
    let removed = state.tally_service.clear_archive().await;
    Ok(Json(ClearArchiveResponse { removed }))
}

/// `GET /statistics`: Aggregates over the archive.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/statistics",
    tag = "Archive",
    summary = "Archive statistics",
    description = "Total events, total drinks, average per event (rounded half-up), top drinks, top categories and the most successful event.",
    responses(
        (status = 200, description = "Statistics", body = EventStatistics),
    )
)]
pub async fn statistics(State(state): State<AppState>) -> Result<impl IntoResponse, TallyError> {
    Ok(Json(state.tally_service.statistics().await))
}

/// `GET /export`: Download the whole archive.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/export",
    tag = "Archive",
    summary = "Export the archive",
    description = "Returns an export document with metadata, statistics and every event plus a long-form date and duration label.",
    responses(
        (status = 200, description = "Export document", body = ExportDocument),
    )
)]
pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, TallyError> {
    let document = state.tally_service.export().await;
    let filename = format!(
        "attachment; filename=\"beverage-events-{}.json\"",
        document.metadata.exported_at.format("%Y-%m-%d")
    );
    Ok(([(header::CONTENT_DISPOSITION, filename)], Json(document)))
}

/// `POST /import`: Merge an export document into the archive.
///
/// # Errors
///
/// Returns [`TallyError::ImportRejected`] for malformed or unsupported
/// documents; the archive is unchanged in that case.
#[utoipa::path(
    post,
    path = "/api/v1/import",
    tag = "Archive",
    summary = "Import an export document",
    description = "Accepts the current export schema (2.0) and the previous one (1.0). Events already in the archive are skipped.",
    request_body(content = String, content_type = "application/json", description = "Export document"),
    responses(
        (status = 200, description = "Import result", body = ImportResponse),
        (status = 400, description = "Document rejected", body = ErrorResponse),
        (status = 401, description = "No active session", body = ErrorResponse),
    )
)]
pub async fn import(
    _session: ActiveSession,
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, TallyError> {
    let summary = state.tally_service.import(&body).await?;
    Ok(Json(ImportResponse::from(summary)))
}

/// Archive routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).delete(clear_archive))
        .route(
            "/events/{id}",
            get(get_event).put(edit_event).delete(delete_event),
        )
        .route("/statistics", get(statistics))
        .route("/export", get(export))
        .route("/import", post(import))
}
