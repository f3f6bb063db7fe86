//! Live event handlers: view, details, finalize, reset.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    FinalizeEventRequest, LiveEventResponse, ResetEventRequest, UpdateEventRequest,
    parse_optional_date,
};
use crate::api::session_guard::ActiveSession;
use crate::app_state::AppState;
use crate::domain::CompletedEvent;
use crate::error::{ErrorResponse, TallyError};
use crate::service::ResetConfirmation;

/// `GET /event`: The live event.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/event",
    tag = "Event",
    summary = "Get the live event",
    description = "Returns name, date, start time, totals, every beverage and the serving history of the live event.",
    responses(
        (status = 200, description = "Live event", body = LiveEventResponse),
    )
)]
pub async fn get_live_event(State(state): State<AppState>) -> Result<impl IntoResponse, TallyError> {
    let live = state.tally_service.live_event().await;
    Ok(Json(LiveEventResponse::from(live)))
}

/// `PUT /event`: Set the live event's name and date.
///
/// # Errors
///
/// Returns [`TallyError::InvalidDate`] for a malformed date.
#[utoipa::path(
    put,
    path = "/api/v1/event",
    tag = "Event",
    summary = "Update event details",
    description = "Sets the live event's name and (optionally) date before finalization.",
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated live event", body = LiveEventResponse),
        (status = 400, description = "Invalid date", body = ErrorResponse),
        (status = 401, description = "No active session", body = ErrorResponse),
    )
)]
pub async fn update_live_event(
    _session: ActiveSession,
    State(state): State<AppState>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, TallyError> {
    let date = parse_optional_date(req.date.as_deref())?;
    let live = state.tally_service.update_details(&req.name, date).await;
    Ok(Json(LiveEventResponse::from(live)))
}

/// `POST /event/finalize`: Archive the live event and start a new one.
///
/// # Errors
///
/// Returns [`TallyError::InvalidRequest`] for a blank name,
/// [`TallyError::InvalidDate`] for a malformed date and
/// [`TallyError::NothingServed`] when nothing was served.
#[utoipa::path(
    post,
    path = "/api/v1/event/finalize",
    tag = "Event",
    summary = "Finalize the live event",
    description = "Snapshots every served beverage and the full history into the archive, then starts a fresh event with zero counts and nothing available.",
    request_body = FinalizeEventRequest,
    responses(
        (status = 201, description = "Archived event", body = CompletedEvent),
        (status = 400, description = "Blank name or invalid date", body = ErrorResponse),
        (status = 401, description = "No active session", body = ErrorResponse),
        (status = 409, description = "Nothing served", body = ErrorResponse),
    )
)]
pub async fn finalize_event(
    _session: ActiveSession,
    State(state): State<AppState>,
    Json(req): Json<FinalizeEventRequest>,
) -> Result<impl IntoResponse, TallyError> {
    let date = parse_optional_date(req.date.as_deref())?;
    let completed = state
        .tally_service
        .finalize_event(req.name.as_deref(), date)
        .await?;
    Ok((StatusCode::CREATED, Json(completed)))
}

/// `POST /event/reset`: Discard the live event.
///
/// # Errors
///
/// Returns [`TallyError::InvalidRequest`] without both acknowledgements and
/// [`TallyError::Unauthorized`] for a wrong password.
#[utoipa::path(
    post,
    path = "/api/v1/event/reset",
    tag = "Event",
    summary = "Reset the live event",
    description = "Clears counts, availability and history without archiving. Requires two acknowledgements and the shared secret.",
    request_body = ResetEventRequest,
    responses(
        (status = 200, description = "Fresh live event", body = LiveEventResponse),
        (status = 400, description = "Missing acknowledgement", body = ErrorResponse),
        (status = 401, description = "No session or wrong password", body = ErrorResponse),
    )
)]
pub async fn reset_event(
    _session: ActiveSession,
    State(state): State<AppState>,
    Json(req): Json<ResetEventRequest>,
) -> Result<impl IntoResponse, TallyError> {
    let live = state
        .tally_service
        .reset_event(&ResetConfirmation::from(req))
        .await?;
    Ok(Json(LiveEventResponse::from(live)))
}

/// Live event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/event", get(get_live_event).put(update_live_event))
        .route("/event/finalize", post(finalize_event))
        .route("/event/reset", post(reset_event))
}
