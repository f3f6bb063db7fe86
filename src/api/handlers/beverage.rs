//! Beverage handlers: list, toggle availability, add serving, undo.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AddServingRequest, BeverageListResponse};
use crate::api::session_guard::ActiveSession;
use crate::app_state::AppState;
use crate::domain::{Beverage, BeverageFilter, BeverageId};
use crate::error::{ErrorResponse, TallyError};

/// `GET /beverages`: List live beverages.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/beverages",
    tag = "Beverages",
    summary = "List beverages",
    description = "Returns the live beverages in catalog order, optionally filtered by category and availability. Filtering never affects the total.",
    params(BeverageFilter),
    responses(
        (status = 200, description = "Beverage list", body = BeverageListResponse),
    )
)]
pub async fn list_beverages(
    State(state): State<AppState>,
    Query(filter): Query<BeverageFilter>,
) -> Result<impl IntoResponse, TallyError> {
    let live = state.tally_service.live_event().await;
    Ok(Json(BeverageListResponse {
        beverages: live.filtered(&filter).cloned().collect(),
        total_served: live.total_served(),
    }))
}

/// `POST /beverages/{id}/toggle`: Flip a beverage's availability.
///
/// # Errors
///
/// Returns [`TallyError::BeverageNotFound`] for an unknown id.
#[utoipa::path(
    post,
    path = "/api/v1/beverages/{id}/toggle",
    tag = "Beverages",
    summary = "Toggle availability",
    description = "Makes a beverage available to bartenders or hides it. The count is untouched.",
    params(
        ("id" = String, Path, description = "Beverage id"),
    ),
    responses(
        (status = 200, description = "Updated beverage", body = Beverage),
        (status = 401, description = "No active session", body = ErrorResponse),
        (status = 404, description = "Beverage not found", body = ErrorResponse),
    )
)]
pub async fn toggle_availability(
    _session: ActiveSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, TallyError> {
    let beverage = state
        .tally_service
        .toggle_availability(&BeverageId::from(id))
        .await?;
    Ok(Json(beverage))
}

/// `POST /beverages/{id}/servings`: Record servings.
///
/// # Errors
///
/// Returns [`TallyError::InvalidRequest`] for a non-positive amount and
/// [`TallyError::BeverageNotFound`] for an unknown id.
#[utoipa::path(
    post,
    path = "/api/v1/beverages/{id}/servings",
    tag = "Beverages",
    summary = "Add servings",
    description = "Adds `amount` servings (default 1) and makes them the beverage's undoable serving.",
    params(
        ("id" = String, Path, description = "Beverage id"),
    ),
    request_body = AddServingRequest,
    responses(
        (status = 200, description = "Updated beverage", body = Beverage),
        (status = 400, description = "Amount not positive", body = ErrorResponse),
        (status = 401, description = "No active session", body = ErrorResponse),
        (status = 404, description = "Beverage not found", body = ErrorResponse),
    )
)]
pub async fn add_serving(
    _session: ActiveSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddServingRequest>,
) -> Result<impl IntoResponse, TallyError> {
    let beverage = state
        .tally_service
        .add_serving(&BeverageId::from(id), req.amount)
        .await?;
    Ok(Json(beverage))
}

/// `POST /beverages/{id}/undo`: Undo the most recent serving.
///
/// # Errors
///
/// Returns [`TallyError::NothingToUndo`] when there is nothing to undo and
/// [`TallyError::BeverageNotFound`] for an unknown id.
#[utoipa::path(
    post,
    path = "/api/v1/beverages/{id}/undo",
    tag = "Beverages",
    summary = "Undo last serving",
    description = "Reverts the beverage's most recent serving. Only one level of undo exists.",
    params(
        ("id" = String, Path, description = "Beverage id"),
    ),
    responses(
        (status = 200, description = "Updated beverage", body = Beverage),
        (status = 401, description = "No active session", body = ErrorResponse),
        (status = 404, description = "Beverage not found", body = ErrorResponse),
        (status = 409, description = "Nothing to undo", body = ErrorResponse),
    )
)]
pub async fn undo_last_serving(
    _session: ActiveSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, TallyError> {
    let beverage = state
        .tally_service
        .undo_last_serving(&BeverageId::from(id))
        .await?;
    Ok(Json(beverage))
}

/// Beverage routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/beverages", get(list_beverages))
        .route("/beverages/{id}/toggle", post(toggle_availability))
        .route("/beverages/{id}/servings", post(add_serving))
        .route("/beverages/{id}/undo", post(undo_last_serving))
}
