//! Session handlers: status, login, logout.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{LoginRequest, SessionResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, TallyError};

/// `GET /session`: Session status.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    tag = "Session",
    summary = "Session status",
    responses(
        (status = 200, description = "Session status", body = SessionResponse),
    )
)]
pub async fn get_session(State(state): State<AppState>) -> Result<impl IntoResponse, TallyError> {
    Ok(Json(SessionResponse {
        authenticated: state.session_service.is_authenticated().await,
    }))
}

/// `POST /session/login`: Start a session with the shared secret.
///
/// # Errors
///
/// Returns [`TallyError::Unauthorized`] for a wrong password.
#[utoipa::path(
    post,
    path = "/api/v1/session/login",
    tag = "Session",
    summary = "Log in",
    description = "Checks the shared secret, persists the session flag and starts periodic saves.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session started", body = SessionResponse),
        (status = 401, description = "Wrong password", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, TallyError> {
    state.session_service.login(&req.password).await?;
    Ok(Json(SessionResponse {
        authenticated: true,
    }))
}

/// `POST /session/logout`: End the session.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    post,
    path = "/api/v1/session/logout",
    tag = "Session",
    summary = "Log out",
    description = "Stops periodic saves, saves once and clears the session flag.",
    responses(
        (status = 200, description = "Session ended", body = SessionResponse),
    )
)]
pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, TallyError> {
    state.session_service.logout().await;
    Ok(Json(SessionResponse {
        authenticated: false,
    }))
}

/// Session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(get_session))
        .route("/session/login", post(login))
        .route("/session/logout", post(logout))
}
