//! System endpoints: health check and the beverage catalog.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::catalog::{self, BeverageDefinition, Category};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    ws_subscribers: usize,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp and the number of live WebSocket subscribers.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ws_subscribers: state.event_bus.receiver_count(),
        }),
    )
}

/// Static catalog.
#[derive(Debug, Serialize, ToSchema)]
struct CatalogResponse {
    categories: Vec<Category>,
    beverages: Vec<BeverageDefinition>,
}

/// `GET /config/catalog`: The static beverage catalog.
#[utoipa::path(
    get,
    path = "/config/catalog",
    tag = "System",
    summary = "Beverage catalog",
    description = "Returns every category and beverage definition the service knows, in display order.",
    responses(
        (status = 200, description = "Catalog", body = CatalogResponse),
    )
)]
pub async fn catalog_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(CatalogResponse {
            categories: catalog::CATEGORIES.to_vec(),
            beverages: catalog::BEVERAGES.to_vec(),
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/catalog", get(catalog_handler))
}
