//! REST endpoint handlers organized by resource.

pub mod archive;
pub mod beverage;
pub mod event;
pub mod session;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(beverage::routes())
        .merge(event::routes())
        .merge(archive::routes())
        .merge(session::routes())
}
