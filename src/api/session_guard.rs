//! Extractor gating mutating endpoints behind an active session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::error::TallyError;

/// Proof that an operator session is active.
///
/// Add it as the first handler argument; requests without a session are
/// answered with [`TallyError::Unauthorized`] before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct ActiveSession;

impl FromRequestParts<AppState> for ActiveSession {
    type Rejection = TallyError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.session_service.is_authenticated().await {
            Ok(Self)
        } else {
            Err(TallyError::Unauthorized)
        }
    }
}
