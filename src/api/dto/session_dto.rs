//! Session DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /session/login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Shared secret.
    pub password: String,
}

/// Session status.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Whether mutating operations are currently allowed.
    pub authenticated: bool,
}
