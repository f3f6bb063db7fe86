//! Tally error types with HTTP status code mapping.
//!
//! [`TallyError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BeverageId, EventId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: serving amount must be positive",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`TallyError`] code ranges).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Service error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
/// | 4000–4999 | Auth            | 401 Unauthorized             |
#[derive(Debug, thiserror::Error)]
pub enum TallyError {
    /// Request validation failed (non-positive amount, blank name, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A date string could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// An import document was malformed or used an unknown schema.
    #[error("import rejected: {0}")]
    ImportRejected(String),

    /// No beverage with the given id exists in the live event.
    #[error("beverage not found: {0}")]
    BeverageNotFound(BeverageId),

    /// No completed event with the given id exists in the archive.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// The beverage has no recorded serving that can be undone.
    #[error("nothing to undo for beverage {0}")]
    NothingToUndo(BeverageId),

    /// Finalization requested before any serving was recorded.
    #[error("no servings recorded for the current event")]
    NothingServed,

    /// Credential check failed or no session is active.
    #[error("unauthorized")]
    Unauthorized,

    /// Storage backend failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Storage I/O failure.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TallyError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidDate(_) => 1002,
            Self::ImportRejected(_) => 1003,
            Self::BeverageNotFound(_) => 2001,
            Self::EventNotFound(_) => 2002,
            Self::NothingToUndo(_) => 2003,
            Self::NothingServed => 2004,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Io(_) => 3002,
            Self::Serialization(_) => 3003,
            Self::Unauthorized => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidDate(_) | Self::ImportRejected(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::BeverageNotFound(_) | Self::EventNotFound(_) => StatusCode::NOT_FOUND,
            Self::NothingToUndo(_) | Self::NothingServed => StatusCode::CONFLICT,
            Self::Persistence(_) | Self::Io(_) | Self::Serialization(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for TallyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
