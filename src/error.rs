//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: raio must be greater than zero",
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
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 2000–2999 | Not Found  | 404 Not Found             |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed (bad radius, out-of-range coordinates).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Animal with the given ID is not known to the directory.
    #[error("animal not found: {0}")]
    AnimalNotFound(uuid::Uuid),

    /// Safe zone with the given ID was not found.
    #[error("safe zone not found: {0}")]
    ZoneNotFound(uuid::Uuid),

    /// No safe zone configured for the given animal.
    #[error("no safe zone configured for animal {0}")]
    ZoneNotFoundForAnimal(uuid::Uuid),

    /// Location or heart-rate reading with the given ID was not found.
    #[error("reading not found: {0}")]
    ReadingNotFound(uuid::Uuid),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::AnimalNotFound(_) => 2001,
            Self::ZoneNotFound(_) | Self::ZoneNotFoundForAnimal(_) => 2002,
            Self::ReadingNotFound(_) => 2003,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::AnimalNotFound(_)
            | Self::ZoneNotFound(_)
            | Self::ZoneNotFoundForAnimal(_)
            | Self::ReadingNotFound(_) => StatusCode::NOT_FOUND,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
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

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = GatewayError::InvalidRequest("raio must be greater than zero".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn not_found_variants_map_to_404() {
        let id = uuid::Uuid::new_v4();
        for err in [
            GatewayError::AnimalNotFound(id),
            GatewayError::ZoneNotFound(id),
            GatewayError::ZoneNotFoundForAnimal(id),
            GatewayError::ReadingNotFound(id),
        ] {
            assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn persistence_maps_to_internal() {
        let err = GatewayError::PersistenceError("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3001);
    }
}
