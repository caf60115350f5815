//! Maps domain errors to HTTP responses.
//!
//! [`ApiError`] is this crate's response-side wrapper around
//! [`AppError`]; handlers return it so `?` keeps working on any
//! `AppResult` while the `IntoResponse` impl stays local.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use socialhub_core::error::{AppError, ErrorKind};

/// HTTP-facing wrapper for [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = match &err.kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Serialization
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Internal => {
                tracing::error!(error = %err.message, kind = %err.kind, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message: err.message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_kind_to_status_mapping() {
        assert_eq!(status_of(AppError::validation("v")), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AppError::unauthorized("u")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(AppError::forbidden("f")), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AppError::not_found("n")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::database("d")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
