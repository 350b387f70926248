//! Error types for Libris server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type.
///
/// The first four variants are the client-visible taxonomy; `Database` and
/// `Internal` exist for propagation inside the crate and are masked by the
/// services before a response is produced.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Replace infrastructure errors with a domain-level fallback.
    ///
    /// Taxonomy errors pass through unchanged; `Database`/`Internal` are
    /// logged and swapped for `fallback` so no internal detail reaches a
    /// client.
    pub fn mask_internal(self, fallback: AppError) -> AppError {
        match self {
            AppError::Database(e) => {
                tracing::error!("database error: {:?}", e);
                fallback
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                fallback
            }
            other => other,
        }
    }
}

impl From<validator::ValidationError> for AppError {
    fn from(e: validator::ValidationError) -> Self {
        let message = e
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| e.code.to_string());
        AppError::Validation(message)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Only the first failure is reported to the client.
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(_, errs)| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Validation error".to_string());
        AppError::Validation(message)
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Database(e) => {
                tracing::error!("unmasked database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { error: message });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_documented_status_codes() {
        let cases = [
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Authentication("no".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (AppError::Conflict("dup".into()), StatusCode::CONFLICT),
            (AppError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (
                AppError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn mask_internal_preserves_taxonomy_errors() {
        let masked = AppError::Conflict("Username already exists".into())
            .mask_internal(AppError::Validation("Registration failed".into()));
        assert!(matches!(masked, AppError::Conflict(_)));

        let masked = AppError::Internal("pool exhausted".into())
            .mask_internal(AppError::Validation("Registration failed".into()));
        assert!(matches!(masked, AppError::Validation(_)));
    }
}
