//! HTTP-facing error type and the mappings from domain failures.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use marquee_core::CatalogError;

/// Handler result alias.
pub type AppResult<T> = Result<T, AppError>;

/// An HTTP error: a status code plus a client-safe message.
///
/// Renders as `{"error": {"message": ..., "status": ...}}`, the single
/// error shape every endpoint shares.
#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Status this error renders with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(message) => Self::bad_request(message),
            CatalogError::NotFound(message) => Self::not_found(message),
            CatalogError::Conflict(message) => Self::conflict(message),
            CatalogError::Internal(message) => {
                // Detail stays in the log; clients get a generic body.
                error!("Internal error: {}", message);
                Self::internal("Internal server error")
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        error!("Unhandled error: {:#}", err);
        Self::internal("Internal server error")
    }
}
