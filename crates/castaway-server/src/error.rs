//! Error types for the HTTP API.
//!
//! [`ApiError`] unifies handler failures into one enum that renders as a
//! JSON body `{"error": ..., "status": ...}` via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use castaway_memory::MemoryError;
use tracing::error;

/// Errors that can occur while handling a request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body does not match the game event schema.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A record store operation failed.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// A blocking store task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Memory(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Memory(e) if e.is_conflict() => StatusCode::CONFLICT,
            Self::Memory(_) | Self::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
