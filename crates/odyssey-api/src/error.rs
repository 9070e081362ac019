//! Odyssey — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use odyssey_content::ContentError;
use odyssey_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

use crate::presenter;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The content source could not be prepared.
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// The HTTP client could not be built.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Chat text to relay to the player.
    pub reply: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::InvalidInput { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input"),
            DomainError::SessionNotStarted => {
                (StatusCode::UNPROCESSABLE_ENTITY, "session_not_started")
            }
            DomainError::SessionFinished => (StatusCode::UNPROCESSABLE_ENTITY, "session_finished"),
            DomainError::InputInProgress => (StatusCode::CONFLICT, "input_in_progress"),
            DomainError::ContentUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "content_unavailable")
            }
            DomainError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
            reply: presenter::render_rejection(&self.0),
        };

        (status, Json(body)).into_response()
    }
}
