//! Error types for masw-sv

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400): missing multipart field, unparsable form value
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Geometry extraction failure (400)
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            // Extraction failures are caller errors: the uploaded file
            // does not have the promised layout. The kind stays visible
            // in the message so clients can distinguish them.
            ApiError::Extract(ref err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Io(ref err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
