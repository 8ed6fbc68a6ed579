//! Error types for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// API error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The variational run failed, timed out, or its task panicked.
    #[error("{0}")]
    Optimization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    error: "bad_request".to_string(),
                    message: self.to_string(),
                },
            ),
            ApiError::Optimization(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    success: false,
                    error: detail.clone(),
                    message: "Quantum optimization failed".to_string(),
                },
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    success: false,
                    error: "internal_error".to_string(),
                    message: self.to_string(),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<nanobrick_vqe::VqeError> for ApiError {
    fn from(e: nanobrick_vqe::VqeError) -> Self {
        ApiError::Optimization(e.to_string())
    }
}
