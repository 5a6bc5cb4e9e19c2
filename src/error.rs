// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// Resolution and fetch errors are never caught inside the aggregator;
/// they bubble up to the route layer which turns them into a fallback
/// redirect for page requests.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Identity resolution failed: {0}")]
    Resolution(String),

    #[error("Record fetch failed: {0}")]
    Fetch(String),

    #[error("Proxy upstream error: {0}")]
    Proxy(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Resolution(msg) => {
                (StatusCode::NOT_FOUND, "resolution_failed", Some(msg.clone()))
            }
            AppError::Fetch(msg) => (StatusCode::BAD_GATEWAY, "fetch_failed", Some(msg.clone())),
            AppError::Proxy(msg) => {
                tracing::error!(error = %msg, "Proxy upstream error");
                (StatusCode::BAD_GATEWAY, "proxy_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
