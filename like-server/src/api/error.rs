//! API error handling.
//!
//! Provides consistent error responses for the API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use like_engine::LikeError;
use serde::Serialize;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// API error type that can be converted to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a 400 Bad Request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// Create a 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    /// Create a 503 Service Unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", message)
    }

    /// Create a 504 Gateway Timeout error.
    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            code: self.code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<LikeError> for ApiError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::InvalidInput(msg) => ApiError::bad_request(msg),
            LikeError::CredentialsNotLoaded => ApiError::service_unavailable(
                "Server is still loading tokens. Please try again in a moment.",
            ),
            LikeError::NoTokensAvailable => {
                ApiError::internal("No tokens available. Token refresh might have failed.")
            }
            LikeError::OrchestrationTimeout(_) => ApiError::gateway_timeout(
                "Request processing timed out. The upstream API might be slow.",
            ),
            other => {
                tracing::error!(error = %other, "Error processing like request");
                ApiError::internal(other.to_string())
            }
        }
    }
}
