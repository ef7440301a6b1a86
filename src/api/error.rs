//! API error handling.
//!
//! Provides consistent error responses for the API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::Error;

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

    /// Create a 404 Not Found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// Create a 422 Unprocessable Entity error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    /// Create a 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    /// Create a 503 Service Unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", message)
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

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound { entity_type, id } => {
                ApiError::not_found(format!("{} with id '{}' not found", entity_type, id))
            }
            Error::Validation(msg) => ApiError::validation(msg),
            Error::Configuration(msg) => ApiError::bad_request(msg),
            Error::Extractor(msg) => {
                // Detail stays in the logs; the client gets the generic message.
                ApiError::internal(msg)
            }
            Error::Upstream(e) => {
                tracing::error!("Upstream error: {}", e);
                ApiError::internal("Upstream request failed")
            }
            Error::DatabaseSqlx(e) => {
                tracing::error!("Database error: {}", e);
                ApiError::internal("Database error occurred")
            }
            Error::Io(e) => {
                tracing::error!("IO error: {}", e);
                ApiError::internal("IO error occurred")
            }
            Error::Serialization(e) => {
                tracing::error!("Serialization error: {}", e);
                ApiError::internal("An unexpected error occurred")
            }
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Missing channel url");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "BAD_REQUEST");
        assert_eq!(err.message, "Missing channel url");
    }

    #[test]
    fn test_from_domain_not_found() {
        let domain_err = Error::not_found("LibraryEntry", "abc123");
        let api_err: ApiError = domain_err.into();

        assert_eq!(api_err.status, StatusCode::NOT_FOUND);
        assert!(api_err.message.contains("abc123"));
    }

    #[test]
    fn test_from_extractor_error_is_internal() {
        let api_err: ApiError = Error::extractor("Extractor process failed").into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
