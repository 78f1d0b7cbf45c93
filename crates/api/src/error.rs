//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::StorageError;
use thiserror::Error;
use tracing::error;

/// Errors returned from request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Details stay in the log; clients only see a generic failure
        error!("Request failed: {}", self);

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// Errors that abort server startup
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics recorder error: {0}")]
    Metrics(String),

    #[error("Invalid rate limit configuration: {0}")]
    RateLimit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_is_500() {
        let response =
            ApiError::from(StorageError::Database("connection refused".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
