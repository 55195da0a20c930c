//! Error types for hrchat.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// The main error type for hrchat operations.
///
/// "No records" and "department not found" are successful answers and live in
/// [`QueryResult`](crate::shaper::QueryResult), not here.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request body carried no usable `query` field.
    #[error("Missing 'query' parameter in JSON payload.")]
    MissingQuery,

    /// None of the question templates matched.
    #[error("Query not recognized or unsupported. Please try a different query.")]
    Unrecognized,

    /// The store rejected or failed to run a statement.
    #[error("Database error: {0}")]
    Execution(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid value.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingQuery | Self::Unrecognized => StatusCode::BAD_REQUEST,
            Self::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Execution(_) | Self::Config(_) | Self::InvalidValue(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the caller sent something we cannot answer, as opposed to a server fault.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// JSON body for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for hrchat operations.
pub type ChatResult<T> = Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChatError::Execution("no such table: Employees".to_string());
        assert_eq!(err.to_string(), "Database error: no such table: Employees");
        assert_eq!(
            ChatError::MissingQuery.to_string(),
            "Missing 'query' parameter in JSON payload."
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ChatError::MissingQuery.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ChatError::Unrecognized.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ChatError::Execution("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ChatError::Connection("refused".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert!(ChatError::Unrecognized.is_client_error());
        assert!(!ChatError::Execution("boom".into()).is_client_error());
    }
}
