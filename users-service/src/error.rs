//! Service error type and the JSON body used for internal failures
//!
//! Request handlers report failures through
//! [`ApiError`](crate::handlers::ApiError); [`Error`] covers startup and
//! serving.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration loaded but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_with_code() {
        let response = ErrorResponse::with_code(StatusCode::INTERNAL_SERVER_ERROR, "X", "boom");
        assert_eq!(response.status, 500);
        assert_eq!(response.code.as_deref(), Some("X"));
        assert_eq!(response.to_string(), "boom");
    }

    #[test]
    fn test_error_response_json_shape() {
        let json = serde_json::to_value(ErrorResponse::with_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        ))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": "An internal error occurred",
                "code": "INTERNAL_ERROR",
                "status": 500,
            })
        );
    }

    #[test]
    fn test_figment_error_is_boxed() {
        let err = Error::from(figment::Error::from("missing field".to_string()));
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_io_error_converts() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken"));
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: port taken");
    }
}
