//! API error types for handler operations
//!
//! Client errors carry no body: a bad request or a missing user is signalled by
//! the status code alone. Validation failures return the field→messages map,
//! and internal failures return a generic [`ErrorResponse`].
//!
//! # Example
//!
//! ```rust
//! use users_service::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("6f1c1f0e-1d8b-4a0c-9f5e-0a4c1b2d3e4f");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert!(error.entity_id.is_some());
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;
use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
use crate::validation::ValidationErrors;

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing a page of users
    List,
    /// Getting a single user by ID
    Get,
    /// Checking whether a user exists
    Exists,
    /// Creating a user under a fresh ID
    Create,
    /// Replacing or inserting a user under a caller-supplied ID
    Replace,
    /// Applying a patch document
    Patch,
    /// Deleting a user
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Exists => write!(f, "exists"),
            Self::Create => write!(f, "create"),
            Self::Replace => write!(f, "replace"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Missing, null or malformed payload, or a nil identifier
    BadRequest,
    /// The targeted user does not exist
    NotFound,
    /// One or more field rules were violated
    ValidationFailed,
    /// Internal server error
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "bad_request"),
            Self::NotFound => write!(f, "not_found"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        format!("{}", self).to_uppercase()
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message, logged but not sent for client errors
    pub message: String,
    /// The ID of the user involved
    pub entity_id: Option<String>,
    /// Field errors, present for `ValidationFailed`
    pub field_errors: Option<ValidationErrors>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_id: None,
            field_errors: None,
        }
    }

    /// Create a "not found" error for a user id
    pub fn not_found(entity_id: impl Into<String>) -> Self {
        Self {
            operation: ApiOperation::Get,
            kind: ApiErrorKind::NotFound,
            message: "User not found".to_string(),
            entity_id: Some(entity_id.into()),
            field_errors: None,
        }
    }

    /// Create a bad request error
    ///
    /// # Example
    ///
    /// ```rust
    /// use users_service::handlers::{ApiError, ApiOperation};
    ///
    /// let error = ApiError::bad_request("Request body is missing")
    ///     .with_operation(ApiOperation::Create);
    /// assert_eq!(error.kind.status_code().as_u16(), 400);
    /// ```
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Create, ApiErrorKind::BadRequest, message)
    }

    /// Create a validation failed error carrying the field errors
    pub fn validation_failed(errors: ValidationErrors) -> Self {
        Self {
            operation: ApiOperation::Create,
            kind: ApiErrorKind::ValidationFailed,
            message: format!("{} validation error(s)", errors.error_count()),
            entity_id: None,
            field_errors: Some(errors),
        }
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Add the id of the user involved
    #[must_use]
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref entity_id) = self.entity_id {
            write!(f, " [User: {}]", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        match self.kind {
            ApiErrorKind::BadRequest | ApiErrorKind::NotFound => {
                tracing::warn!(
                    operation = %self.operation,
                    kind = %self.kind,
                    entity_id = ?self.entity_id,
                    "Request rejected: {}", self.message
                );
                status.into_response()
            }
            ApiErrorKind::ValidationFailed => {
                tracing::warn!(
                    operation = %self.operation,
                    entity_id = ?self.entity_id,
                    "Validation failed: {}", self.message
                );
                (status, Json(self.field_errors.unwrap_or_default())).into_response()
            }
            ApiErrorKind::InternalError => {
                tracing::error!(
                    operation = %self.operation,
                    entity_id = ?self.entity_id,
                    "API error: {}", self.message
                );
                let body = ErrorResponse::with_code(
                    status,
                    self.kind.error_code(),
                    "An internal error occurred",
                );
                (status, Json(body)).into_response()
            }
        }
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::FindById => ApiOperation::Get,
        RepositoryOperation::Insert => ApiOperation::Create,
        RepositoryOperation::Update => ApiOperation::Patch,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);
        let kind = match err.kind {
            RepositoryErrorKind::NotFound => ApiErrorKind::NotFound,
            RepositoryErrorKind::AlreadyExists => ApiErrorKind::InternalError,
        };

        Self {
            operation,
            kind,
            message: err.to_string(),
            entity_id: err.entity_id,
            field_errors: None,
        }
    }
}
