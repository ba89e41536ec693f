//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for request handling. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response. A failed request never takes the process down.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::UserId;
use crate::persistence::StoreError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "user not found: 7"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Request-level error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1999 | Client input    | 400 / 422                  |
/// | 2000–2999 | Not Found       | 404 Not Found              |
/// | 3000–3999 | Server          | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body is not valid JSON or has the wrong shape.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Path id is not a valid integer.
    #[error("invalid user id: {0}")]
    InvalidId(String),

    /// Storage rejected the write because of a schema constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// No user with the given id.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Database connection or query failure.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MalformedRequest(_) => 1001,
            Self::InvalidId(_) => 1002,
            Self::ConstraintViolation(_) => 1003,
            Self::UserNotFound(_) => 2001,
            Self::StorageUnavailable(_) => 3001,
        }
    }

    /// Returns the message sent to the client.
    ///
    /// Storage failures are reported generically; the driver detail only
    /// goes to the log.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::StorageUnavailable(_) => "storage unavailable".to_string(),
            other => other.to_string(),
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_) | Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::ConstraintViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UserNotFound(_) => StatusCode::NOT_FOUND,
            Self::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::UserNotFound(id),
            StoreError::ConstraintViolation(msg) => Self::ConstraintViolation(msg),
            StoreError::Unavailable(msg) => Self::StorageUnavailable(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.client_message(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
