use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Machine-readable codes carried in every error body. Clients branch on
/// these, never on the message text.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error shared by the service layer and the HTTP surface.
///
/// Rendered as `{"code": "ALREADY_EXISTS", "message": "code 2378561284420001 already registered"}`
/// with the matching HTTP status.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No record under the requested key. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Key already taken, or a unique resource is exhausted. HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// Input is malformed or incomplete. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Credentials missing or rejected. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// The store failed. HTTP 500.
    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Internal(String),
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: &'static str,
    pub message: &'a str,
}

impl ServiceError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, error_code::NOT_FOUND),
            ServiceError::Conflict(_) => (StatusCode::CONFLICT, error_code::ALREADY_EXISTS),
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, error_code::VALIDATION_FAILED),
            ServiceError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, error_code::UNAUTHENTICATED),
            ServiceError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, error_code::STORAGE_ERROR),
            ServiceError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, error_code::INTERNAL),
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.parts().1
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::NotFound(m)
            | ServiceError::Conflict(m)
            | ServiceError::Validation(m)
            | ServiceError::Unauthorized(m)
            | ServiceError::Storage(m)
            | ServiceError::Internal(m) => m,
        }
    }

    /// Whether the same request may succeed later without changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Storage(_) | ServiceError::Internal(_))
    }

    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            code: self.error_code(),
            message: self.message(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status_code(), axum::Json(self.body())).into_response()
    }
}
