//! Error types for the HTTP API.
//!
//! Workflow failures carry an [`ErrorKind`]; this module turns the kind into
//! a status code and a JSON body of the form `{"code": ..., "message": ...}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use snack_core::ValidationError;
use snack_db::{CacheError, DbError};
use snack_workflow::{ErrorKind, WorkflowError};

/// Request handling errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The body could not be decoded.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Workflow(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Workflow(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Store if err.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidBody(_) => "INVALID_BODY",
            ApiError::Workflow(err) => match err.kind() {
                ErrorKind::Validation => "VALIDATION_ERROR",
                ErrorKind::NotFound => "NOT_FOUND",
                ErrorKind::Conflict => "CONFLICT",
                ErrorKind::Store if err.is_unavailable() => "STORE_UNAVAILABLE",
                ErrorKind::Store => "STORE_ERROR",
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::InvalidBody(_) => self.to_string(),
            ApiError::Workflow(err) => err.message(),
        }
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "Request failed in storage");
        }

        let body = ErrorBody {
            code: self.code(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Failures while wiring the stores at start-up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Report cache error: {0}")]
    Cache(#[from] CacheError),
}
