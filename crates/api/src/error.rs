//! Error-to-response mapping.
//!
//! Every endpoint fails with the same shape: `{"error": "<message>"}` and the
//! status code of the matching [`AppError`] category.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use courier_core::completion::CompletionError;
use courier_core::storage::StorageError;
use courier_core::upload::ValidationError;
use courier_shared::AppError;
use serde::Serialize;
use tracing::{error, warn};

/// Body of every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Underlying error message.
    pub error: String,
}

/// Handler error, rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError(AppError);

impl ApiError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self(AppError::Validation(msg.into()))
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self(AppError::Internal(msg.into()))
    }

    /// The application error behind this response.
    #[must_use]
    pub fn inner(&self) -> &AppError {
        &self.0
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => Self(AppError::NotFound(err.to_string())),
            StorageError::InvalidKey(_) => Self(AppError::Validation(err.to_string())),
            _ => Self(AppError::ExternalService(err.to_string())),
        }
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        Self(AppError::ExternalService(err.to_string()))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
        } else {
            warn!(code = self.0.error_code(), error = %self.0, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.message().to_string(),
            }),
        )
            .into_response()
    }
}
