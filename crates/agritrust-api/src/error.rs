//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Domain errors from the registry, log and core crates map to HTTP status
//! codes and a JSON body `{ "error": { "code", "message" } }`. Messages of
//! 5xx errors are logged and never returned to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use agritrust_core::{AgriTrustError, CanonicalizationError};
use agritrust_registry::{
    ConsumerError, IndexError, RegistrationError, StoreError, SubmissionError,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `NOT_FOUND`.
    pub code: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// Semantically invalid content (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Body could not be parsed (422).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict with existing state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Transient dependency failure (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// 500. The message is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => Self::Conflict(err.to_string()),
            StoreError::Unavailable(_) => Self::ServiceUnavailable(err.to_string()),
        }
    }
}

impl From<AgriTrustError> for AppError {
    fn from(err: AgriTrustError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CanonicalizationError> for AppError {
    fn from(err: CanonicalizationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Invalid(_) => Self::Validation(err.to_string()),
            RegistrationError::Store(e) => e.into(),
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::InvalidDraft(_) | SubmissionError::Serialization(_) => {
                Self::Validation(err.to_string())
            }
            SubmissionError::UnknownFarmer(_) => Self::NotFound(err.to_string()),
            SubmissionError::Index(IndexError::CodeGenerationExhausted { .. }) => {
                Self::ServiceUnavailable(err.to_string())
            }
            SubmissionError::Log(_) => Self::Conflict(err.to_string()),
            SubmissionError::Store(e) => e.into(),
            SubmissionError::Index(_) | SubmissionError::Credential(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<ConsumerError> for AppError {
    fn from(err: ConsumerError) -> Self {
        match err {
            ConsumerError::UnknownCode(_) => Self::NotFound(err.to_string()),
            ConsumerError::InvalidRating(_) | ConsumerError::EmptyField(_) => {
                Self::Validation(err.to_string())
            }
            ConsumerError::Store(e) => e.into(),
        }
    }
}
