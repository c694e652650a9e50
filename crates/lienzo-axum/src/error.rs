//! Axum-specific error type and mappings.
//!
//! Maps core service errors to HTTP status codes and a JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use lienzo_core::errors::{DeleteError, GenerateError};
use lienzo_core::ports::bonus::BonusError;
use lienzo_core::ports::history::HistoryError;
use lienzo_core::services::QuotaError;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Daily generation allowance exhausted.
    #[error("daily generation limit reached")]
    QuotaExhausted { restantes: u32 },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    /// Additional context for debugging, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    /// Remaining allowance, present on quota errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    restantes: Option<u32>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, error, detail, restantes) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None, None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None, None),
            Self::QuotaExhausted { restantes } => (
                StatusCode::TOO_MANY_REQUESTS,
                "daily generation limit reached".to_string(),
                None,
                Some(restantes),
            ),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "image generation failed".to_string(),
                Some(msg),
                None,
            ),
        };

        let body = ErrorBody {
            error,
            detail,
            restantes,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<GenerateError> for HttpError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::Validation(msg) => Self::BadRequest(msg),
            GenerateError::QuotaExceeded { restantes } => Self::QuotaExhausted { restantes },
            GenerateError::Submission(msg) => Self::Internal(format!("submission failed: {msg}")),
            GenerateError::PredictionFailed(msg) => {
                Self::Internal(format!("prediction failed: {msg}"))
            }
            GenerateError::PollTimeout { attempts } => {
                Self::Internal(format!("prediction did not finish within {attempts} polls"))
            }
            GenerateError::InvalidArtifact(msg) => {
                Self::Internal(format!("invalid artifact: {msg}"))
            }
            GenerateError::Storage(msg) => Self::Internal(format!("storage failure: {msg}")),
            GenerateError::Downstream(msg) => Self::Internal(format!("store failure: {msg}")),
        }
    }
}

impl From<DeleteError> for HttpError {
    fn from(err: DeleteError) -> Self {
        match err {
            DeleteError::NotFound { saved_as } => {
                Self::NotFound(format!("no generation named '{saved_as}' for this user"))
            }
            DeleteError::Downstream(msg) => Self::Internal(format!("store failure: {msg}")),
        }
    }
}

impl From<QuotaError> for HttpError {
    fn from(err: QuotaError) -> Self {
        match err {
            QuotaError::Exhausted { restantes } => Self::QuotaExhausted { restantes },
            QuotaError::Downstream(msg) => Self::Internal(format!("store failure: {msg}")),
        }
    }
}

impl From<HistoryError> for HttpError {
    fn from(err: HistoryError) -> Self {
        Self::Internal(format!("store failure: {err}"))
    }
}

impl From<BonusError> for HttpError {
    fn from(err: BonusError) -> Self {
        Self::Internal(format!("store failure: {err}"))
    }
}
