//! Internal error types for predictor API operations.
//!
//! These errors are internal to `lienzo-replicate` and are mapped to the
//! core `PredictorError` at the port boundary.

use thiserror::Error;

use lienzo_core::ports::predictor::PredictorError;

/// Result type alias for predictor client operations.
pub type ReplicateResult<T> = Result<T, ReplicateError>;

/// Errors related to the predictor HTTP API.
#[derive(Debug, Error)]
pub enum ReplicateError {
    /// API request failed with an HTTP error status.
    #[error("predictor API request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The create call answered without a prediction id or poll URL.
    #[error("prediction was not accepted: {message}")]
    SubmissionRejected {
        /// Description of what was missing or rejected
        message: String,
    },

    /// API returned an invalid or unexpected response body.
    #[error("invalid response from predictor API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<ReplicateError> for PredictorError {
    fn from(err: ReplicateError) -> Self {
        match err {
            ReplicateError::ApiRequestFailed { status, url } => Self::Api { status, url },
            ReplicateError::SubmissionRejected { message } => Self::Submission(message),
            ReplicateError::InvalidResponse { message } => Self::InvalidResponse(message),
            ReplicateError::Network(e) => Self::Network(e.to_string()),
            ReplicateError::InvalidUrl(e) => Self::InvalidResponse(e.to_string()),
        }
    }
}
