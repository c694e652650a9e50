//! Predictor port definition.
//!
//! The predictor is an external asynchronous image-generation service:
//! a prediction is created, then queried by handle until it reaches a
//! terminal status, and its output is fetched as raw bytes.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::generation::GenerationParams;

/// Errors that can occur talking to the predictor.
#[derive(Debug, Error)]
pub enum PredictorError {
    /// The create call was rejected or returned no usable job handle.
    /// Not retried; surfaced to the caller.
    #[error("prediction could not be submitted: {0}")]
    Submission(String),

    /// The predictor API answered with an HTTP error status.
    #[error("predictor request failed with status {status}: {url}")]
    Api { status: u16, url: String },

    /// Network-level failure reaching the predictor.
    #[error("network error: {0}")]
    Network(String),

    /// The predictor returned a response the client could not interpret.
    #[error("invalid predictor response: {0}")]
    InvalidResponse(String),
}

/// Handle for polling a submitted prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionHandle {
    /// The predictor's job id.
    pub id: String,
    /// Opaque poll reference (a URL for HTTP predictors).
    pub poll_url: String,
}

/// Status vocabulary of the predictor, normalized by the adapter.
///
/// The explicit status field is the canonical terminal-detection rule for
/// this deployment; output contents are never consulted for termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    /// Whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// One observation of a prediction's state.
#[derive(Debug, Clone)]
pub struct PredictionSnapshot {
    pub status: PredictionStatus,
    /// Output references (URLs) once the prediction has succeeded.
    pub output: Vec<String>,
    /// Provider-reported error detail, if any.
    pub error: Option<String>,
}

/// Port for the external asynchronous image-generation service.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Submit a prompt for generation. Returns a handle for polling.
    async fn create(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<PredictionHandle, PredictorError>;

    /// Query the current state of a prediction.
    async fn poll(&self, handle: &PredictionHandle) -> Result<PredictionSnapshot, PredictorError>;

    /// Fetch the bytes behind an output reference.
    async fn fetch(&self, output_url: &str) -> Result<Vec<u8>, PredictorError>;
}
