//! Outward-facing error taxonomy for the orchestration services.

use thiserror::Error;

/// Everything that can go wrong handling one generation request.
///
/// None of these trigger automatic retries above the poller's own bounded
/// loop; resubmission is the caller's responsibility.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Caller must fix the input; never retried.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The user's daily allowance is exhausted.
    #[error("daily generation limit reached")]
    QuotaExceeded { restantes: u32 },

    /// The predictor rejected the submission or returned no job handle.
    #[error("prediction could not be submitted: {0}")]
    Submission(String),

    /// The predictor reported an explicit failure status.
    #[error("prediction failed: {0}")]
    PredictionFailed(String),

    /// The attempt budget ran out before a terminal status was observed.
    #[error("prediction did not finish within {attempts} polls")]
    PollTimeout { attempts: u32 },

    /// The prediction succeeded but its output was unusable.
    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    /// Writing the artifact to durable storage failed.
    #[error("artifact storage failed: {0}")]
    Storage(String),

    /// The metadata store failed.
    #[error("metadata store failure: {0}")]
    Downstream(String),
}

/// Errors for the deletion coordinator.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// No history record matches `(user_id, saved_as)`, whether or not the
    /// file existed.
    #[error("no generation named '{saved_as}' found for this user")]
    NotFound { saved_as: String },

    /// The metadata store failed before anything was removed.
    #[error("metadata store failure: {0}")]
    Downstream(String),
}
