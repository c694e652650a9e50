//! Generation request and prediction job types.

use serde::{Deserialize, Serialize};

use crate::ports::predictor::PredictionHandle;

/// A user's request to generate an image. Transient, created per call.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    /// The raw prompt as supplied by the user.
    pub prompt: String,
    /// Optional style tag; unknown tags resolve to the identity style.
    pub style: Option<String>,
    /// Caller-supplied user identifier (authenticated upstream).
    pub user_id: String,
}

/// Fixed parameters passed to the predictor alongside the prompt.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParams {
    pub width: u32,
    pub height: u32,
    pub guidance_scale: f64,
    pub num_inference_steps: u32,
    pub negative_prompt: String,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            width: 768,
            height: 768,
            guidance_scale: 7.5,
            num_inference_steps: 30,
            negative_prompt: "blurry, low quality, distorted, watermark".to_string(),
        }
    }
}

/// State of an in-flight prediction job.
///
/// `TimedOut` is distinct from `Failed`: the underlying prediction may still
/// complete on the provider's side, but the orchestration has given up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Created,
    Polling,
    Succeeded,
    Failed,
    TimedOut,
}

impl JobState {
    /// Whether this state is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::TimedOut)
    }
}

/// A submitted prediction tracked until it reaches a terminal state.
///
/// Owned exclusively by one in-flight request; exactly one polling loop
/// runs per job, so no duplicate fetch or download can occur.
#[derive(Debug)]
pub struct PredictionJob {
    pub handle: PredictionHandle,
    pub state: JobState,
    pub attempts: u32,
}

impl PredictionJob {
    /// Create a job in the `Created` state from a predictor handle.
    #[must_use]
    pub const fn new(handle: PredictionHandle) -> Self {
        Self {
            handle,
            state: JobState::Created,
            attempts: 0,
        }
    }
}

/// The successful result of a generation: the remote output URL and the
/// name of the locally persisted artifact.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub image_url: String,
    pub saved_as: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_the_fixed_deployment_values() {
        let params = GenerationParams::default();
        assert_eq!(params.width, 768);
        assert_eq!(params.height, 768);
        assert_eq!(params.num_inference_steps, 30);
        assert!(params.negative_prompt.contains("blurry"));
    }

    #[test]
    fn terminal_states() {
        assert!(!JobState::Created.is_terminal());
        assert!(!JobState::Polling.is_terminal());
        assert!(JobState::Succeeded.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::TimedOut.is_terminal());
    }
}
