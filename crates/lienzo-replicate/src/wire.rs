//! Wire types for the predictor HTTP API.

use serde::{Deserialize, Serialize};

use lienzo_core::domain::generation::GenerationParams;
use lienzo_core::ports::predictor::PredictionStatus;

/// Body of a create-prediction request.
#[derive(Debug, Serialize)]
pub struct CreatePredictionRequest<'a> {
    pub version: &'a str,
    pub input: PredictionInput<'a>,
}

/// Model input: the effective prompt plus the fixed generation parameters.
#[derive(Debug, Serialize)]
pub struct PredictionInput<'a> {
    pub prompt: &'a str,
    pub width: u32,
    pub height: u32,
    pub guidance_scale: f64,
    pub num_inference_steps: u32,
    pub negative_prompt: &'a str,
}

impl<'a> PredictionInput<'a> {
    pub fn new(prompt: &'a str, params: &'a GenerationParams) -> Self {
        Self {
            prompt,
            width: params.width,
            height: params.height,
            guidance_scale: params.guidance_scale,
            num_inference_steps: params.num_inference_steps,
            negative_prompt: &params.negative_prompt,
        }
    }
}

/// Poll URLs attached to a prediction.
#[derive(Debug, Default, Deserialize)]
pub struct PredictionUrls {
    pub get: Option<String>,
}

/// A prediction as returned by both the create and the poll endpoints.
#[derive(Debug, Deserialize)]
pub struct PredictionResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
    #[serde(default)]
    pub output: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Normalize the provider's status string.
///
/// Unknown values are reported as `None` so the caller can decide how to
/// treat them (the client logs and keeps polling).
pub fn parse_status(status: &str) -> Option<PredictionStatus> {
    match status {
        "starting" => Some(PredictionStatus::Starting),
        "processing" => Some(PredictionStatus::Processing),
        "succeeded" => Some(PredictionStatus::Succeeded),
        "failed" => Some(PredictionStatus::Failed),
        "canceled" => Some(PredictionStatus::Canceled),
        _ => None,
    }
}
