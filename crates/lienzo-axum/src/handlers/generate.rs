//! Generation handler - submit a prompt and wait for the persisted image.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use lienzo_core::domain::generation::GenerationRequest;

use crate::error::HttpError;
use crate::state::AppState;

/// Request to generate an image.
///
/// Fields are optional at the serde level so missing ones produce a 400
/// with a useful message instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    pub user_id: Option<String>,
    pub style: Option<String>,
}

/// Response for a completed generation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub message: String,
    pub image_url: String,
    pub saved_as: String,
}

/// Run one generation request to completion.
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, HttpError> {
    let (Some(prompt), Some(user_id)) = (req.prompt, req.user_id) else {
        return Err(HttpError::BadRequest(
            "prompt and userId are required".to_string(),
        ));
    };

    let outcome = state
        .generation
        .generate(GenerationRequest {
            prompt,
            style: req.style,
            user_id,
        })
        .await?;

    Ok(Json(GenerateResponse {
        message: "image generated".to_string(),
        image_url: outcome.image_url,
        saved_as: outcome.saved_as,
    }))
}
