//! Bonus handler - grant one extra generation for today.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::HttpError;
use crate::state::AppState;

/// Request to grant a bonus generation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusRequest {
    pub user_id: Option<String>,
}

/// Response carrying today's accumulated bonus count.
#[derive(Debug, Serialize)]
pub struct BonusResponse {
    pub message: String,
    pub bonus: u32,
}

/// Add one to the user's same-day bonus allowance.
pub async fn grant(
    State(state): State<AppState>,
    Json(req): Json<BonusRequest>,
) -> Result<Json<BonusResponse>, HttpError> {
    let user_id = req
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| HttpError::BadRequest("userId is required".to_string()))?;

    let bonus = state.bonus.grant(user_id).await?;
    Ok(Json(BonusResponse {
        message: "bonus added".to_string(),
        bonus,
    }))
}
