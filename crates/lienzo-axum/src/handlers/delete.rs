//! Deletion handler - remove an artifact and its history record together.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::HttpError;
use crate::state::AppState;

/// Request to delete one generation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub user_id: Option<String>,
    pub saved_as: Option<String>,
}

/// Deletion confirmation.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Delete a generation identified by `(userId, savedAs)`.
pub async fn delete(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let (Some(user_id), Some(saved_as)) = (req.user_id, req.saved_as) else {
        return Err(HttpError::BadRequest(
            "userId and savedAs are required".to_string(),
        ));
    };
    if user_id.trim().is_empty() || saved_as.trim().is_empty() {
        return Err(HttpError::BadRequest(
            "userId and savedAs are required".to_string(),
        ));
    }

    state.deletion.delete(user_id.trim(), saved_as.trim()).await?;
    Ok(Json(DeleteResponse {
        message: "image deleted".to_string(),
    }))
}
