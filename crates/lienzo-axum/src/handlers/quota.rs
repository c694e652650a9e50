//! Quota handler - report remaining daily allowance.

use axum::Json;
use axum::extract::{Path, State};

use lienzo_core::services::QuotaStatus;

use crate::error::HttpError;
use crate::state::AppState;

/// Whether the user may generate right now, and how many slots remain.
///
/// A pure read: concurrent in-flight generations may still consume the
/// reported slots before the caller submits.
pub async fn can_generate(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<QuotaStatus>, HttpError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(HttpError::BadRequest("userId is required".to_string()));
    }
    let status = state.quota.remaining(user_id).await?;
    Ok(Json(status))
}
