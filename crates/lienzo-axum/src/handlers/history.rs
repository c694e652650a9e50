//! History handler - list a user's completed generations.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use lienzo_core::domain::history::HistoryRecord;

use crate::error::HttpError;
use crate::state::AppState;

/// One history entry as exposed to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub prompt: String,
    pub image_url: String,
    pub saved_as: String,
    pub timestamp: DateTime<Utc>,
}

impl From<HistoryRecord> for HistoryEntry {
    fn from(record: HistoryRecord) -> Self {
        Self {
            prompt: record.prompt,
            image_url: record.image_url,
            saved_as: record.saved_as,
            timestamp: record.created_at,
        }
    }
}

/// List a user's generations, most recent first.
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, HttpError> {
    let records = state.history.list_by_user(&user_id).await?;
    Ok(Json(records.into_iter().map(HistoryEntry::from).collect()))
}
