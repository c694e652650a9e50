//! Generation history types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed generation in a user's history.
///
/// A record exists only if its referenced artifact was durably written
/// first; records are deleted only through the deletion coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub user_id: String,
    pub prompt: String,
    /// The predictor's remote output URL.
    pub image_url: String,
    /// Name of the locally persisted artifact.
    pub saved_as: String,
    pub created_at: DateTime<Utc>,
}

/// Data for appending a new history record.
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub user_id: String,
    pub prompt: String,
    pub image_url: String,
    pub saved_as: String,
    pub created_at: DateTime<Utc>,
}
