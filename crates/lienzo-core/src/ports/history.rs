//! History ledger port definition.
//!
//! The ledger is an append-only per-user record of completed generations.
//! Appending must only happen after the artifact write succeeded; a record
//! referencing a missing artifact must never exist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::history::{HistoryRecord, NewHistoryRecord};

/// Errors that can occur in history ledger operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("database error: {0}")]
    Database(String),
}

/// Port for generation history persistence.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append one history record, returning its id.
    async fn append(&self, record: NewHistoryRecord) -> Result<i64, HistoryError>;

    /// All records for a user, most recent first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<HistoryRecord>, HistoryError>;

    /// Count of a user's records with `created_at >= since`.
    async fn count_since(&self, user_id: &str, since: DateTime<Utc>)
    -> Result<i64, HistoryError>;

    /// Delete the record matching `(user_id, saved_as)`.
    /// Returns the number of rows removed.
    async fn delete(&self, user_id: &str, saved_as: &str) -> Result<u64, HistoryError>;
}
