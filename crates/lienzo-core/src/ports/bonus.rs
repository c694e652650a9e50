//! Bonus quota port definition.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::bonus::BonusRecord;

/// Errors that can occur in bonus quota operations.
#[derive(Debug, Error)]
pub enum BonusError {
    #[error("database error: {0}")]
    Database(String),
}

/// Port for per-user bonus allowance persistence.
#[async_trait]
pub trait BonusRepository: Send + Sync {
    /// The user's bonus record, if one exists.
    async fn get(&self, user_id: &str) -> Result<Option<BonusRecord>, BonusError>;

    /// Insert or replace the user's bonus record.
    async fn upsert(&self, record: &BonusRecord) -> Result<(), BonusError>;
}
