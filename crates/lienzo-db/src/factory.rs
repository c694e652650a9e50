//! Composition utilities for wiring the `SQLite` repositories.
//!
//! Pure construction; no domain logic lives here.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::repositories::{SqliteBonusRepository, SqliteHistoryRepository};

/// Factory for creating repository instances with `SQLite` backends.
pub struct StoreFactory;

impl StoreFactory {
    /// Create a history repository from a pool.
    pub fn history_repository(pool: SqlitePool) -> Arc<SqliteHistoryRepository> {
        Arc::new(SqliteHistoryRepository::new(pool))
    }

    /// Create a bonus repository from a pool.
    pub fn bonus_repository(pool: SqlitePool) -> Arc<SqliteBonusRepository> {
        Arc::new(SqliteBonusRepository::new(pool))
    }
}
