//! `SQLite` implementation of the `HistoryRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use lienzo_core::domain::history::{HistoryRecord, NewHistoryRecord};
use lienzo_core::ports::history::{HistoryError, HistoryRepository};

/// `SQLite` implementation of the `HistoryRepository` trait.
pub struct SqliteHistoryRepository {
    pool: SqlitePool,
}

impl SqliteHistoryRepository {
    /// Create a new `SQLite` history repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for SqliteHistoryRepository {
    async fn append(&self, record: NewHistoryRecord) -> Result<i64, HistoryError> {
        let result = sqlx::query(
            "INSERT INTO generation_history (user_id, prompt, image_url, saved_as, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.user_id)
        .bind(&record.prompt)
        .bind(&record.image_url)
        .bind(&record.saved_as)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::Database(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<HistoryRecord>, HistoryError> {
        let rows = sqlx::query(
            "SELECT id, user_id, prompt, image_url, saved_as, created_at
             FROM generation_history
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HistoryError::Database(e.to_string()))?;

        let records = rows
            .iter()
            .map(|row| HistoryRecord {
                id: row.get("id"),
                user_id: row.get("user_id"),
                prompt: row.get("prompt"),
                image_url: row.get("image_url"),
                saved_as: row.get("saved_as"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(records)
    }

    async fn count_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, HistoryError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM generation_history
             WHERE user_id = ? AND created_at >= ?",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| HistoryError::Database(e.to_string()))?;

        Ok(row.get("count"))
    }

    async fn delete(&self, user_id: &str, saved_as: &str) -> Result<u64, HistoryError> {
        let result = sqlx::query(
            "DELETE FROM generation_history WHERE user_id = ? AND saved_as = ?",
        )
        .bind(user_id)
        .bind(saved_as)
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
