//! `SQLite` implementation of the `BonusRepository` trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use lienzo_core::domain::bonus::BonusRecord;
use lienzo_core::ports::bonus::{BonusError, BonusRepository};

/// `SQLite` implementation of the `BonusRepository` trait.
///
/// One row per user; `date` is stored as an ISO `YYYY-MM-DD` string.
pub struct SqliteBonusRepository {
    pool: SqlitePool,
}

impl SqliteBonusRepository {
    /// Create a new `SQLite` bonus repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BonusRepository for SqliteBonusRepository {
    async fn get(&self, user_id: &str) -> Result<Option<BonusRecord>, BonusError> {
        let row = sqlx::query(
            "SELECT user_id, bonus_count, date FROM bonus_quota WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BonusError::Database(e.to_string()))?;

        row.map(|r| {
            let date_str: String = r.get("date");
            let date = date_str
                .parse::<NaiveDate>()
                .map_err(|e| BonusError::Database(format!("bad date '{date_str}': {e}")))?;
            let bonus_count: i64 = r.get("bonus_count");
            Ok(BonusRecord {
                user_id: r.get("user_id"),
                bonus_count: u32::try_from(bonus_count.max(0)).unwrap_or(0),
                date,
            })
        })
        .transpose()
    }

    async fn upsert(&self, record: &BonusRecord) -> Result<(), BonusError> {
        sqlx::query(
            "INSERT INTO bonus_quota (user_id, bonus_count, date)
             VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                 bonus_count = excluded.bonus_count,
                 date = excluded.date",
        )
        .bind(&record.user_id)
        .bind(i64::from(record.bonus_count))
        .bind(record.date.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| BonusError::Database(e.to_string()))?;

        Ok(())
    }
}
