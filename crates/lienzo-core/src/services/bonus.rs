//! Bonus accrual - thin orchestrator over the bonus repository.

use std::sync::Arc;

use chrono::Local;

use crate::domain::bonus::BonusRecord;
use crate::ports::bonus::{BonusError, BonusRepository};

/// Grants same-day bonus allowance (e.g. after a rewarded action).
///
/// No upper bound is enforced on the accrued count; callers that need a cap
/// should gate the rewarded action itself.
pub struct BonusService {
    repo: Arc<dyn BonusRepository>,
}

impl BonusService {
    /// Create a new bonus service.
    pub fn new(repo: Arc<dyn BonusRepository>) -> Self {
        Self { repo }
    }

    /// Grant one bonus generation for today.
    ///
    /// Same day: increments the count. New day: resets to 1 and stamps
    /// today's date. Returns the resulting count.
    pub async fn grant(&self, user_id: &str) -> Result<u32, BonusError> {
        let today = Local::now().date_naive();
        let next = match self.repo.get(user_id).await? {
            Some(record) if record.date == today => record.bonus_count + 1,
            _ => 1,
        };
        self.repo
            .upsert(&BonusRecord {
                user_id: user_id.to_string(),
                bonus_count: next,
                date: today,
            })
            .await?;
        tracing::info!(target: "lienzo.quota", user_id, bonus = next, "bonus granted");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    struct MemBonus {
        record: StdMutex<Option<BonusRecord>>,
    }

    #[async_trait]
    impl BonusRepository for MemBonus {
        async fn get(&self, _user_id: &str) -> Result<Option<BonusRecord>, BonusError> {
            Ok(self.record.lock().unwrap().clone())
        }

        async fn upsert(&self, record: &BonusRecord) -> Result<(), BonusError> {
            *self.record.lock().unwrap() = Some(record.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn same_day_grants_accumulate() {
        let repo = Arc::new(MemBonus {
            record: StdMutex::new(None),
        });
        let service = BonusService::new(repo);
        assert_eq!(service.grant("ana").await.unwrap(), 1);
        assert_eq!(service.grant("ana").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn a_new_day_resets_the_count() {
        let yesterday = Local::now().date_naive().pred_opt().unwrap();
        let repo = Arc::new(MemBonus {
            record: StdMutex::new(Some(BonusRecord {
                user_id: "ana".to_string(),
                bonus_count: 7,
                date: yesterday,
            })),
        });
        let service = BonusService::new(repo);
        assert_eq!(service.grant("ana").await.unwrap(), 1);
    }
}
