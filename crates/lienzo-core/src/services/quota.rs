//! Daily quota computation and race-free admission.
//!
//! `remaining()` is a pure read of ledger + bonus state. The admission path
//! (`try_reserve`) closes the check-then-act race: two concurrent requests
//! for the same user must not both pass the check before either's history
//! append lands. Admission takes a per-user critical section around
//! check+reserve only — never around the generation pipeline — and tracks
//! admitted-but-not-yet-recorded requests in an in-process reservation
//! count that the caller releases once its ledger append has landed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Local, LocalResult, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;

use crate::ports::bonus::BonusRepository;
use crate::ports::history::HistoryRepository;

/// Errors from the quota service.
#[derive(Debug, Error)]
pub enum QuotaError {
    /// The user has no remaining allowance today.
    #[error("daily generation limit reached")]
    Exhausted { restantes: u32 },

    /// Ledger or bonus store failure.
    #[error("metadata store failure: {0}")]
    Downstream(String),
}

/// Result of a quota read.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuotaStatus {
    pub allowed: bool,
    pub restantes: u32,
}

/// Start of the current local day, as a UTC instant for ledger queries.
#[must_use]
pub fn start_of_local_day() -> DateTime<Utc> {
    day_start(Local::now())
}

fn day_start(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // DST gap at midnight: treat midnight as UTC
        LocalResult::None => Utc.from_utc_datetime(&midnight),
    }
}

type ReservedMap = Arc<StdMutex<HashMap<String, u32>>>;

/// An admitted generation slot.
///
/// Held by the caller for the duration of its generation attempt and
/// dropped once the ledger append has landed (or the attempt failed, which
/// frees the slot since failures never consume quota).
pub struct QuotaReservation {
    user_id: String,
    reserved: ReservedMap,
}

impl Drop for QuotaReservation {
    fn drop(&mut self) {
        let mut map = match self.reserved.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(count) = map.get_mut(&self.user_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                map.remove(&self.user_id);
            }
        }
    }
}

/// Computes remaining daily allowance and admits generation requests.
pub struct QuotaService {
    history: Arc<dyn HistoryRepository>,
    bonus: Arc<dyn BonusRepository>,
    base_limit: u32,
    user_locks: StdMutex<HashMap<String, Arc<AsyncMutex<()>>>>,
    reserved: ReservedMap,
}

impl QuotaService {
    /// Create a quota service with the given base daily limit.
    pub fn new(
        history: Arc<dyn HistoryRepository>,
        bonus: Arc<dyn BonusRepository>,
        base_limit: u32,
    ) -> Self {
        Self {
            history,
            bonus,
            base_limit,
            user_locks: StdMutex::new(HashMap::new()),
            reserved: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Remaining allowance for a user right now. Pure read, no mutation;
    /// in-flight reservations are deliberately not counted here.
    pub async fn remaining(&self, user_id: &str) -> Result<QuotaStatus, QuotaError> {
        let (count_today, limit) = self.ledger_state(user_id).await?;
        let restantes = clamp_remaining(limit, count_today);
        Ok(QuotaStatus {
            allowed: restantes > 0,
            restantes,
        })
    }

    /// Admit a generation request, or report exhaustion.
    ///
    /// The per-user lock is held only across the check and the reservation
    /// increment; long-running predictor calls happen outside it.
    pub async fn try_reserve(&self, user_id: &str) -> Result<QuotaReservation, QuotaError> {
        let lock = self.lock_for(user_id);
        let _admission = lock.lock().await;

        let (count_today, limit) = self.ledger_state(user_id).await?;
        let in_flight = self.reserved_count(user_id);
        if count_today + i64::from(in_flight) >= i64::from(limit) {
            let restantes = clamp_remaining(limit, count_today);
            tracing::debug!(
                target: "lienzo.quota",
                user_id,
                count_today,
                in_flight,
                limit,
                "generation denied: quota exhausted"
            );
            return Err(QuotaError::Exhausted { restantes });
        }

        self.locked_reserved().entry(user_id.to_string()).and_modify(|c| *c += 1).or_insert(1);
        Ok(QuotaReservation {
            user_id: user_id.to_string(),
            reserved: Arc::clone(&self.reserved),
        })
    }

    /// Today's ledger count and the effective limit (base + today's bonus).
    async fn ledger_state(&self, user_id: &str) -> Result<(i64, u32), QuotaError> {
        let count_today = self
            .history
            .count_since(user_id, start_of_local_day())
            .await
            .map_err(|e| QuotaError::Downstream(e.to_string()))?;

        let today = Local::now().date_naive();
        let bonus = self
            .bonus
            .get(user_id)
            .await
            .map_err(|e| QuotaError::Downstream(e.to_string()))?
            .map_or(0, |record| record.effective_on(today));

        Ok((count_today, self.base_limit + bonus))
    }

    fn lock_for(&self, user_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = match self.user_locks.lock() {
            Ok(locks) => locks,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(
            locks
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        )
    }

    fn reserved_count(&self, user_id: &str) -> u32 {
        self.locked_reserved().get(user_id).copied().unwrap_or(0)
    }

    fn locked_reserved(&self) -> std::sync::MutexGuard<'_, HashMap<String, u32>> {
        match self.reserved.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// `max(0, limit - count)`, saturating into `u32`.
fn clamp_remaining(limit: u32, count: i64) -> u32 {
    u32::try_from((i64::from(limit) - count).max(0)).unwrap_or(u32::MAX)
}
