//! Bonus quota types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user bonus allowance, one row per user.
///
/// `date` marks the last day the bonus was touched; a bonus only counts
/// toward today's quota when `date` is today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRecord {
    pub user_id: String,
    pub bonus_count: u32,
    pub date: NaiveDate,
}

impl BonusRecord {
    /// The bonus that applies on `today`: stale records contribute nothing.
    #[must_use]
    pub fn effective_on(&self, today: NaiveDate) -> u32 {
        if self.date == today { self.bonus_count } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn stale_bonus_does_not_count() {
        let record = BonusRecord {
            user_id: "ana".to_string(),
            bonus_count: 4,
            date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
        };
        let today = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        assert_eq!(record.effective_on(today), 0);
        assert_eq!(record.effective_on(record.date), 4);
    }
}
