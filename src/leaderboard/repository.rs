use super::domain::{RawPerformanceRecord, Roster};
use crate::scoring::{BattleType, FormulaConfig, WeekKey};
use chrono::NaiveDate;

/// Filters pushed down to the record backend.
///
/// Voided exclusion is deliberately absent: the aggregator drops voided
/// records itself no matter what a store returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub approved_only: bool,
}

impl RecordQuery {
    pub fn matches(&self, record: &RawPerformanceRecord) -> bool {
        if let Some((from, to)) = self.date_range {
            if record.date < from || record.date > to {
                return false;
            }
        }
        if self.approved_only && !record.approved {
            return false;
        }
        true
    }
}

/// Backend holding raw daily performance rows.
pub trait RecordStore: Send + Sync {
    fn fetch_records(&self, query: &RecordQuery) -> Result<Vec<RawPerformanceRecord>, StoreError>;
}

/// Backend holding the agent/depot/company roster.
pub trait RosterStore: Send + Sync {
    fn load_roster(&self) -> Result<Roster, StoreError>;
}

/// Backend resolving the scoring formula active for a battle and week.
pub trait FormulaStore: Send + Sync {
    fn active_formula(
        &self,
        battle_type: BattleType,
        week: WeekKey,
    ) -> Result<Option<FormulaConfig>, StoreError>;
}

/// Failure reported by a backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("backend rejected the request: {0}")]
    Rejected(String),
}
