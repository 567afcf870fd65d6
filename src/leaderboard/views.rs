use crate::scoring::{BattleType, GroupTotal, WeekKey};
use chrono::NaiveDate;
use serde::Serialize;

/// Headline counters shown above the standings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub leaders_count: usize,
    pub depots_count: usize,
    pub companies_count: usize,
    pub total_leads: f64,
    pub total_sales: f64,
}

/// Which strict filter was dropped to produce a non-empty result. Only
/// ever populated under the opt-in relaxation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxedFilter {
    Date,
    Approval,
}

/// Complete outcome of one leaderboard computation.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardSummary {
    pub battle_type: BattleType,
    pub week: WeekKey,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub kpis: KpiSummary,
    /// True when no formula was active for the period; every row then
    /// carries zero points.
    pub formula_missing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relaxed: Option<RelaxedFilter>,
    pub rows: Vec<GroupTotal>,
}

impl LeaderboardSummary {
    /// Split for the public scoreboard: the top three on the podium,
    /// everyone else in the field below it.
    pub fn podium_split(&self) -> (&[GroupTotal], &[GroupTotal]) {
        let cut = self.rows.len().min(3);
        self.rows.split_at(cut)
    }
}
