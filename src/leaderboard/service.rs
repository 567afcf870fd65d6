use super::repository::{FormulaStore, RecordQuery, RecordStore, RosterStore, StoreError};
use super::views::{KpiSummary, LeaderboardSummary, RelaxedFilter};
use crate::leaderboard::domain::RawPerformanceRecord;
use crate::scoring::{
    group_and_sum, rank_rows, score_groups, AggregationMode, BattleType, GroupTotal, WeekKey,
};
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use tracing::{debug, warn};

/// What to do when the strict query matches nothing.
///
/// `Strict` is the production contract. `RelaxOnEmpty` reproduces the
/// old dashboards' fallback cascade for debugging: drop the date filter,
/// then the approval filter. Voided rows are never admitted under any
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelaxationPolicy {
    #[default]
    Strict,
    RelaxOnEmpty,
}

/// One leaderboard request, fully resolved by the caller (no ambient
/// clock: `today` is an input).
#[derive(Debug, Clone, Copy)]
pub struct LeaderboardParams {
    pub battle_type: BattleType,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub today: NaiveDate,
    pub mode: AggregationMode,
    pub relaxation: RelaxationPolicy,
}

impl LeaderboardParams {
    pub fn official(battle_type: BattleType, today: NaiveDate) -> Self {
        Self {
            battle_type,
            date_from: None,
            date_to: None,
            today,
            mode: AggregationMode::Official,
            relaxation: RelaxationPolicy::Strict,
        }
    }

    /// Defaults mirror the dashboards: first of the current month
    /// through today.
    fn resolved_range(&self) -> Result<(NaiveDate, NaiveDate), LeaderboardError> {
        let to = self.date_to.unwrap_or(self.today);
        let from = self
            .date_from
            .unwrap_or_else(|| self.today.with_day(1).unwrap_or(self.today));
        if from > to {
            return Err(LeaderboardError::InvalidDateRange { from, to });
        }
        Ok((from, to))
    }
}

/// Computes ranked standings from the record, roster, and formula
/// backends. Stateless between calls.
pub struct LeaderboardService<S, F> {
    store: Arc<S>,
    formulas: Arc<F>,
}

impl<S, F> LeaderboardService<S, F>
where
    S: RecordStore + RosterStore,
    F: FormulaStore,
{
    pub fn new(store: Arc<S>, formulas: Arc<F>) -> Self {
        Self { store, formulas }
    }

    pub fn summary(&self, params: &LeaderboardParams) -> Result<LeaderboardSummary, LeaderboardError> {
        let (date_from, date_to) = params.resolved_range()?;
        let week = WeekKey::from_date(date_to);

        let roster = self.store.load_roster()?;
        let formula = self.formulas.active_formula(params.battle_type, week)?;
        let formula_missing = formula.is_none();
        if formula_missing {
            debug!(
                battle = params.battle_type.as_str(),
                %week,
                "no active formula; all rows score zero"
            );
        }
        let config = formula.unwrap_or_default();

        let (records, mode, relaxed) = self.fetch_records(params, date_from, date_to)?;

        let grouped = group_and_sum(&records, mode, |record| {
            roster.group_seed(params.battle_type, record)
        });
        let mut rows: Vec<GroupTotal> = grouped.into_values().collect();
        score_groups(params.battle_type, &mut rows, &config);
        let rows = rank_rows(rows);

        let mut kpis = KpiSummary {
            leaders_count: roster.leaders_count(),
            depots_count: roster.depots_count(),
            companies_count: roster.companies_count(),
            total_leads: 0.0,
            total_sales: 0.0,
        };
        for record in records.iter().filter(|record| mode.admits(record)) {
            kpis.total_leads += finite_or_zero(record.leads);
            kpis.total_sales += finite_or_zero(record.sales);
        }

        Ok(LeaderboardSummary {
            battle_type: params.battle_type,
            week,
            date_from,
            date_to,
            kpis,
            formula_missing,
            relaxed,
            rows,
        })
    }

    fn fetch_records(
        &self,
        params: &LeaderboardParams,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<(Vec<RawPerformanceRecord>, AggregationMode, Option<RelaxedFilter>), LeaderboardError>
    {
        let strict = RecordQuery {
            date_range: Some((date_from, date_to)),
            approved_only: params.mode == AggregationMode::Official,
        };
        let records = self.store.fetch_records(&strict)?;
        if !records.is_empty() || params.relaxation == RelaxationPolicy::Strict {
            return Ok((records, params.mode, None));
        }

        warn!(
            battle = params.battle_type.as_str(),
            %date_from,
            %date_to,
            "strict query matched no records; relaxing date filter"
        );
        let records = self.store.fetch_records(&RecordQuery {
            date_range: None,
            approved_only: strict.approved_only,
        })?;
        if !records.is_empty() {
            return Ok((records, params.mode, Some(RelaxedFilter::Date)));
        }

        warn!(
            battle = params.battle_type.as_str(),
            "still no records; relaxing approval filter"
        );
        let records = self.store.fetch_records(&RecordQuery {
            date_range: Some((date_from, date_to)),
            approved_only: false,
        })?;
        if records.is_empty() {
            return Ok((records, params.mode, None));
        }
        Ok((records, AggregationMode::IncludeUnapproved, Some(RelaxedFilter::Approval)))
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("invalid date range: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
    #[error(transparent)]
    Store(#[from] StoreError),
}
