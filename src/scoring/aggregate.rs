use super::engine::{score_total, MetricTotals};
use super::formula::{BattleType, FormulaConfig};
use crate::leaderboard::domain::{GroupSeed, RawPerformanceRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Controls the approval filter during aggregation.
///
/// Voided records are excluded in every mode; only the published,
/// approved dataset feeds official standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    Official,
    IncludeUnapproved,
}

impl AggregationMode {
    pub fn admits(self, record: &RawPerformanceRecord) -> bool {
        if record.voided {
            return false;
        }
        match self {
            Self::Official => record.approved,
            Self::IncludeUnapproved => true,
        }
    }
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub name: String,
    pub photo_url: String,
    #[serde(flatten)]
    pub totals: MetricTotals,
    pub points: f64,
    pub rank: u32,
}

impl GroupTotal {
    fn seeded(seed: GroupSeed) -> Self {
        Self {
            key: seed.key,
            name: seed.name,
            photo_url: seed.photo_url,
            totals: MetricTotals::default(),
            points: 0.0,
            rank: 0,
        }
    }
}

/// Group records by the caller's dimension resolver and sum their
/// metrics.
///
/// Voided records never contribute, regardless of how the caller
/// filtered its fetch. Records the resolver cannot place are skipped
/// silently: unassigned data is expected, not an error. A group keeps
/// the first non-empty name and photo seen for its key; later blanks
/// never overwrite them.
pub fn group_and_sum<'a, I, F>(
    records: I,
    mode: AggregationMode,
    resolve: F,
) -> HashMap<String, GroupTotal>
where
    I: IntoIterator<Item = &'a RawPerformanceRecord>,
    F: Fn(&RawPerformanceRecord) -> Option<GroupSeed>,
{
    let mut grouped: HashMap<String, GroupTotal> = HashMap::new();

    for record in records {
        if !mode.admits(record) {
            continue;
        }
        let Some(seed) = resolve(record) else {
            continue;
        };
        if seed.key.is_empty() {
            continue;
        }

        let entry = grouped
            .entry(seed.key.clone())
            .or_insert_with(|| GroupTotal::seeded(seed.clone()));
        if entry.name.is_empty() && !seed.name.is_empty() {
            entry.name = seed.name;
        }
        if entry.photo_url.is_empty() && !seed.photo_url.is_empty() {
            entry.photo_url = seed.photo_url;
        }

        entry.totals.leads += metric_or_zero(record.leads);
        entry.totals.payins += metric_or_zero(record.payins);
        entry.totals.sales += metric_or_zero(record.sales);
    }

    grouped
}

/// Apply the active formula to every group's totals.
pub fn score_groups(battle_type: BattleType, groups: &mut [GroupTotal], config: &FormulaConfig) {
    for group in groups.iter_mut() {
        group.points = score_total(battle_type, &group.totals, config);
    }
}

/// Sort rows into final standings and assign dense 1-based ranks.
///
/// Descending points, tie-broken by descending sales, leads, payins,
/// then ascending name and key. The key tiebreak makes the order total,
/// so re-ranking an already ranked sequence changes nothing.
pub fn rank_rows(mut rows: Vec<GroupTotal>) -> Vec<GroupTotal> {
    rows.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then_with(|| b.totals.sales.total_cmp(&a.totals.sales))
            .then_with(|| b.totals.leads.total_cmp(&a.totals.leads))
            .then_with(|| b.totals.payins.total_cmp(&a.totals.payins))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.key.cmp(&b.key))
    });

    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index as u32 + 1;
    }

    rows
}

fn metric_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
