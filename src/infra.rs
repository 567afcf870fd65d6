use battleboard::formulas::{FormulaRecord, FormulaRepository, FormulaRepositoryError, FormulaStatus};
use battleboard::leaderboard::{
    BattleDataset, FormulaStore, RawPerformanceRecord, RecordQuery, RecordStore, Roster,
    RosterStore, StoreError,
};
use battleboard::scoring::{BattleType, FormulaConfig, MetricKey, MetricRule, WeekKey};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Record and roster backend held entirely in memory, standing in for
/// the hosted database during demos and local runs.
pub(crate) struct InMemoryBattleStore {
    records: Vec<RawPerformanceRecord>,
    roster: Roster,
}

impl InMemoryBattleStore {
    pub(crate) fn new(dataset: BattleDataset) -> Self {
        Self {
            records: dataset.records,
            roster: dataset.roster,
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            records: Vec::new(),
            roster: Roster::default(),
        }
    }
}

impl RecordStore for InMemoryBattleStore {
    fn fetch_records(&self, query: &RecordQuery) -> Result<Vec<RawPerformanceRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect())
    }
}

impl RosterStore for InMemoryBattleStore {
    fn load_roster(&self) -> Result<Roster, StoreError> {
        Ok(self.roster.clone())
    }
}

/// Formula backend held in memory; doubles as the admin repository and
/// the active-formula lookup the leaderboard consumes.
#[derive(Default)]
pub(crate) struct InMemoryFormulaCatalog {
    records: Mutex<HashMap<String, FormulaRecord>>,
}

impl FormulaRepository for InMemoryFormulaCatalog {
    fn get(&self, id: &str) -> Result<Option<FormulaRecord>, FormulaRepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("formula mutex poisoned")
            .get(id)
            .cloned())
    }

    fn list(&self) -> Result<Vec<FormulaRecord>, FormulaRepositoryError> {
        let mut records: Vec<FormulaRecord> = self
            .records
            .lock()
            .expect("formula mutex poisoned")
            .values()
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    fn save(&self, record: FormulaRecord) -> Result<(), FormulaRepositoryError> {
        self.records
            .lock()
            .expect("formula mutex poisoned")
            .insert(record.id.clone(), record);
        Ok(())
    }
}

impl FormulaStore for InMemoryFormulaCatalog {
    fn active_formula(
        &self,
        battle_type: BattleType,
        week: WeekKey,
    ) -> Result<Option<FormulaConfig>, StoreError> {
        let records = self.records.lock().expect("formula mutex poisoned");
        Ok(records
            .values()
            .filter(|record| record.is_active_for(battle_type, week))
            .max_by_key(|record| record.version)
            .map(|record| record.config.clone()))
    }
}

/// Season-default formulas: one published config per battle, plus an
/// editable draft so the admin endpoints have something to work on.
pub(crate) fn default_formula_catalog() -> InMemoryFormulaCatalog {
    let catalog = InMemoryFormulaCatalog::default();

    let mut leaders = FormulaRecord::draft("leaders-standard", "Leaders standard", BattleType::Leaders);
    leaders.config = FormulaConfig::new(vec![
        MetricRule {
            key: MetricKey::Leads,
            divisor: 100.0,
            max_points: 300.0,
        },
        MetricRule {
            key: MetricKey::Payins,
            divisor: 500_000.0,
            max_points: 200.0,
        },
        MetricRule {
            key: MetricKey::Sales,
            divisor: 50_000.0,
            max_points: 500.0,
        },
    ]);
    leaders.status = FormulaStatus::Published;

    let mut depots = FormulaRecord::draft("depots-standard", "Depots standard", BattleType::Depots);
    depots.config = FormulaConfig::new(vec![
        MetricRule {
            key: MetricKey::Leads,
            divisor: 100.0,
            max_points: 400.0,
        },
        MetricRule {
            key: MetricKey::Sales,
            divisor: 50_000.0,
            max_points: 600.0,
        },
    ]);
    depots.status = FormulaStatus::Published;

    let mut companies =
        FormulaRecord::draft("companies-standard", "Companies standard", BattleType::Companies);
    companies.config = FormulaConfig::new(vec![
        MetricRule {
            key: MetricKey::Leads,
            divisor: 200.0,
            max_points: 250.0,
        },
        MetricRule {
            key: MetricKey::Payins,
            divisor: 250_000.0,
            max_points: 250.0,
        },
        MetricRule {
            key: MetricKey::Sales,
            divisor: 100_000.0,
            max_points: 500.0,
        },
    ]);
    companies.status = FormulaStatus::Published;

    let next_season = FormulaRecord::draft("leaders-next", "Leaders next season", BattleType::Leaders);

    for record in [leaders, depots, companies, next_season] {
        catalog.save(record).expect("in-memory save cannot fail");
    }
    catalog
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_resolves_the_highest_active_version() {
        let catalog = default_formula_catalog();
        let week = WeekKey::new(2026, 6).expect("valid week");

        let config = catalog
            .active_formula(BattleType::Depots, week)
            .expect("lookup succeeds")
            .expect("depot formula active");
        assert_eq!(config.metrics.len(), 2);
        assert_eq!(config.total_max_points(), 1000.0);

        // The unpublished draft must never win over the published config.
        let leaders = catalog
            .active_formula(BattleType::Leaders, week)
            .expect("lookup succeeds")
            .expect("leaders formula active");
        assert_eq!(leaders.metrics.len(), 3);
    }
}
