use battleboard::leaderboard::{
    Agent, AgentRole, FormulaStore, LeaderboardParams, LeaderboardService, OrgUnit,
    RawPerformanceRecord, RecordQuery, RecordStore, Roster, RosterStore, StoreError,
};
use battleboard::scoring::{BattleType, FormulaConfig, MetricKey, MetricRule, WeekKey};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;

struct StubBackend {
    records: Vec<RawPerformanceRecord>,
    roster: Roster,
}

impl RecordStore for StubBackend {
    fn fetch_records(&self, query: &RecordQuery) -> Result<Vec<RawPerformanceRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect())
    }
}

impl RosterStore for StubBackend {
    fn load_roster(&self) -> Result<Roster, StoreError> {
        Ok(self.roster.clone())
    }
}

struct StubFormulas {
    leaders: FormulaConfig,
    depots: FormulaConfig,
}

impl FormulaStore for StubFormulas {
    fn active_formula(
        &self,
        battle_type: BattleType,
        _week: WeekKey,
    ) -> Result<Option<FormulaConfig>, StoreError> {
        Ok(match battle_type {
            BattleType::Leaders => Some(self.leaders.clone()),
            BattleType::Depots => Some(self.depots.clone()),
            BattleType::Companies => None,
        })
    }
}

fn rule(key: MetricKey, divisor: f64, max_points: f64) -> MetricRule {
    MetricRule {
        key,
        divisor,
        max_points,
    }
}

fn agent(id: &str, name: &str, role: AgentRole, depot: &str, company: &str) -> Agent {
    Agent {
        id: id.to_owned(),
        name: name.to_owned(),
        role,
        depot_id: Some(depot.to_owned()),
        company_id: Some(company.to_owned()),
        platoon_id: None,
        photo_url: None,
    }
}

fn record(
    id: &str,
    agent_id: &str,
    date: NaiveDate,
    leads: f64,
    payins: f64,
    sales: f64,
) -> RawPerformanceRecord {
    RawPerformanceRecord {
        id: id.to_owned(),
        agent_id: agent_id.to_owned(),
        date,
        leads,
        payins,
        sales,
        approved: true,
        voided: false,
        leads_depot_id: None,
        sales_depot_id: None,
        company_id: None,
        platoon_id: None,
    }
}

fn backend(today: NaiveDate) -> (Arc<StubBackend>, Arc<StubFormulas>) {
    let start = today - Duration::days(3);
    let roster = Roster::new(
        vec![
            agent("a-north-1", "Ana Petrova", AgentRole::Platoon, "d-north", "c-acme"),
            agent("a-north-2", "Bora Ilic", AgentRole::Leader, "d-north", "c-acme"),
            agent("a-south-1", "Ceda Antic", AgentRole::Squad, "d-south", "c-zen"),
            agent("a-staff", "Eli Backoffice", AgentRole::Support, "d-north", "c-acme"),
        ],
        vec![
            OrgUnit {
                id: "d-north".to_owned(),
                name: "North Depot".to_owned(),
                photo_url: None,
            },
            OrgUnit {
                id: "d-south".to_owned(),
                name: "South Depot".to_owned(),
                photo_url: None,
            },
        ],
        vec![OrgUnit {
            id: "c-acme".to_owned(),
            name: "Acme Energy".to_owned(),
            photo_url: None,
        }],
    );

    let mut records = vec![
        record("r1", "a-north-1", start, 50.0, 10_000.0, 25_000.0),
        record("r2", "a-north-1", start + Duration::days(1), 10.0, 0.0, 5_000.0),
        record("r3", "a-north-2", start, 30.0, 400_000.0, 10_000.0),
        record("r4", "a-south-1", start + Duration::days(2), 90.0, 0.0, 50_000.0),
        record("r5", "a-staff", start, 999.0, 0.0, 10_000.0),
    ];

    // One unapproved and one voided entry that official standings must
    // ignore.
    let mut pending = record("r6", "a-north-2", start + Duration::days(1), 500.0, 0.0, 0.0);
    pending.approved = false;
    records.push(pending);
    let mut voided = record("r7", "a-south-1", start, 0.0, 0.0, 900_000.0);
    voided.voided = true;
    records.push(voided);

    let formulas = StubFormulas {
        leaders: FormulaConfig::new(vec![
            rule(MetricKey::Leads, 100.0, 400.0),
            rule(MetricKey::Sales, 50_000.0, 600.0),
        ]),
        // Deliberately carries a payins rule: depot scoring must ignore
        // it no matter what the stored config says.
        depots: FormulaConfig::new(vec![
            rule(MetricKey::Leads, 100.0, 400.0),
            rule(MetricKey::Payins, 1_000.0, 300.0),
            rule(MetricKey::Sales, 50_000.0, 600.0),
        ]),
    };

    (Arc::new(StubBackend { records, roster }), Arc::new(formulas))
}

#[test]
fn official_leaders_standings_score_and_rank() {
    let today = NaiveDate::from_ymd_opt(2026, 2, 6).expect("valid date");
    let (store, formulas) = backend(today);
    let service = LeaderboardService::new(store, formulas);

    let summary = service
        .summary(&LeaderboardParams::official(BattleType::Leaders, today))
        .expect("summary builds");

    // Support staff and the unapproved/voided entries never surface.
    assert_eq!(summary.rows.len(), 3);

    // Ceda: 90 leads -> 360, 50k sales -> 600.
    assert_eq!(summary.rows[0].name, "Ceda Antic");
    assert_eq!(summary.rows[0].points, 960.0);
    assert_eq!(summary.rows[0].rank, 1);

    // Ana: 60 leads -> 240, 30k sales -> 360.
    assert_eq!(summary.rows[1].name, "Ana Petrova");
    assert_eq!(summary.rows[1].points, 600.0);
    assert_eq!(summary.rows[1].totals.leads, 60.0);

    // Bora: 30 leads -> 120, 10k sales -> 120.
    assert_eq!(summary.rows[2].name, "Bora Ilic");
    assert_eq!(summary.rows[2].points, 240.0);
    assert_eq!(summary.rows[2].rank, 3);

    // KPI totals cover every admitted record, including support staff.
    assert_eq!(summary.kpis.leaders_count, 3);
    assert_eq!(summary.kpis.total_leads, 50.0 + 10.0 + 30.0 + 90.0 + 999.0);
}

#[test]
fn depot_standings_group_and_ignore_payins() {
    let today = NaiveDate::from_ymd_opt(2026, 2, 6).expect("valid date");
    let (store, formulas) = backend(today);
    let service = LeaderboardService::new(store, formulas);

    let summary = service
        .summary(&LeaderboardParams::official(BattleType::Depots, today))
        .expect("summary builds");

    assert_eq!(summary.rows.len(), 2);
    let north = summary
        .rows
        .iter()
        .find(|row| row.key == "d-north")
        .expect("north depot ranked");
    // Support staff roll into their depot even though they are not
    // leaders: 50 + 10 + 30 + 999 leads, 30k + 10k + 10k sales.
    assert_eq!(north.totals.leads, 1089.0);
    assert_eq!(north.totals.sales, 50_000.0);
    assert_eq!(north.name, "North Depot");

    // Leads cap at 400, sales hit their cap exactly, and the 410k of
    // pay-ins score nothing despite the config's payins rule.
    assert_eq!(north.totals.payins, 410_000.0);
    assert_eq!(north.points, 400.0 + 600.0);
}

#[test]
fn company_battle_without_formula_scores_zero_but_ranks() {
    let today = NaiveDate::from_ymd_opt(2026, 2, 6).expect("valid date");
    let (store, formulas) = backend(today);
    let service = LeaderboardService::new(store, formulas);

    let summary = service
        .summary(&LeaderboardParams::official(BattleType::Companies, today))
        .expect("summary builds");

    assert!(summary.formula_missing);
    assert_eq!(summary.rows.len(), 2);
    assert!(summary.rows.iter().all(|row| row.points == 0.0));
    let ranks: Vec<u32> = summary.rows.iter().map(|row| row.rank).collect();
    assert_eq!(ranks, vec![1, 2]);

    // The company missing from the roster ranks under its fallback name.
    assert!(summary
        .rows
        .iter()
        .any(|row| row.key == "c-zen" && row.name == "Unknown Commander"));
}

#[test]
fn podium_split_matches_row_order() {
    let today = NaiveDate::from_ymd_opt(2026, 2, 6).expect("valid date");
    let (store, formulas) = backend(today);
    let service = LeaderboardService::new(store, formulas);

    let summary = service
        .summary(&LeaderboardParams::official(BattleType::Leaders, today))
        .expect("summary builds");

    let (podium, field) = summary.podium_split();
    assert_eq!(podium.len(), 3);
    assert!(field.is_empty());
    assert_eq!(podium[0].rank, 1);
    assert_eq!(podium[2].rank, 3);
}
