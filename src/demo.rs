use crate::infra::{default_formula_catalog, parse_date, InMemoryBattleStore};
use battleboard::error::AppError;
use battleboard::leaderboard::{
    Agent, AgentRole, BattleDataImporter, BattleDataset, LeaderboardParams, LeaderboardService,
    LeaderboardSummary, OrgUnit, RawPerformanceRecord, RelaxationPolicy, Roster,
};
use battleboard::scoring::{AggregationMode, BattleType};
use chrono::{Datelike, Duration, Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct LeaderboardReportArgs {
    /// Battle to rank: leaders, depots, or companies (defaults to the
    /// configured battle)
    #[arg(long)]
    pub(crate) battle: Option<String>,
    /// Range start (YYYY-MM-DD), defaults to the first of the month
    #[arg(long, value_parser = parse_date)]
    pub(crate) date_from: Option<NaiveDate>,
    /// Range end (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    pub(crate) date_to: Option<NaiveDate>,
    /// Override the evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Joined daily-performance CSV export to rank instead of the
    /// bundled demo data
    #[arg(long)]
    pub(crate) records_csv: Option<PathBuf>,
    /// Debug: admit unapproved records
    #[arg(long)]
    pub(crate) include_unapproved: bool,
    /// Debug: relax filters step by step when the strict query is empty
    #[arg(long)]
    pub(crate) relax_on_empty: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_leaderboard_report(
    args: LeaderboardReportArgs,
    default_battle: BattleType,
) -> Result<(), AppError> {
    let LeaderboardReportArgs {
        battle,
        date_from,
        date_to,
        today,
        records_csv,
        include_unapproved,
        relax_on_empty,
    } = args;

    let battle_type = battle
        .as_deref()
        .map(BattleType::normalize)
        .unwrap_or(default_battle);
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let (dataset, imported) = match records_csv {
        Some(path) => (BattleDataImporter::from_path(path)?, true),
        None => (seed_dataset(today), false),
    };
    let store = Arc::new(InMemoryBattleStore::new(dataset));
    let formulas = Arc::new(default_formula_catalog());
    let service = LeaderboardService::new(store, formulas);

    let params = LeaderboardParams {
        battle_type,
        date_from,
        date_to,
        today,
        mode: if include_unapproved {
            AggregationMode::IncludeUnapproved
        } else {
            AggregationMode::Official
        },
        relaxation: if relax_on_empty {
            RelaxationPolicy::RelaxOnEmpty
        } else {
            RelaxationPolicy::Strict
        },
    };

    let summary = service.summary(&params)?;
    render_summary(&summary, imported);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    println!("Battle of Platoons demo");
    let store = Arc::new(InMemoryBattleStore::new(seed_dataset(today)));
    let formulas = Arc::new(default_formula_catalog());
    let service = LeaderboardService::new(store, formulas);

    for battle_type in BattleType::ordered() {
        let summary = service.summary(&LeaderboardParams::official(battle_type, today))?;
        render_summary(&summary, false);
    }

    Ok(())
}

fn render_summary(summary: &LeaderboardSummary, imported: bool) {
    println!("\n{} battle", summary.battle_type.label());
    println!(
        "Window: {} -> {} (week {})",
        summary.date_from, summary.date_to, summary.week
    );
    if imported {
        println!("Data source: CSV export");
    } else {
        println!("Data source: bundled demo data");
    }
    if summary.formula_missing {
        println!("No active formula for this week; rows score zero.");
    }
    if let Some(relaxed) = summary.relaxed {
        println!("Filters relaxed to produce rows: {relaxed:?}");
    }

    println!(
        "Roster: {} leaders, {} depots, {} companies | window totals: {} leads, {} sales",
        summary.kpis.leaders_count,
        summary.kpis.depots_count,
        summary.kpis.companies_count,
        summary.kpis.total_leads,
        summary.kpis.total_sales
    );

    if summary.rows.is_empty() {
        println!("No rows in the selected window.");
        return;
    }

    let (podium, field) = summary.podium_split();
    println!("\nPodium");
    for row in podium {
        println!(
            "  #{} {} | {:.1} pts | {} leads, {} pay-ins, {} sales",
            row.rank, row.name, row.points, row.totals.leads, row.totals.payins, row.totals.sales
        );
    }
    if !field.is_empty() {
        println!("Field");
        for row in field {
            println!(
                "  #{} {} | {:.1} pts | {} leads, {} pay-ins, {} sales",
                row.rank, row.name, row.points, row.totals.leads, row.totals.payins, row.totals.sales
            );
        }
    }
}

/// Two depots, two companies, four platoon leaders and a week of daily
/// entries around `today`, including one unapproved and one voided row
/// so the filters have something to bite on.
pub(crate) fn seed_dataset(today: NaiveDate) -> BattleDataset {
    let anchor = today.with_day(1).unwrap_or(today);

    let depots = vec![
        OrgUnit {
            id: "depot-north".to_owned(),
            name: "North Depot".to_owned(),
            photo_url: None,
        },
        OrgUnit {
            id: "depot-south".to_owned(),
            name: "South Depot".to_owned(),
            photo_url: None,
        },
    ];
    let companies = vec![
        OrgUnit {
            id: "acme".to_owned(),
            name: "Acme Energy".to_owned(),
            photo_url: None,
        },
        OrgUnit {
            id: "zenith".to_owned(),
            name: "Zenith Power".to_owned(),
            photo_url: None,
        },
    ];

    let leader = |id: &str, name: &str, depot: &str, company: &str| Agent {
        id: id.to_owned(),
        name: name.to_owned(),
        role: AgentRole::Platoon,
        depot_id: Some(depot.to_owned()),
        company_id: Some(company.to_owned()),
        platoon_id: None,
        photo_url: None,
    };
    let mut agents = vec![
        leader("lead-ana", "Ana Petrova", "depot-north", "acme"),
        leader("lead-bora", "Bora Ilic", "depot-north", "acme"),
        leader("lead-ceda", "Ceda Antic", "depot-south", "zenith"),
        leader("lead-dunja", "Dunja Simic", "depot-south", "zenith"),
    ];
    agents.push(Agent {
        id: "staff-eli".to_owned(),
        name: "Eli Backoffice".to_owned(),
        role: AgentRole::Support,
        depot_id: Some("depot-north".to_owned()),
        company_id: Some("acme".to_owned()),
        platoon_id: None,
        photo_url: None,
    });

    let mut records = Vec::new();
    let mut push = |agent: &str, day: i64, leads: f64, payins: f64, sales: f64| {
        let date = anchor + Duration::days(day);
        records.push(RawPerformanceRecord {
            id: format!("{date}_{agent}"),
            agent_id: agent.to_owned(),
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
        });
    };

    push("lead-ana", 0, 14.0, 90_000.0, 21_000.0);
    push("lead-ana", 1, 9.0, 40_000.0, 18_500.0);
    push("lead-bora", 0, 22.0, 120_000.0, 12_000.0);
    push("lead-bora", 2, 6.0, 15_000.0, 30_500.0);
    push("lead-ceda", 1, 11.0, 60_000.0, 27_000.0);
    push("lead-ceda", 2, 17.0, 10_000.0, 8_000.0);
    push("lead-dunja", 0, 4.0, 200_000.0, 45_000.0);
    push("staff-eli", 1, 30.0, 0.0, 0.0);

    // Pending approval: invisible to official standings.
    let pending_date = anchor + Duration::days(3);
    records.push(RawPerformanceRecord {
        id: format!("{pending_date}_lead-dunja"),
        agent_id: "lead-dunja".to_owned(),
        date: pending_date,
        leads: 50.0,
        payins: 0.0,
        sales: 60_000.0,
        approved: false,
        voided: false,
        leads_depot_id: None,
        sales_depot_id: None,
        company_id: None,
        platoon_id: None,
    });

    // Voided after a data dispute: must never score.
    let voided_date = anchor + Duration::days(2);
    records.push(RawPerformanceRecord {
        id: format!("{voided_date}_lead-ana"),
        agent_id: "lead-ana".to_owned(),
        date: voided_date,
        leads: 80.0,
        payins: 500_000.0,
        sales: 90_000.0,
        approved: true,
        voided: true,
        leads_depot_id: None,
        sales_depot_id: None,
        company_id: None,
        platoon_id: None,
    });

    BattleDataset {
        records,
        roster: Roster::new(agents, depots, companies),
    }
}
