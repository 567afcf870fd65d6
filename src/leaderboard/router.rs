use super::repository::{FormulaStore, RecordStore, RosterStore};
use super::service::{LeaderboardParams, LeaderboardService, RelaxationPolicy};
use super::views::{KpiSummary, RelaxedFilter};
use crate::error::AppError;
use crate::scoring::{AggregationMode, BattleType, GroupTotal, WeekKey};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LeaderboardRequest {
    /// Free-form view key; anything unrecognized falls back to leaders.
    #[serde(default)]
    pub battle_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_to: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub today: Option<NaiveDate>,
    /// Split the top three rows out for the public scoreboard.
    #[serde(default)]
    pub include_podium: bool,
    /// Debug: admit unapproved records.
    #[serde(default)]
    pub include_unapproved: bool,
    /// Debug: progressively relax filters when the strict query is empty.
    #[serde(default)]
    pub relax_on_empty: bool,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub battle_type: BattleType,
    pub week: WeekKey,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub kpis: KpiSummary,
    pub formula_missing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relaxed: Option<RelaxedFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podium: Option<Vec<GroupTotal>>,
    pub rows: Vec<GroupTotal>,
}

/// Router builder exposing the leaderboard computation over HTTP.
pub fn leaderboard_router<S, F>(service: Arc<LeaderboardService<S, F>>) -> Router
where
    S: RecordStore + RosterStore + 'static,
    F: FormulaStore + 'static,
{
    Router::new()
        .route("/api/v1/leaderboard", post(leaderboard_endpoint::<S, F>))
        .with_state(service)
}

pub(crate) async fn leaderboard_endpoint<S, F>(
    State(service): State<Arc<LeaderboardService<S, F>>>,
    Json(payload): Json<LeaderboardRequest>,
) -> Result<Json<LeaderboardResponse>, AppError>
where
    S: RecordStore + RosterStore + 'static,
    F: FormulaStore + 'static,
{
    let LeaderboardRequest {
        battle_type,
        date_from,
        date_to,
        today,
        include_podium,
        include_unapproved,
        relax_on_empty,
    } = payload;

    let params = LeaderboardParams {
        battle_type: BattleType::normalize(battle_type.as_deref().unwrap_or_default()),
        date_from,
        date_to,
        today: today.unwrap_or_else(|| Local::now().date_naive()),
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

    let (podium, rows) = if include_podium {
        let (podium, field) = summary.podium_split();
        (Some(podium.to_vec()), field.to_vec())
    } else {
        (None, summary.rows.clone())
    };

    Ok(Json(LeaderboardResponse {
        battle_type: summary.battle_type,
        week: summary.week,
        date_from: summary.date_from,
        date_to: summary.date_to,
        kpis: summary.kpis,
        formula_missing: summary.formula_missing,
        relaxed: summary.relaxed,
        podium,
        rows,
    }))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
