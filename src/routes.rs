use crate::infra::{AppState, InMemoryBattleStore, InMemoryFormulaCatalog};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use battleboard::formulas::{formula_router, FormulaAdminService};
use battleboard::leaderboard::{leaderboard_router, LeaderboardService};
use serde_json::json;
use std::sync::Arc;

/// Compose the full application router: leaderboard, formula admin, and
/// the operational endpoints.
pub(crate) fn with_battle_routes(
    leaderboard: Arc<LeaderboardService<InMemoryBattleStore, InMemoryFormulaCatalog>>,
    formulas: Arc<FormulaAdminService<InMemoryFormulaCatalog>>,
) -> axum::Router {
    leaderboard_router(leaderboard)
        .merge(formula_router(formulas))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::seed_dataset;
    use crate::infra::default_formula_catalog;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use tower::util::ServiceExt;

    fn app() -> axum::Router {
        let today = NaiveDate::from_ymd_opt(2026, 2, 6).expect("valid date");
        let store = Arc::new(InMemoryBattleStore::new(seed_dataset(today)));
        let catalog = Arc::new(default_formula_catalog());
        let leaderboard = Arc::new(LeaderboardService::new(store, catalog.clone()));
        let formulas = Arc::new(FormulaAdminService::new(catalog));
        with_battle_routes(leaderboard, formulas)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn leaderboard_route_serves_ranked_rows() {
        let payload = json!({
            "battle_type": "leaders",
            "today": "2026-02-06",
        });
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/leaderboard")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["battle_type"], "leaders");
        let rows = body["rows"].as_array().expect("rows array");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["rank"], 1);
    }
}
