use crate::cli::ServeArgs;
use crate::infra::{default_formula_catalog, AppState, InMemoryBattleStore};
use crate::routes::with_battle_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use battleboard::config::AppConfig;
use battleboard::error::AppError;
use battleboard::formulas::FormulaAdminService;
use battleboard::leaderboard::{BattleDataImporter, LeaderboardService};
use battleboard::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(config.environment, &config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let records_csv = args.records_csv.take().or(config.battle.records_csv.clone());
    let store = match records_csv {
        Some(path) => {
            let dataset = BattleDataImporter::from_path(&path)?;
            info!(path = %path.display(), records = dataset.records.len(), "hydrated stores from CSV export");
            Arc::new(InMemoryBattleStore::new(dataset))
        }
        None => Arc::new(InMemoryBattleStore::empty()),
    };
    let catalog = Arc::new(default_formula_catalog());
    let leaderboard_service = Arc::new(LeaderboardService::new(store, catalog.clone()));
    let formula_service = Arc::new(FormulaAdminService::new(catalog));

    let app = with_battle_routes(leaderboard_service, formula_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "battle scoreboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}
