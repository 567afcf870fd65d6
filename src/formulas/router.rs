use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;

use super::domain::DraftUpdate;
use super::repository::FormulaRepository;
use super::service::{FormulaAdminError, FormulaAdminService};

/// Router builder exposing formula administration over HTTP.
pub fn formula_router<R>(service: Arc<FormulaAdminService<R>>) -> Router
where
    R: FormulaRepository + 'static,
{
    Router::new()
        .route("/api/v1/formulas", get(list_handler::<R>))
        .route("/api/v1/formulas/:formula_id/draft", put(draft_handler::<R>))
        .route(
            "/api/v1/formulas/:formula_id/publish",
            post(publish_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<FormulaAdminService<R>>>,
) -> Response
where
    R: FormulaRepository + 'static,
{
    match service.list_all() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn draft_handler<R>(
    State(service): State<Arc<FormulaAdminService<R>>>,
    Path(formula_id): Path<String>,
    axum::Json(update): axum::Json<DraftUpdate>,
) -> Response
where
    R: FormulaRepository + 'static,
{
    match service.update_draft(&formula_id, update) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn publish_handler<R>(
    State(service): State<Arc<FormulaAdminService<R>>>,
    Path(formula_id): Path<String>,
) -> Response
where
    R: FormulaRepository + 'static,
{
    match service.publish(&formula_id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: FormulaAdminError) -> Response {
    let status = match &err {
        FormulaAdminError::NotFound(_) => StatusCode::NOT_FOUND,
        FormulaAdminError::PublishedImmutable(_) => StatusCode::CONFLICT,
        FormulaAdminError::Config(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FormulaAdminError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
