use crate::config::ConfigError;
use crate::formulas::FormulaAdminError;
use crate::leaderboard::ingest::BattleDataImportError;
use crate::leaderboard::service::LeaderboardError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Leaderboard(LeaderboardError),
    Formula(FormulaAdminError),
    Import(BattleDataImportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Leaderboard(err) => write!(f, "leaderboard error: {}", err),
            AppError::Formula(err) => write!(f, "formula error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Leaderboard(err) => Some(err),
            AppError::Formula(err) => Some(err),
            AppError::Import(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Leaderboard(LeaderboardError::InvalidDateRange { .. }) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Formula(FormulaAdminError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Formula(FormulaAdminError::PublishedImmutable(_)) => StatusCode::CONFLICT,
            AppError::Formula(FormulaAdminError::Config(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Leaderboard(_)
            | AppError::Formula(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<LeaderboardError> for AppError {
    fn from(value: LeaderboardError) -> Self {
        Self::Leaderboard(value)
    }
}

impl From<FormulaAdminError> for AppError {
    fn from(value: FormulaAdminError) -> Self {
        Self::Formula(value)
    }
}

impl From<BattleDataImportError> for AppError {
    fn from(value: BattleDataImportError) -> Self {
        Self::Import(value)
    }
}
