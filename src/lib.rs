pub mod config;
pub mod error;
pub mod formulas;
pub mod leaderboard;
pub mod scoring;
pub mod telemetry;
