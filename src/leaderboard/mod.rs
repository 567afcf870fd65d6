//! Leaderboard computation over the hosted backend: canonical domain
//! shapes, the store traits that front the backend, and the service
//! that turns raw daily records into ranked standings.

pub mod domain;
pub mod ingest;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

pub use domain::{Agent, AgentRole, GroupSeed, OrgUnit, RawPerformanceRecord, Roster};
pub use ingest::{BattleDataImportError, BattleDataImporter, BattleDataset};
pub use repository::{FormulaStore, RecordQuery, RecordStore, RosterStore, StoreError};
pub use router::{leaderboard_router, LeaderboardRequest, LeaderboardResponse};
pub use service::{LeaderboardError, LeaderboardParams, LeaderboardService, RelaxationPolicy};
pub use views::{KpiSummary, LeaderboardSummary, RelaxedFilter};
