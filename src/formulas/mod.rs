//! Formula administration: the draft/publish lifecycle and the
//! point-budget invariant enforced at its edge.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{DraftUpdate, FormulaRecord, FormulaStatus};
pub use repository::{FormulaRepository, FormulaRepositoryError};
pub use router::formula_router;
pub use service::{FormulaAdminError, FormulaAdminService};
