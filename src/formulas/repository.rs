use super::domain::FormulaRecord;

/// Storage abstraction for formula administration, so the service can
/// be exercised without the hosted backend.
pub trait FormulaRepository: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<FormulaRecord>, FormulaRepositoryError>;
    fn list(&self) -> Result<Vec<FormulaRecord>, FormulaRepositoryError>;
    fn save(&self, record: FormulaRecord) -> Result<(), FormulaRepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FormulaRepositoryError {
    #[error("formula not found")]
    NotFound,
    #[error("formula storage unavailable: {0}")]
    Unavailable(String),
}
