use super::domain::{DraftUpdate, FormulaRecord, FormulaStatus};
use super::repository::{FormulaRepository, FormulaRepositoryError};
use crate::scoring::FormulaConfigError;
use std::sync::Arc;
use tracing::info;

/// Draft editing and publishing for scoring formulas.
///
/// This is the one place the point-budget invariant is enforced: a
/// config whose max points do not total 1000 can be neither saved nor
/// published. Publishing is irreversible.
pub struct FormulaAdminService<R> {
    repository: Arc<R>,
}

impl<R: FormulaRepository> FormulaAdminService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn list_all(&self) -> Result<Vec<FormulaRecord>, FormulaAdminError> {
        Ok(self.repository.list()?)
    }

    pub fn list_published(&self) -> Result<Vec<FormulaRecord>, FormulaAdminError> {
        let mut records = self.repository.list()?;
        records.retain(FormulaRecord::is_published);
        Ok(records)
    }

    pub fn get(&self, id: &str) -> Result<FormulaRecord, FormulaAdminError> {
        self.repository
            .get(id)?
            .ok_or_else(|| FormulaAdminError::NotFound(id.to_owned()))
    }

    /// Apply an edit to a draft. Published formulas are read-only.
    pub fn update_draft(
        &self,
        id: &str,
        update: DraftUpdate,
    ) -> Result<FormulaRecord, FormulaAdminError> {
        let mut record = self.get(id)?;
        if record.is_published() {
            return Err(FormulaAdminError::PublishedImmutable(record.id));
        }

        update.config.validate(record.battle_type)?;

        if let Some(name) = update.name {
            let trimmed = name.trim();
            if !trimmed.is_empty() {
                record.name = trimmed.to_owned();
            }
        }
        record.config = update.config;
        record.version += 1;

        self.repository.save(record.clone())?;
        Ok(record)
    }

    /// Promote a draft to published. There is no way back.
    pub fn publish(&self, id: &str) -> Result<FormulaRecord, FormulaAdminError> {
        let mut record = self.get(id)?;
        if record.is_published() {
            return Err(FormulaAdminError::PublishedImmutable(record.id));
        }

        record.config.validate(record.battle_type)?;
        record.status = FormulaStatus::Published;
        self.repository.save(record.clone())?;

        info!(
            formula = %record.id,
            battle = record.battle_type.as_str(),
            version = record.version,
            "formula published"
        );
        Ok(record)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormulaAdminError {
    #[error("formula '{0}' not found")]
    NotFound(String),
    #[error("formula '{0}' is published and read-only")]
    PublishedImmutable(String),
    #[error(transparent)]
    Config(#[from] FormulaConfigError),
    #[error(transparent)]
    Repository(#[from] FormulaRepositoryError),
}
