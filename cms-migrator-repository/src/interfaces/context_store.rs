//! Context store trait definition.

use async_trait::async_trait;

use crate::errors::RepositoryError;
use cms_migrator_shared::{MigrationContext, MigrationPhase};

/// Persists the migration context so a later run can skip finished phases.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Load the last checkpoint, `None` when no run has been recorded yet.
    async fn read(&self) -> Result<Option<MigrationContext>, RepositoryError>;

    /// Persist the context after `phase` has finished.
    async fn write(
        &self,
        context: &MigrationContext,
        phase: MigrationPhase,
    ) -> Result<(), RepositoryError>;
}
