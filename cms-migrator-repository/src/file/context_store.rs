//! JSON file implementation of [`ContextStore`].

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::errors::RepositoryError;
use crate::interfaces::ContextStore;
use cms_migrator_shared::{MigrationContext, MigrationPhase};

/// Stores the migration context as a single pretty-printed JSON document.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so an interrupted write never leaves a truncated checkpoint.
pub struct FileContextStore {
    path: PathBuf,
}

impl FileContextStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ContextStore for FileContextStore {
    async fn read(&self) -> Result<Option<MigrationContext>, RepositoryError> {
        if !fs::try_exists(&self.path).await? {
            debug!(path = %self.path.display(), "No saved context");
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).await?;
        let context: MigrationContext = serde_json::from_str(&raw)?;

        info!(
            path = %self.path.display(),
            schema = context.completed_steps.schema,
            collections = context.completed_steps.collections,
            "Loaded saved context"
        );
        Ok(Some(context))
    }

    async fn write(
        &self,
        context: &MigrationContext,
        phase: MigrationPhase,
    ) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let raw = serde_json::to_string_pretty(context)?;
        let temp = self.temp_path();
        fs::write(&temp, raw).await?;
        fs::rename(&temp, &self.path).await?;

        info!(path = %self.path.display(), phase = %phase, "Saved context");
        Ok(())
    }
}
