//! Dependency initialization and wiring for the migrator.

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config::MigrationConfig;
use crate::orchestrator::Orchestrator;
use crate::MigrationError;
use cms_migrator_repository::{
    ContextStore, FileContextStore, FileErrorLog, HttpLegacySource, HttpTargetSink,
};
use cms_migrator_shared::{IdMaps, MigrationContext};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// Context to run with: the last checkpoint, or a fresh one.
    pub context: MigrationContext,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`MigrationConfig::from_env`] for the variables read.
    pub async fn new() -> Result<Self, MigrationError> {
        Self::from_config(MigrationConfig::from_env()?).await
    }

    /// Initialize all dependencies from an explicit configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(MigrationError)` - If a URL is invalid or the saved context or
    ///   id maps cannot be read
    pub async fn from_config(config: MigrationConfig) -> Result<Self, MigrationError> {
        info!(
            source_url = %config.source.base_url,
            target_url = %config.target.base_url,
            context_path = %config.context_path.display(),
            error_log_dir = %config.error_log_dir.display(),
            ordering = ?config.orchestrator.ordering,
            explicit_order = config.orchestrator.collection_order.is_some(),
            skipped = config.orchestrator.skip_collections.len(),
            "Initializing dependencies"
        );

        let source = HttpLegacySource::new(&config.source).map_err(|e| {
            MigrationError::config(format!("Failed to create legacy API client: {}", e))
        })?;
        let target = HttpTargetSink::new(&config.target).map_err(|e| {
            MigrationError::config(format!("Failed to create target API client: {}", e))
        })?;
        let context_store = FileContextStore::new(&config.context_path);
        let error_log = FileErrorLog::new(&config.error_log_dir);

        let context = match context_store.read().await.map_err(MigrationError::Context)? {
            Some(context) => context,
            None => {
                let id_maps = match &config.id_maps_path {
                    Some(path) => load_id_maps(path).await?,
                    None => IdMaps::default(),
                };
                info!(
                    users = id_maps.users.len(),
                    files = id_maps.files.len(),
                    "Starting from a fresh context"
                );
                MigrationContext::new(id_maps)
            }
        };

        let orchestrator = Orchestrator::new(
            Arc::new(source),
            Arc::new(target),
            Arc::new(context_store),
            Arc::new(error_log),
            config.orchestrator,
        );

        Ok(Self {
            orchestrator,
            context,
        })
    }
}

/// Read the user and file id maps of a previous system migration.
async fn load_id_maps(path: &Path) -> Result<IdMaps, MigrationError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        MigrationError::config(format!("Failed to read id maps {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        MigrationError::config(format!("Invalid id maps {}: {}", path.display(), e))
    })
}
