//! Error types for the migration orchestrator.
use cms_migrator_repository::RepositoryError;
use thiserror::Error;

use crate::errors::translation::TranslationError;

/// A page could not be fetched, even after the retry.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Failed to fetch page {page} of '{collection}' after retry: {source}")]
    Transient {
        collection: String,
        page: u64,
        #[source]
        source: RepositoryError,
    },
}

/// Errors that abort a migration run.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading from the legacy instance failed outside the paged data phase.
    #[error("Source error during {operation}: {source}")]
    Source {
        operation: String,
        #[source]
        source: RepositoryError,
    },

    /// A collection schema could not be translated.
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// The target rejected a collection schema.
    #[error("Failed to create collection '{collection}': {source}")]
    Schema {
        collection: String,
        #[source]
        source: RepositoryError,
    },

    /// Reading or writing the checkpoint failed.
    #[error("Context error: {0}")]
    Context(RepositoryError),
}

impl MigrationError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a source error for an operation.
    pub fn source_failed(operation: impl Into<String>, source: RepositoryError) -> Self {
        Self::Source {
            operation: operation.into(),
            source,
        }
    }
}
