//! Error types for the batch loader.
use cms_migrator_repository::RepositoryError;
use thiserror::Error;

/// A batch could not be written to the target.
///
/// Returned as a value to the orchestrator, which logs it and moves on to
/// the next page.
#[derive(Debug, Clone, Error)]
pub enum LoaderError {
    #[error("Failed to write {records} records to '{collection}': {source}")]
    Write {
        collection: String,
        records: usize,
        #[source]
        source: RepositoryError,
    },
}

impl LoaderError {
    /// HTTP status the target answered with, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Write { source, .. } => source.status(),
        }
    }

    /// Full response detail of the failed write.
    pub fn detail(&self) -> serde_json::Value {
        match self {
            Self::Write { source, .. } => source.detail(),
        }
    }
}
