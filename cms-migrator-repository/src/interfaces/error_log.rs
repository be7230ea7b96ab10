//! Error log trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::RepositoryError;

/// Append-only sink for failure payloads, keyed by operation name.
///
/// Entries are the only trace of failures the run tolerates, so
/// implementations must never drop or rewrite earlier entries.
#[async_trait]
pub trait ErrorLog: Send + Sync {
    async fn append(&self, operation: &str, payload: &Value) -> Result<(), RepositoryError>;
}
