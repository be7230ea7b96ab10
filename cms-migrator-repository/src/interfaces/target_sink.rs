//! Target sink trait definition.
//!
//! This module defines the write contract against the target (v9) instance.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::RepositoryError;
use cms_migrator_shared::TranslatedCollection;

/// Abstracts write access to the target instance.
///
/// Every call is awaited before the next one is issued, so later writes
/// observe earlier ones (a field referencing another collection finds it
/// already created).
#[async_trait]
pub trait TargetSink: Send + Sync {
    /// Create a collection together with its fields.
    async fn create_collection(
        &self,
        collection: &TranslatedCollection,
    ) -> Result<(), RepositoryError>;

    /// Insert a batch of records into a regular collection.
    async fn create_items(&self, collection: &str, items: &[Value])
        -> Result<(), RepositoryError>;

    /// Overwrite the single record of a singleton collection.
    async fn update_singleton(&self, collection: &str, item: &Value)
        -> Result<(), RepositoryError>;
}
