//! Legacy source trait definition.
//!
//! This module defines the read contract against the legacy (v8) instance.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::RepositoryError;
use cms_migrator_shared::{LegacyCollection, LegacyRelation};

/// Abstracts read access to the legacy instance.
///
/// Implementations return raw records as JSON objects; the engine never
/// interprets record shape beyond the fields it rewrites.
#[async_trait]
pub trait LegacySource: Send + Sync {
    /// Fetch every collection definition, system collections included.
    async fn fetch_collections(&self) -> Result<Vec<LegacyCollection>, RepositoryError>;

    /// Fetch every relation definition.
    async fn fetch_relations(&self) -> Result<Vec<LegacyRelation>, RepositoryError>;

    /// Fetch the total number of records in a collection.
    async fn fetch_total_count(&self, collection: &str) -> Result<u64, RepositoryError>;

    /// Fetch one page of records.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection to read from
    /// * `offset` - Number of records to skip
    /// * `limit` - Maximum number of records to return
    async fn fetch_items(
        &self,
        collection: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Value>, RepositoryError>;
}
