//! HTTP implementation of [`LegacySource`] for v8 instances.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ApiConfig;
use crate::errors::RepositoryError;
use crate::http::client::HttpApi;
use crate::interfaces::LegacySource;
use crate::types::ResponseEnvelope;
use cms_migrator_shared::{LegacyCollection, LegacyRelation};

/// Reads schema and records from a legacy instance over its REST API.
pub struct HttpLegacySource {
    api: HttpApi,
}

impl HttpLegacySource {
    /// Create a source for the instance described by `config`.
    pub fn new(config: &ApiConfig) -> Result<Self, RepositoryError> {
        Ok(Self {
            api: HttpApi::new(config)?,
        })
    }

    fn items_path(collection: &str) -> String {
        format!("items/{}", collection)
    }
}

#[async_trait]
impl LegacySource for HttpLegacySource {
    #[instrument(skip(self))]
    async fn fetch_collections(&self) -> Result<Vec<LegacyCollection>, RepositoryError> {
        let envelope: ResponseEnvelope<Vec<LegacyCollection>> =
            self.api.get("collections", &[]).await?;
        debug!(count = envelope.data.len(), "Fetched collections");
        Ok(envelope.data)
    }

    #[instrument(skip(self))]
    async fn fetch_relations(&self) -> Result<Vec<LegacyRelation>, RepositoryError> {
        let envelope: ResponseEnvelope<Vec<LegacyRelation>> = self
            .api
            .get("relations", &[("limit", "-1".to_string())])
            .await?;
        debug!(count = envelope.data.len(), "Fetched relations");
        Ok(envelope.data)
    }

    async fn fetch_total_count(&self, collection: &str) -> Result<u64, RepositoryError> {
        let envelope: ResponseEnvelope<Value> = self
            .api
            .get(
                &Self::items_path(collection),
                &[
                    ("limit", "1".to_string()),
                    ("meta", "total_count".to_string()),
                ],
            )
            .await?;

        envelope
            .meta
            .and_then(|meta| meta.total_count)
            .ok_or_else(|| {
                RepositoryError::decode(format!("missing total_count for {}", collection))
            })
    }

    async fn fetch_items(
        &self,
        collection: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Value>, RepositoryError> {
        let envelope: ResponseEnvelope<Vec<Value>> = self
            .api
            .get(
                &Self::items_path(collection),
                &[
                    ("offset", offset.to_string()),
                    ("limit", limit.to_string()),
                    ("meta", "total_count".to_string()),
                ],
            )
            .await?;
        Ok(envelope.data)
    }
}
