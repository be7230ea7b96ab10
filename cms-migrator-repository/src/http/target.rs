//! HTTP implementation of [`TargetSink`] for v9 instances.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ApiConfig;
use crate::errors::RepositoryError;
use crate::http::client::HttpApi;
use crate::interfaces::TargetSink;
use cms_migrator_shared::TranslatedCollection;

/// Writes schema and records to a target instance over its REST API.
pub struct HttpTargetSink {
    api: HttpApi,
}

impl HttpTargetSink {
    /// Create a sink for the instance described by `config`.
    pub fn new(config: &ApiConfig) -> Result<Self, RepositoryError> {
        Ok(Self {
            api: HttpApi::new(config)?,
        })
    }
}

#[async_trait]
impl TargetSink for HttpTargetSink {
    #[instrument(skip(self, collection), fields(collection = %collection.collection))]
    async fn create_collection(
        &self,
        collection: &TranslatedCollection,
    ) -> Result<(), RepositoryError> {
        self.api.post("collections", collection).await?;
        debug!(fields = collection.fields.len(), "Created collection");
        Ok(())
    }

    async fn create_items(
        &self,
        collection: &str,
        items: &[Value],
    ) -> Result<(), RepositoryError> {
        self.api
            .post(&format!("items/{}", collection), items)
            .await?;
        Ok(())
    }

    async fn update_singleton(
        &self,
        collection: &str,
        item: &Value,
    ) -> Result<(), RepositoryError> {
        self.api
            .patch(&format!("items/{}", collection), item)
            .await?;
        Ok(())
    }
}
