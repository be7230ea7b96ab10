//! Loader module for the migration engine.
//!
//! Writes transformed record batches to the target instance.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::errors::LoaderError;
use cms_migrator_repository::TargetSink;
use cms_migrator_shared::LegacyCollection;
use serde_json::Value;

/// Loader that pushes record batches into the target.
///
/// Regular collections receive one bulk insert per batch. Singleton
/// collections hold exactly one record, so the first record of the batch
/// overwrites it and the rest are ignored.
pub struct BatchLoader {
    sink: Arc<dyn TargetSink>,
}

impl BatchLoader {
    /// Create a new loader writing to `sink`.
    pub fn new(sink: Arc<dyn TargetSink>) -> Self {
        Self { sink }
    }

    /// Push one batch of records.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of records written (zero for an empty batch)
    /// * `Err(LoaderError)` - If the target rejected the batch
    #[instrument(skip(self, collection, records), fields(collection = %collection.collection, record_count = records.len()))]
    pub async fn push(
        &self,
        collection: &LegacyCollection,
        records: &[Value],
    ) -> Result<usize, LoaderError> {
        let Some(first) = records.first() else {
            debug!("Empty batch, nothing to push");
            return Ok(0);
        };

        let (result, written) = if collection.single {
            (
                self.sink
                    .update_singleton(&collection.collection, first)
                    .await,
                1,
            )
        } else {
            (
                self.sink
                    .create_items(&collection.collection, records)
                    .await,
                records.len(),
            )
        };

        result.map_err(|source| LoaderError::Write {
            collection: collection.collection.clone(),
            records: records.len(),
            source,
        })?;

        debug!(written, singleton = collection.single, "Pushed batch");
        Ok(written)
    }
}
