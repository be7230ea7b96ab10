//! Orchestrator module for the migration engine.
//!
//! Drives a run through its phases:
//!
//! 1. **Schema**: download legacy collections and relations (checkpointed)
//! 2. **Collections**: translate and create every collection in sequence
//!    order (checkpointed)
//! 3. **Data**: page through each collection's records, transform and push
//!    them
//!
//! Every network call is awaited before the next one starts, so writes to
//! the target always observe earlier writes.

mod summary;

pub use summary::{CollectionReport, MigrationSummary};

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::{debug, error, info, instrument, warn};

use crate::config::OrderingMode;
use crate::errors::{FetchError, MigrationError};
use crate::loader::BatchLoader;
use crate::processor::RecordTransformer;
use crate::sequencer::{strategy_for, DependencyOrder, OrderingStrategy};
use crate::translator::{invalid_json_default, translate_collection};
use cms_migrator_repository::{ContextStore, ErrorLog, LegacySource, TargetSink};
use cms_migrator_shared::{LegacyCollection, MigrationContext, MigrationPhase};

/// Records per page fetched from the source.
pub const PAGE_SIZE: u64 = 100;

/// Number of pages needed to read `total` records.
pub fn page_count(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE)
}

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Explicit collection order, overriding the ordering strategy.
    pub collection_order: Option<Vec<String>>,
    /// Collections left out of the migration entirely.
    pub skip_collections: Vec<String>,
    pub ordering: OrderingMode,
    /// Delay before the single retry of a failed page fetch.
    pub fetch_retry_delay: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            collection_order: None,
            skip_collections: Vec::new(),
            ordering: OrderingMode::default(),
            fetch_retry_delay: Duration::from_millis(500),
        }
    }
}

/// Orchestrator that coordinates a migration run.
pub struct Orchestrator {
    source: Arc<dyn LegacySource>,
    target: Arc<dyn TargetSink>,
    context_store: Arc<dyn ContextStore>,
    error_log: Arc<dyn ErrorLog>,
    loader: BatchLoader,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator over the given collaborators.
    pub fn new(
        source: Arc<dyn LegacySource>,
        target: Arc<dyn TargetSink>,
        context_store: Arc<dyn ContextStore>,
        error_log: Arc<dyn ErrorLog>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            source,
            loader: BatchLoader::new(target.clone()),
            target,
            context_store,
            error_log,
            config,
        }
    }

    /// Run the migration, resuming after any phase `context` records as done.
    ///
    /// # Returns
    ///
    /// * `Ok(MigrationSummary)` - The run completed; individual pages or
    ///   batches may still have failed, see the per-collection reports
    /// * `Err(MigrationError)` - The schema could not be read, translated or
    ///   created, the row counts could not be read, or a checkpoint failed
    #[instrument(skip(self, context))]
    pub async fn run(
        &self,
        mut context: MigrationContext,
    ) -> Result<MigrationSummary, MigrationError> {
        info!("Starting migration");

        if context.completed_steps.is_complete(MigrationPhase::Schema) {
            info!(
                collections = context.collections.len(),
                "Schema already downloaded, skipping"
            );
        } else {
            self.download_schema(&mut context).await?;
            self.checkpoint(&mut context, MigrationPhase::Schema).await?;
        }

        let ordered = self.sequence(&context);

        if context.completed_steps.is_complete(MigrationPhase::Collections) {
            info!(
                collections = context.translated_collections.len(),
                "Collections already created, skipping"
            );
        } else {
            self.create_collections(&mut context, &ordered).await?;
            self.checkpoint(&mut context, MigrationPhase::Collections)
                .await?;
        }

        self.fetch_counts(&mut context, &ordered).await?;

        let mut reports = Vec::with_capacity(ordered.len());
        for collection in &ordered {
            reports.push(self.migrate_records(&context, collection).await);
        }

        let summary = MigrationSummary {
            context,
            collections: reports,
        };
        summary.log();
        Ok(summary)
    }

    /// Download the legacy schema, leaving out system and skipped collections.
    async fn download_schema(&self, context: &mut MigrationContext) -> Result<(), MigrationError> {
        let collections = self
            .source
            .fetch_collections()
            .await
            .map_err(|e| MigrationError::source_failed("fetch collections", e))?;
        let fetched = collections.len();

        context.collections = collections
            .into_iter()
            .filter(|c| !c.is_system())
            .filter(|c| !self.config.skip_collections.contains(&c.collection))
            .collect();

        context.relations = self
            .source
            .fetch_relations()
            .await
            .map_err(|e| MigrationError::source_failed("fetch relations", e))?;

        info!(
            fetched,
            selected = context.collections.len(),
            relations = context.relations.len(),
            "Downloaded schema"
        );
        Ok(())
    }

    fn sequence(&self, context: &MigrationContext) -> Vec<LegacyCollection> {
        let strategy: Box<dyn OrderingStrategy> =
            match (&self.config.collection_order, self.config.ordering) {
                (None, OrderingMode::Dependency) => {
                    Box::new(DependencyOrder::new(context.relations.clone()))
                }
                (order, _) => strategy_for(order.as_deref()),
            };

        let ordered = strategy.order(context.collections.clone());
        info!(
            strategy = strategy.name(),
            order = ?ordered.iter().map(|c| c.collection.as_str()).collect::<Vec<_>>(),
            "Collection order"
        );
        ordered
    }

    /// Translate and create every collection. Any failure aborts the run.
    async fn create_collections(
        &self,
        context: &mut MigrationContext,
        ordered: &[LegacyCollection],
    ) -> Result<(), MigrationError> {
        for collection in ordered {
            let translated = match translate_collection(collection) {
                Ok(translated) => translated,
                Err(e) => {
                    error!(collection = %collection.collection, error = %e, "Failed to translate collection");
                    self.log_failure(
                        "collections",
                        json!({ "collection": collection.collection, "error": e.to_string() }),
                    )
                    .await;
                    return Err(e.into());
                }
            };

            if let Err(e) = self.target.create_collection(&translated).await {
                error!(collection = %collection.collection, error = %e, "Failed to create collection");
                self.log_failure(
                    "collections",
                    json!({
                        "collection": collection.collection,
                        "error": e.to_string(),
                        "detail": e.detail(),
                        "payload": translated,
                    }),
                )
                .await;
                return Err(MigrationError::Schema {
                    collection: collection.collection.clone(),
                    source: e,
                });
            }

            for field in &collection.fields {
                if let Some(parse_error) = invalid_json_default(field) {
                    self.log_failure(
                        "default_value",
                        json!({
                            "collection": collection.collection,
                            "field": field.field,
                            "default_value": field.default_value,
                            "error": parse_error,
                        }),
                    )
                    .await;
                }
            }

            info!(
                collection = %collection.collection,
                fields = translated.fields.len(),
                "Created collection"
            );
            context.translated_collections.push(translated);
        }

        Ok(())
    }

    async fn fetch_counts(
        &self,
        context: &mut MigrationContext,
        ordered: &[LegacyCollection],
    ) -> Result<(), MigrationError> {
        for collection in ordered {
            let total = self
                .source
                .fetch_total_count(&collection.collection)
                .await
                .map_err(|e| {
                    MigrationError::source_failed(
                        format!("count records of '{}'", collection.collection),
                        e,
                    )
                })?;
            debug!(collection = %collection.collection, total, "Counted records");
            context.counts.insert(collection.collection.clone(), total);
        }

        Ok(())
    }

    /// Copy every page of one collection. Failures are recorded in the
    /// report and the error log, never returned.
    #[instrument(skip(self, context, collection), fields(collection = %collection.collection))]
    async fn migrate_records(
        &self,
        context: &MigrationContext,
        collection: &LegacyCollection,
    ) -> CollectionReport {
        let total = context.count_for(&collection.collection);
        let pages = page_count(total);
        let mut report = CollectionReport::new(&collection.collection, total, pages);

        let transformer =
            RecordTransformer::for_collection(collection, &context.relations, &context.id_maps);

        info!(total, pages, passthrough = transformer.is_passthrough(), "Migrating records");

        for page in 0..pages {
            let records = match self.fetch_page(&collection.collection, page).await {
                Ok(records) => records,
                Err(e) => {
                    let FetchError::Transient { source, .. } = &e;
                    error!(page, status = ?source.status(), error = %e, "Giving up on collection");
                    self.log_failure(
                        "fetch",
                        json!({
                            "collection": collection.collection,
                            "page": page,
                            "offset": page * PAGE_SIZE,
                            "error": e.to_string(),
                            "detail": source.detail(),
                        }),
                    )
                    .await;
                    report.aborted = Some(e.to_string());
                    break;
                }
            };
            report.pages_fetched += 1;

            let batch = transformer.transform_batch(records);
            report.unmapped_references += batch.unmapped_references;
            for rejected in &batch.rejected {
                report.rejected_records += 1;
                self.log_failure(
                    "transform",
                    json!({
                        "collection": collection.collection,
                        "page": page,
                        "error": rejected.error.to_string(),
                        "record": rejected.record,
                    }),
                )
                .await;
            }

            match self.loader.push(collection, &batch.records).await {
                Ok(written) => report.records_written += written as u64,
                Err(e) => {
                    error!(page, status = ?e.status(), error = %e, "Failed to push batch");
                    report.failed_batches += 1;
                    self.log_failure(
                        "items",
                        json!({
                            "collection": collection.collection,
                            "page": page,
                            "records": batch.records.len(),
                            "status": e.status(),
                            "error": e.to_string(),
                            "detail": e.detail(),
                        }),
                    )
                    .await;
                }
            }
        }

        report
    }

    /// Fetch one page, retrying exactly once after the configured delay.
    async fn fetch_page(&self, collection: &str, page: u64) -> Result<Vec<Value>, FetchError> {
        let offset = page * PAGE_SIZE;
        let strategy = FixedInterval::new(self.config.fetch_retry_delay).take(1);

        Retry::spawn(strategy, || async move {
            self.source
                .fetch_items(collection, offset, PAGE_SIZE)
                .await
                .inspect_err(|e| warn!(collection, page, error = %e, "Page fetch failed"))
        })
        .await
        .map_err(|source| FetchError::Transient {
            collection: collection.to_string(),
            page,
            source,
        })
    }

    async fn checkpoint(
        &self,
        context: &mut MigrationContext,
        phase: MigrationPhase,
    ) -> Result<(), MigrationError> {
        context.mark_completed(phase);
        self.context_store
            .write(context, phase)
            .await
            .map_err(MigrationError::Context)
    }

    /// Append to the error log. A failing log is reported but never stops
    /// the run.
    async fn log_failure(&self, operation: &str, payload: Value) {
        if let Err(e) = self.error_log.append(operation, &payload).await {
            error!(operation, error = %e, payload = %payload, "Failed to write error log");
        }
    }
}
