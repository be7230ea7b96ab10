//! Per-collection outcome of the data phase.

use tracing::{info, warn};

use cms_migrator_shared::MigrationContext;

/// What happened to one collection's records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionReport {
    pub collection: String,
    /// Row count reported by the source.
    pub total: u64,
    pub pages: u64,
    pub pages_fetched: u64,
    pub records_written: u64,
    /// Batches the target rejected.
    pub failed_batches: u64,
    /// Records dropped by the transformer.
    pub rejected_records: u64,
    pub unmapped_references: u64,
    /// Why the rest of the collection was skipped, if it was.
    pub aborted: Option<String>,
}

impl CollectionReport {
    pub fn new(collection: impl Into<String>, total: u64, pages: u64) -> Self {
        Self {
            collection: collection.into(),
            total,
            pages,
            ..Default::default()
        }
    }

    /// Whether every page was fetched, transformed and written without loss.
    pub fn is_clean(&self) -> bool {
        self.aborted.is_none()
            && self.failed_batches == 0
            && self.rejected_records == 0
            && self.pages_fetched == self.pages
    }
}

/// Result of a completed run: the final context and one report per
/// collection, in migration order.
#[derive(Debug, Clone)]
pub struct MigrationSummary {
    pub context: MigrationContext,
    pub collections: Vec<CollectionReport>,
}

impl MigrationSummary {
    pub fn records_written(&self) -> u64 {
        self.collections.iter().map(|r| r.records_written).sum()
    }

    pub fn failed_batches(&self) -> u64 {
        self.collections.iter().map(|r| r.failed_batches).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.collections.iter().all(CollectionReport::is_clean)
    }

    /// Names of the collections that need a manual follow-up, in run order.
    pub fn incomplete_collections(&self) -> Vec<&str> {
        self.collections
            .iter()
            .filter(|report| !report.is_clean())
            .map(|report| report.collection.as_str())
            .collect()
    }

    /// Log one line per collection, then the totals.
    pub fn log(&self) {
        for report in &self.collections {
            if report.is_clean() {
                info!(
                    collection = %report.collection,
                    total = report.total,
                    pages = report.pages,
                    records_written = report.records_written,
                    unmapped_references = report.unmapped_references,
                    "Collection migrated"
                );
            } else {
                warn!(
                    collection = %report.collection,
                    total = report.total,
                    pages = report.pages,
                    pages_fetched = report.pages_fetched,
                    records_written = report.records_written,
                    failed_batches = report.failed_batches,
                    rejected_records = report.rejected_records,
                    unmapped_references = report.unmapped_references,
                    aborted = ?report.aborted,
                    "Collection migrated with failures"
                );
            }
        }

        info!(
            collections = self.collections.len(),
            records_written = self.records_written(),
            failed_batches = self.failed_batches(),
            clean = self.is_clean(),
            "Migration summary"
        );
    }
}
