//! # CMS Migrator
//!
//! Migrates a legacy (v8) CMS instance to the v9 API: collection schemas are
//! translated and re-created, then every collection's records are paged
//! through, transformed and replayed into the target.
//!
//! ## Architecture
//!
//! The migrator follows the same Processor-Loader-Orchestrator split as the
//! other pipelines in this workspace:
//!
//! 1. **Translator**: converts legacy field and collection definitions
//! 2. **Sequencer**: orders collections so referenced data lands first
//! 3. **Processor**: rewrites record batches (id remapping, datetimes)
//! 4. **Loader**: pushes batches into the target
//! 5. **Orchestrator**: drives the checkpointed phases
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`translator`]: Schema translation
//! - [`sequencer`]: Collection ordering strategies
//! - [`processor`]: Batch record transformer
//! - [`loader`]: Batch writer
//! - [`orchestrator`]: Migration driver and run summary
//! - [`errors`]: Error types for the migrator

pub mod config;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod sequencer;
pub mod translator;

pub use config::{Dependencies, MigrationConfig, OrderingMode};
pub use errors::MigrationError;
pub use orchestrator::{CollectionReport, MigrationSummary, Orchestrator, OrchestratorConfig};
