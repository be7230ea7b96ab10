//! # CMS Migrator Shared
//!
//! This crate defines the data structures shared across the migrator crates:
//! the legacy (v8) schema as downloaded from the source instance, the
//! translated (v9) schema pushed to the target instance, and the migration
//! context that is checkpointed between phases.

pub mod types;

pub use types::context::{CompletedSteps, IdMaps, MigrationContext, MigrationPhase};
pub use types::legacy::{LegacyCollection, LegacyField, LegacyRelation, LegacyTranslation};
pub use types::translated::{
    CollectionMeta, FieldMeta, FieldSchema, TranslatedCollection, TranslatedField, Translation,
};
