//! Migration context.
//!
//! The context is the aggregate that flows through every phase of a run. It
//! is checkpointed after each phase so an interrupted run can resume.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::legacy::{LegacyCollection, LegacyRelation};
use crate::types::translated::TranslatedCollection;

/// A checkpointed phase of the migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationPhase {
    /// Legacy schema downloaded.
    Schema,
    /// Target collections created.
    Collections,
}

impl MigrationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Collections => "collections",
        }
    }
}

impl fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which phases a previous run has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSteps {
    #[serde(default)]
    pub schema: bool,
    #[serde(default)]
    pub collections: bool,
}

impl CompletedSteps {
    pub fn is_complete(&self, phase: MigrationPhase) -> bool {
        match phase {
            MigrationPhase::Schema => self.schema,
            MigrationPhase::Collections => self.collections,
        }
    }

    pub fn mark(&mut self, phase: MigrationPhase) {
        match phase {
            MigrationPhase::Schema => self.schema = true,
            MigrationPhase::Collections => self.collections = true,
        }
    }
}

/// Legacy to target identifier tables for system entities.
///
/// Keys are the legacy identifier rendered as a string, so numeric and
/// string identifiers share one lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdMaps {
    #[serde(default)]
    pub users: BTreeMap<String, Value>,
    #[serde(default)]
    pub files: BTreeMap<String, Value>,
}

impl IdMaps {
    /// Target identifier of a legacy user.
    pub fn user(&self, legacy_id: &Value) -> Option<&Value> {
        Self::key(legacy_id).and_then(|key| self.users.get(&key))
    }

    /// Target identifier of a legacy file.
    pub fn file(&self, legacy_id: &Value) -> Option<&Value> {
        Self::key(legacy_id).and_then(|key| self.files.get(&key))
    }

    fn key(legacy_id: &Value) -> Option<String> {
        match legacy_id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// State shared by all phases of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationContext {
    /// Legacy collections selected for migration.
    #[serde(default)]
    pub collections: Vec<LegacyCollection>,
    #[serde(default)]
    pub relations: Vec<LegacyRelation>,
    /// Total row count per legacy collection.
    #[serde(default)]
    pub counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub id_maps: IdMaps,
    /// Translated collections in creation order.
    #[serde(default)]
    pub translated_collections: Vec<TranslatedCollection>,
    #[serde(default)]
    pub completed_steps: CompletedSteps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl MigrationContext {
    pub fn new(id_maps: IdMaps) -> Self {
        Self {
            id_maps,
            ..Default::default()
        }
    }

    /// Row count recorded for a collection, zero if never counted.
    pub fn count_for(&self, collection: &str) -> u64 {
        self.counts.get(collection).copied().unwrap_or(0)
    }

    /// Record a finished phase and the time of the checkpoint.
    pub fn mark_completed(&mut self, phase: MigrationPhase) {
        self.completed_steps.mark(phase);
        self.saved_at = Some(Utc::now());
    }
}
