//! Error types for the schema translator.
use thiserror::Error;

/// Errors raised while translating a legacy schema definition.
///
/// Both variants are fatal for the schema phase: a collection created from a
/// partial translation would receive records it cannot store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranslationError {
    /// No target type is known for the legacy type.
    #[error("No target type for legacy type '{field_type}' on field '{collection}.{field}'")]
    UnmappedType {
        collection: String,
        field: String,
        field_type: String,
    },

    /// A status field lacks the soft-delete or draft entry in its mapping.
    #[error("Status field '{collection}.{field}' has no {missing} entry in its status mapping")]
    MissingArchiveMapping {
        collection: String,
        field: String,
        missing: &'static str,
    },
}

impl TranslationError {
    /// Attach the owning collection to an error raised at field level.
    pub fn in_collection(self, collection: &str) -> Self {
        match self {
            Self::UnmappedType {
                field, field_type, ..
            } => Self::UnmappedType {
                collection: collection.to_string(),
                field,
                field_type,
            },
            Self::MissingArchiveMapping { field, missing, .. } => Self::MissingArchiveMapping {
                collection: collection.to_string(),
                field,
                missing,
            },
        }
    }
}
