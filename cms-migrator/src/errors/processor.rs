//! Error types for the batch record transformer.
use thiserror::Error;

/// Errors raised while transforming a single record.
///
/// A failing record is dropped from its batch; the rest of the batch is kept.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Invalid date '{value}' in field '{field}'")]
    InvalidDate { field: String, value: String },
}
