//! Processor module for the migration engine.
//!
//! Rewrites raw legacy records into the shape the target accepts: system
//! user and file references are remapped and datetime values normalized.

mod datetime;
mod record_transformer;

pub use datetime::{normalize_datetime, parse_datetime};
pub use record_transformer::{RecordTransformer, RejectedRecord, TransformedBatch};
