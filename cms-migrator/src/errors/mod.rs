//! Error types for the migration engine.
//!
//! Each component owns its error enum; [`MigrationError`] is the top-level
//! error returned by the orchestrator and the binary.

mod loader;
mod orchestrator;
mod processor;
mod translation;

pub use loader::LoaderError;
pub use orchestrator::{FetchError, MigrationError};
pub use processor::ProcessorError;
pub use translation::TranslationError;
