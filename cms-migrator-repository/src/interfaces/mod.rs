//! Interface definitions for the migrator collaborators.
//!
//! The engine only depends on these traits, so the HTTP and file backed
//! implementations can be swapped for in-memory mocks in tests.

mod context_store;
mod error_log;
mod legacy_source;
mod target_sink;

pub use context_store::ContextStore;
pub use error_log::ErrorLog;
pub use legacy_source::LegacySource;
pub use target_sink::TargetSink;
