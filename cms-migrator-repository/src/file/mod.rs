//! File backed implementations of the context store and error log.

mod context_store;
mod error_log;

pub use context_store::FileContextStore;
pub use error_log::FileErrorLog;
