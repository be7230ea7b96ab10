//! # CMS Migrator Repository
//!
//! This crate provides the narrow contracts the migration engine needs from
//! the outside world, together with concrete implementations:
//!
//! - [`LegacySource`]: reads schema and records from the legacy (v8) API
//! - [`TargetSink`]: writes schema and records to the target (v9) API
//! - [`ContextStore`]: checkpoints the migration context between phases
//! - [`ErrorLog`]: append-only sink for failure payloads
//!
//! The HTTP implementations live in [`http`], the file based ones in [`file`].

pub mod config;
pub mod errors;
pub mod file;
pub mod http;
pub mod interfaces;
pub mod types;

pub use config::ApiConfig;
pub use errors::RepositoryError;
pub use file::{FileContextStore, FileErrorLog};
pub use http::{HttpLegacySource, HttpTargetSink};
pub use interfaces::{ContextStore, ErrorLog, LegacySource, TargetSink};
pub use types::{ResponseEnvelope, ResponseMeta};
