//! Error types for the migrator repository.
//!
//! This module provides a unified error type for all collaborator operations.

mod repository_error;

pub use repository_error::RepositoryError;
