//! This module defines the core data structures used across the migrator.
//! It groups the legacy input model, the translated output model and the
//! migration context.

pub mod context;
pub mod legacy;
pub mod translated;
