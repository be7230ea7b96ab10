//! Configuration and dependency wiring for the migrator.

mod dependencies;
mod migration;

pub use dependencies::Dependencies;
pub use migration::{MigrationConfig, OrderingMode};
