//! Sequencer module for the migration engine.
//!
//! Decides the order in which collections are created and populated, so
//! that records referencing other collections are inserted after the rows
//! they point to. Strategies sit behind [`OrderingStrategy`]:
//!
//! - [`ExplicitOrder`]: operator supplied list of identifiers
//! - [`HeuristicOrder`]: many-to-one holders, then junction collections last
//! - [`DependencyOrder`]: topological order over relation metadata, seeded
//!   with the heuristic order
//!
//! The heuristic is not a dependency sort: chains deeper than one level
//! (A references B which references C) can still come out in the wrong
//! order. Use an explicit order or the dependency strategy for those.

mod dependency;
mod explicit;
mod heuristic;

pub use dependency::DependencyOrder;
pub use explicit::ExplicitOrder;
pub use heuristic::{is_junction_collection, HeuristicOrder};

use cms_migrator_shared::LegacyCollection;

/// A way of ordering collections for sequential creation and population.
pub trait OrderingStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Reorder `collections`. Must return every input collection exactly once.
    fn order(&self, collections: Vec<LegacyCollection>) -> Vec<LegacyCollection>;
}

/// The explicit order if one is given, otherwise the default heuristic.
pub fn strategy_for(explicit: Option<&[String]>) -> Box<dyn OrderingStrategy> {
    match explicit {
        Some(order) => Box::new(ExplicitOrder::new(order.to_vec())),
        None => Box::new(HeuristicOrder),
    }
}

/// Order collections with an explicit list if one is given, otherwise with
/// the default heuristic.
pub fn sequence(
    collections: Vec<LegacyCollection>,
    explicit: Option<&[String]>,
) -> Vec<LegacyCollection> {
    strategy_for(explicit).order(collections)
}
