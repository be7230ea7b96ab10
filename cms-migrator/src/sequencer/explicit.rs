//! Operator supplied ordering.

use tracing::warn;

use crate::sequencer::OrderingStrategy;
use cms_migrator_shared::LegacyCollection;

/// Orders collections by their position in an explicit list.
///
/// Collections missing from the list keep their relative order and come
/// before every listed collection.
#[derive(Debug, Clone, Default)]
pub struct ExplicitOrder {
    order: Vec<String>,
}

impl ExplicitOrder {
    pub fn new(order: Vec<String>) -> Self {
        Self { order }
    }

    /// Index in the list; `None` (unlisted) sorts first.
    fn position(&self, collection: &str) -> Option<usize> {
        self.order.iter().position(|name| name == collection)
    }
}

impl OrderingStrategy for ExplicitOrder {
    fn name(&self) -> &'static str {
        "explicit"
    }

    fn order(&self, mut collections: Vec<LegacyCollection>) -> Vec<LegacyCollection> {
        let unlisted: Vec<&str> = collections
            .iter()
            .filter(|c| self.position(&c.collection).is_none())
            .map(|c| c.collection.as_str())
            .collect();
        if !unlisted.is_empty() {
            warn!(collections = ?unlisted, "Collections missing from explicit order");
        }

        collections.sort_by_key(|c| self.position(&c.collection));
        collections
    }
}
