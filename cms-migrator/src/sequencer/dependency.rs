//! Topological ordering over relation metadata.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::sequencer::{HeuristicOrder, OrderingStrategy};
use cms_migrator_shared::{LegacyCollection, LegacyRelation};

/// Orders collections so that every collection comes after the collections
/// its many-to-one relations point at.
///
/// Ties are broken by the heuristic order. Collections caught in a
/// reference cycle are appended in heuristic order once nothing else can
/// be placed.
#[derive(Debug, Clone, Default)]
pub struct DependencyOrder {
    relations: Vec<LegacyRelation>,
}

impl DependencyOrder {
    pub fn new(relations: Vec<LegacyRelation>) -> Self {
        Self { relations }
    }

    /// For each collection index, the indices it must come after.
    fn dependencies(&self, collections: &[LegacyCollection]) -> Vec<BTreeSet<usize>> {
        let index: HashMap<&str, usize> = collections
            .iter()
            .enumerate()
            .map(|(i, c)| (c.collection.as_str(), i))
            .collect();

        let mut dependencies = vec![BTreeSet::new(); collections.len()];
        for relation in self.relations.iter().filter(|r| !r.is_system()) {
            let Some(one) = relation.one_collection.as_deref() else {
                continue;
            };
            if let (Some(&many), Some(&one)) =
                (index.get(relation.many_collection.as_str()), index.get(one))
            {
                if many != one {
                    dependencies[many].insert(one);
                }
            }
        }
        dependencies
    }
}

impl OrderingStrategy for DependencyOrder {
    fn name(&self) -> &'static str {
        "dependency"
    }

    fn order(&self, collections: Vec<LegacyCollection>) -> Vec<LegacyCollection> {
        let seeded = HeuristicOrder.order(collections);
        let dependencies = self.dependencies(&seeded);

        let mut placed = vec![false; seeded.len()];
        let mut order = Vec::with_capacity(seeded.len());
        while let Some(next) = (0..seeded.len())
            .find(|&i| !placed[i] && dependencies[i].iter().all(|&d| placed[d]))
        {
            placed[next] = true;
            order.push(next);
        }

        let cyclic: Vec<usize> = (0..seeded.len()).filter(|&i| !placed[i]).collect();
        if !cyclic.is_empty() {
            warn!(
                collections = ?cyclic.iter().map(|&i| seeded[i].collection.as_str()).collect::<Vec<_>>(),
                "Reference cycle between collections, appending in heuristic order"
            );
        }
        order.extend(cyclic);

        let mut slots: Vec<Option<LegacyCollection>> = seeded.into_iter().map(Some).collect();
        let ordered: Vec<LegacyCollection> = order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();

        debug!(
            order = ?ordered.iter().map(|c| c.collection.as_str()).collect::<Vec<_>>(),
            "Dependency collection order"
        );
        ordered
    }
}
