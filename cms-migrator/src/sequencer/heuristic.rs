//! Heuristic ordering based on field interfaces and collection notes.

use tracing::debug;

use crate::sequencer::OrderingStrategy;
use cms_migrator_shared::LegacyCollection;

/// Notes the legacy admin app writes on junction collections, in every
/// locale it shipped with.
const JUNCTION_NOTES: &[&str] = &[
    "連接點集合",
    "交叉集合",
    "中継コレクション",
    "Узловая Коллекция",
    "Verbindingscollectie",
    "Verbindungssammlung",
    "Збірна колекція",
    "Spojovací kategorie",
    "Junction Collection",
    "Pengumpulan Persimpangan",
    "Kesişim Koleksiyonu",
    "مجموعة تلاقي",
    "Kolekcja Junction",
    "Jução da coleção",
    "Koleksi Persimpangan",
    "Collezione Junction",
    "Colección de empalme",
    "Collection de jonction",
    "Colección de unión",
];

/// Whether a collection note marks a junction (many-to-many bridge) collection.
pub fn is_junction_collection(note: Option<&str>) -> bool {
    note.is_some_and(|note| JUNCTION_NOTES.contains(&note))
}

/// Two stable passes: collections holding a many-to-one field move after
/// those without one, then junction collections move to the very end.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicOrder;

impl OrderingStrategy for HeuristicOrder {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn order(&self, mut collections: Vec<LegacyCollection>) -> Vec<LegacyCollection> {
        collections.sort_by_key(LegacyCollection::has_many_to_one_field);
        collections.sort_by_key(|c| is_junction_collection(c.note.as_deref()));

        debug!(
            order = ?collections.iter().map(|c| c.collection.as_str()).collect::<Vec<_>>(),
            "Heuristic collection order"
        );
        collections
    }
}
