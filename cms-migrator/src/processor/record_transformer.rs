//! Batch record transformer implementation.

use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::errors::ProcessorError;
use crate::processor::datetime::normalize_datetime;
use cms_migrator_shared::{IdMaps, LegacyCollection, LegacyRelation};

const USERS_COLLECTION: &str = "directus_users";
const FILES_COLLECTION: &str = "directus_files";

/// System collection a reference field points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SystemTarget {
    Users,
    Files,
}

impl SystemTarget {
    fn from_collection(collection: &str) -> Option<Self> {
        match collection {
            USERS_COLLECTION => Some(Self::Users),
            FILES_COLLECTION => Some(Self::Files),
            _ => None,
        }
    }

    fn lookup<'m>(&self, id_maps: &'m IdMaps, legacy_id: &Value) -> Option<&'m Value> {
        match self {
            Self::Users => id_maps.user(legacy_id),
            Self::Files => id_maps.file(legacy_id),
        }
    }
}

#[derive(Debug, Clone)]
struct Remap {
    field: String,
    target: SystemTarget,
}

/// A record dropped from its batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub record: Value,
    pub error: ProcessorError,
}

/// Result of transforming one page of records.
#[derive(Debug, Default)]
pub struct TransformedBatch {
    /// Records ready to push, in source order.
    pub records: Vec<Value>,
    pub rejected: Vec<RejectedRecord>,
    /// References to users or files with no entry in the id maps.
    pub unmapped_references: u64,
}

/// Transforms the records of one collection.
///
/// Built once per collection from its field definitions and the relations
/// pointing from it to system collections.
#[derive(Debug)]
pub struct RecordTransformer<'a> {
    collection: String,
    remaps: Vec<Remap>,
    datetime_fields: Vec<String>,
    id_maps: &'a IdMaps,
}

impl<'a> RecordTransformer<'a> {
    pub fn for_collection(
        collection: &LegacyCollection,
        relations: &[LegacyRelation],
        id_maps: &'a IdMaps,
    ) -> Self {
        let remaps = relations
            .iter()
            .filter(|relation| {
                relation.many_collection == collection.collection && relation.is_system()
            })
            .filter_map(|relation| {
                let target = SystemTarget::from_collection(relation.one_collection.as_deref()?)?;
                Some(Remap {
                    field: relation.many_field.clone(),
                    target,
                })
            })
            .collect();

        let datetime_fields = collection
            .datetime_fields()
            .map(|field| field.field.clone())
            .collect();

        Self {
            collection: collection.collection.clone(),
            remaps,
            datetime_fields,
            id_maps,
        }
    }

    /// Whether records can be pushed exactly as fetched.
    pub fn is_passthrough(&self) -> bool {
        self.remaps.is_empty() && self.datetime_fields.is_empty()
    }

    /// Transform a page of records.
    ///
    /// A record with an unparseable datetime is moved to
    /// [`TransformedBatch::rejected`] untouched; the others are kept in order.
    #[instrument(skip(self, records), fields(collection = %self.collection, record_count = records.len()))]
    pub fn transform_batch(&self, records: Vec<Value>) -> TransformedBatch {
        if self.is_passthrough() {
            return TransformedBatch {
                records,
                ..Default::default()
            };
        }

        let mut batch = TransformedBatch {
            records: Vec::with_capacity(records.len()),
            ..Default::default()
        };

        for mut record in records {
            if !record.is_object() {
                batch.records.push(record);
                continue;
            }
            let Some(object) = record.as_object_mut() else {
                continue;
            };

            match self.normalized_dates(object) {
                Ok(dates) => {
                    for (field, value) in dates {
                        object.insert(field.to_string(), value);
                    }
                    batch.unmapped_references += self.remap_references(object);
                    batch.records.push(record);
                }
                Err(error) => {
                    warn!(collection = %self.collection, error = %error, "Rejected record");
                    batch.rejected.push(RejectedRecord { record, error });
                }
            }
        }

        debug!(
            kept = batch.records.len(),
            rejected = batch.rejected.len(),
            unmapped_references = batch.unmapped_references,
            "Transformed record batch"
        );
        batch
    }

    /// Normalized values of every non-null datetime field, computed without
    /// touching the record.
    fn normalized_dates(
        &self,
        object: &Map<String, Value>,
    ) -> Result<Vec<(&str, Value)>, ProcessorError> {
        let mut dates = Vec::with_capacity(self.datetime_fields.len());

        for field in &self.datetime_fields {
            let Some(value) = object.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let normalized =
                normalize_datetime(value).ok_or_else(|| ProcessorError::InvalidDate {
                    field: field.clone(),
                    value: value.as_str().map_or_else(|| value.to_string(), str::to_string),
                })?;
            dates.push((field.as_str(), Value::String(normalized)));
        }

        Ok(dates)
    }

    /// Rewrite user and file references in place. Returns how many had no
    /// mapping and were nulled.
    fn remap_references(&self, object: &mut Map<String, Value>) -> u64 {
        let mut unmapped = 0;

        for remap in &self.remaps {
            let Some(value) = object.get_mut(&remap.field) else {
                continue;
            };
            if value.is_null() {
                continue;
            }

            match remap.target.lookup(self.id_maps, value) {
                Some(mapped) => *value = mapped.clone(),
                None => {
                    warn!(
                        collection = %self.collection,
                        field = %remap.field,
                        legacy_id = %value,
                        target = ?remap.target,
                        "No id mapping for reference, writing null"
                    );
                    *value = Value::Null;
                    unmapped += 1;
                }
            }
        }

        unmapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_migrator_shared::LegacyField;
    use serde_json::json;

    fn articles() -> LegacyCollection {
        LegacyCollection {
            collection: "articles".to_string(),
            fields: vec![
                LegacyField::new("id", "integer"),
                LegacyField::new("title", "string"),
                LegacyField::new("published_on", "datetime"),
                LegacyField::new("author", "m2o"),
                LegacyField::new("cover", "file"),
            ],
            ..Default::default()
        }
    }

    fn relations() -> Vec<LegacyRelation> {
        vec![
            LegacyRelation::new("articles", "author", USERS_COLLECTION),
            LegacyRelation::new("articles", "cover", FILES_COLLECTION),
            LegacyRelation::new("comments", "author", USERS_COLLECTION),
        ]
    }

    fn id_maps() -> IdMaps {
        let mut id_maps = IdMaps::default();
        id_maps.users.insert("1".to_string(), json!("3f1c-user-uuid"));
        id_maps.files.insert("7".to_string(), json!("a9e2-file-uuid"));
        id_maps
    }

    #[test]
    fn test_transforms_references_and_dates() {
        let id_maps = id_maps();
        let transformer = RecordTransformer::for_collection(&articles(), &relations(), &id_maps);

        let batch = transformer.transform_batch(vec![json!({
            "id": 1,
            "title": "Hello",
            "published_on": "2020-01-01 10:00:00",
            "author": 1,
            "cover": 7
        })]);

        assert_eq!(
            batch.records,
            vec![json!({
                "id": 1,
                "title": "Hello",
                "published_on": "2020-01-01T10:00:00.000Z",
                "author": "3f1c-user-uuid",
                "cover": "a9e2-file-uuid"
            })]
        );
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.unmapped_references, 0);
    }

    #[test]
    fn test_unmapped_reference_becomes_null() {
        let id_maps = id_maps();
        let transformer = RecordTransformer::for_collection(&articles(), &relations(), &id_maps);

        let batch = transformer.transform_batch(vec![
            json!({ "id": 1, "author": 99, "cover": null, "published_on": null }),
        ]);

        assert_eq!(
            batch.records,
            vec![json!({ "id": 1, "author": null, "cover": null, "published_on": null })]
        );
        assert_eq!(batch.unmapped_references, 1);
    }

    #[test]
    fn test_invalid_date_drops_only_that_record() {
        let id_maps = id_maps();
        let transformer = RecordTransformer::for_collection(&articles(), &relations(), &id_maps);

        let bad = json!({ "id": 2, "published_on": "not-a-date", "author": 1 });
        let batch = transformer.transform_batch(vec![
            json!({ "id": 1, "published_on": "2020-01-01" }),
            bad.clone(),
            json!({ "id": 3 }),
        ]);

        let ids: Vec<&Value> = batch.records.iter().map(|r| &r["id"]).collect();
        assert_eq!(ids, vec![&json!(1), &json!(3)]);
        assert_eq!(
            batch.rejected,
            vec![RejectedRecord {
                record: bad,
                error: ProcessorError::InvalidDate {
                    field: "published_on".to_string(),
                    value: "not-a-date".to_string(),
                },
            }]
        );
    }

    #[test]
    fn test_passthrough_collection() {
        let tags = LegacyCollection {
            collection: "tags".to_string(),
            fields: vec![LegacyField::new("id", "integer"), LegacyField::new("name", "string")],
            ..Default::default()
        };
        let id_maps = IdMaps::default();
        let transformer = RecordTransformer::for_collection(&tags, &relations(), &id_maps);

        let records = vec![json!({ "id": 1, "name": "rust", "extra": [1, 2] }), json!("odd")];
        let batch = transformer.transform_batch(records.clone());

        assert!(transformer.is_passthrough());
        assert_eq!(batch.records, records);
    }

    #[test]
    fn test_non_system_relations_are_ignored() {
        let comments = LegacyCollection {
            collection: "comments".to_string(),
            fields: vec![LegacyField::new("article", "m2o")],
            ..Default::default()
        };
        let id_maps = IdMaps::default();
        let transformer = RecordTransformer::for_collection(
            &comments,
            &[LegacyRelation::new("comments", "article", "articles")],
            &id_maps,
        );

        assert!(transformer.is_passthrough());
    }
}
