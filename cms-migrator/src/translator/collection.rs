//! Collection translation.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::errors::TranslationError;
use crate::translator::field::{translate_field, translate_labels};
use crate::translator::options::{entries, is_truthy, status_entry_value};
use cms_migrator_shared::{
    CollectionMeta, LegacyCollection, LegacyField, TranslatedCollection, TranslatedField,
};

/// Archive settings derived from a collection's status field.
struct ArchiveSettings {
    field: String,
    archive_value: Value,
    unarchive_value: Value,
}

/// Translate a legacy collection and all of its fields.
///
/// # Errors
///
/// * [`TranslationError::UnmappedType`] if any field type cannot be resolved
/// * [`TranslationError::MissingArchiveMapping`] if a status field has no
///   soft-delete entry or no unpublished, non-deleted entry
#[instrument(skip(collection), fields(collection = %collection.collection))]
pub fn translate_collection(
    collection: &LegacyCollection,
) -> Result<TranslatedCollection, TranslationError> {
    let fields = collection
        .fields
        .iter()
        .map(|field| translate_field(field).map_err(|e| e.in_collection(&collection.collection)))
        .collect::<Result<Vec<TranslatedField>, _>>()?;

    let sort_field = collection
        .fields
        .iter()
        .find(|field| field.type_lowercase() == "sort")
        .map(|field| field.field.clone());

    let archive = collection
        .status_field()
        .map(archive_settings)
        .transpose()
        .map_err(|e| e.in_collection(&collection.collection))?;

    let (archive_field, archive_value, unarchive_value) = match archive {
        Some(archive) => (
            Some(archive.field),
            Some(archive.archive_value),
            Some(archive.unarchive_value),
        ),
        None => (None, None, None),
    };

    debug!(
        fields = fields.len(),
        sort_field = ?sort_field,
        archive_field = ?archive_field,
        "Translated collection"
    );

    Ok(TranslatedCollection {
        collection: collection.collection.clone(),
        meta: CollectionMeta {
            note: collection.note.clone(),
            hidden: collection.hidden,
            singleton: collection.single,
            icon: collection.icon.clone(),
            translations: translate_labels(collection.translation.as_deref()),
            sort_field,
            archive_field,
            archive_value,
            unarchive_value,
        },
        schema: Map::new(),
        fields,
    })
}

fn archive_settings(field: &LegacyField) -> Result<ArchiveSettings, TranslationError> {
    let mapping = entries(field.option("status_mapping"));
    let flag = |entry: &Value, key: &str| entry.get(key).is_some_and(is_truthy);

    let archive_value = mapping
        .iter()
        .find(|pair| flag(pair.1, "soft_delete"))
        .map(|(key, entry)| status_entry_value(key, entry))
        .ok_or_else(|| missing(field, "soft-delete"))?;

    let unarchive_value = mapping
        .iter()
        .find(|pair| !flag(pair.1, "soft_delete") && !flag(pair.1, "published"))
        .map(|(key, entry)| status_entry_value(key, entry))
        .ok_or_else(|| missing(field, "unpublished"))?;

    Ok(ArchiveSettings {
        field: field.field.clone(),
        archive_value,
        unarchive_value,
    })
}

fn missing(field: &LegacyField, missing: &'static str) -> TranslationError {
    TranslationError::MissingArchiveMapping {
        collection: String::new(),
        field: field.field.clone(),
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_migrator_shared::LegacyTranslation;
    use serde_json::json;

    fn status_field(mapping: Value) -> LegacyField {
        LegacyField {
            field: "status".to_string(),
            field_type: Some("status".to_string()),
            interface: Some("status".to_string()),
            options: Some(json!({ "status_mapping": mapping })),
            ..Default::default()
        }
    }

    fn collection(fields: Vec<LegacyField>) -> LegacyCollection {
        LegacyCollection {
            collection: "articles".to_string(),
            note: Some("Blog posts".to_string()),
            icon: Some("article".to_string()),
            fields,
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_field_detection() {
        let translated = translate_collection(&collection(vec![
            LegacyField::new("id", "integer"),
            LegacyField::new("position", "SORT"),
            LegacyField::new("order", "sort"),
        ]))
        .unwrap();

        assert_eq!(translated.meta.sort_field.as_deref(), Some("position"));
        assert_eq!(translated.fields.len(), 3);
        assert!(translated.meta.archive_field.is_none());
    }

    #[test]
    fn test_archive_settings_from_status_mapping() {
        let translated = translate_collection(&collection(vec![
            LegacyField::new("id", "integer"),
            status_field(json!({
                "published": { "name": "Published", "value": "published", "published": true },
                "draft": { "name": "Draft", "value": "draft", "published": false },
                "deleted": { "name": "Deleted", "value": "deleted", "soft_delete": true }
            })),
        ]))
        .unwrap();

        assert_eq!(translated.meta.archive_field.as_deref(), Some("status"));
        assert_eq!(translated.meta.archive_value, Some(json!("deleted")));
        assert_eq!(translated.meta.unarchive_value, Some(json!("draft")));
    }

    #[test]
    fn test_missing_soft_delete_entry() {
        let result = translate_collection(&collection(vec![status_field(json!({
            "published": { "value": "published", "published": true },
            "draft": { "value": "draft", "published": false }
        }))]));

        assert_eq!(
            result,
            Err(TranslationError::MissingArchiveMapping {
                collection: "articles".to_string(),
                field: "status".to_string(),
                missing: "soft-delete",
            })
        );
    }

    #[test]
    fn test_missing_unpublished_entry() {
        let result = translate_collection(&collection(vec![status_field(json!({
            "published": { "value": "published", "published": true },
            "deleted": { "value": "deleted", "soft_delete": true }
        }))]));

        assert_eq!(
            result,
            Err(TranslationError::MissingArchiveMapping {
                collection: "articles".to_string(),
                field: "status".to_string(),
                missing: "unpublished",
            })
        );
    }

    #[test]
    fn test_unmapped_type_names_collection() {
        let result = translate_collection(&collection(vec![LegacyField::new("area", "polygon")]));

        assert!(matches!(
            result,
            Err(TranslationError::UnmappedType { ref collection, .. }) if collection == "articles"
        ));
    }

    #[test]
    fn test_collection_meta() {
        let mut source = collection(vec![LegacyField::new("id", "integer")]);
        source.single = true;
        source.hidden = true;
        source.translation = Some(vec![LegacyTranslation {
            locale: "fr-FR".to_string(),
            translation: "Articles".to_string(),
        }]);

        let translated = translate_collection(&source).unwrap();
        let json = serde_json::to_value(&translated).unwrap();

        assert_eq!(json["collection"], "articles");
        assert_eq!(json["meta"]["singleton"], true);
        assert_eq!(json["meta"]["hidden"], true);
        assert_eq!(json["meta"]["note"], "Blog posts");
        assert_eq!(
            json["meta"]["translations"],
            json!([{ "language": "fr-FR", "translation": "Articles" }])
        );
        assert_eq!(json["schema"], json!({}));
    }
}
