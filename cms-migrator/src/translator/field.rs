//! Field translation.
//!
//! Converts one legacy field definition into the target representation.

use serde_json::Value;
use tracing::error;

use crate::errors::TranslationError;
use crate::translator::options::translate_options;
use crate::translator::tables;
use cms_migrator_shared::{
    FieldMeta, FieldSchema, LegacyField, LegacyTranslation, TranslatedField, Translation,
};

/// Field name fragment of the reverse relation to the files collection.
const FILES_RELATION_FIELD: &str = "directus_files_id";

/// Translate a single legacy field.
///
/// Deterministic: the same input always yields the same output.
///
/// # Errors
///
/// [`TranslationError::UnmappedType`] when the field's type cannot be
/// resolved. The error carries an empty collection name; the collection
/// translator fills it in.
pub fn translate_field(field: &LegacyField) -> Result<TranslatedField, TranslationError> {
    let legacy_type = field.type_lowercase();
    let mapped_type = tables::target_type(&legacy_type);
    let field_type = resolve_type(field, mapped_type)?;

    let is_virtual =
        tables::is_virtual_type(&field_type) || mapped_type.is_some_and(tables::is_virtual_type);

    let meta = FieldMeta {
        note: field.note.clone(),
        interface: field
            .interface
            .as_deref()
            .and_then(|i| tables::target_interface(&i.to_lowercase()))
            .map(str::to_string),
        translations: translate_labels(field.translation.as_deref()),
        readonly: field.readonly,
        hidden: field.hidden_detail,
        width: field.width.clone(),
        special: special_tags(field, &legacy_type),
        sort: field.sort,
        options: translate_options(field),
    };

    let schema = if is_virtual {
        None
    } else {
        let length = LengthSpec::parse(field.length.as_ref());
        Some(FieldSchema {
            has_auto_increment: field.auto_increment,
            default_value: default_value(field, mapped_type),
            is_primary_key: field.primary_key,
            is_nullable: !field.required,
            max_length: length.max_length,
            numeric_precision: length.precision,
            numeric_scale: length.scale,
        })
    };

    Ok(TranslatedField {
        field: field.field.clone(),
        field_type,
        meta,
        schema,
    })
}

/// Resolve the target type, in order of precedence: textual datatype,
/// many-to-many interface, files relation field, type map.
fn resolve_type(
    field: &LegacyField,
    mapped_type: Option<&'static str>,
) -> Result<String, TranslationError> {
    let datatype = field.datatype.as_deref().map(str::to_lowercase);
    if matches!(datatype.as_deref(), Some("text" | "longtext")) {
        return Ok("text".to_string());
    }
    if field.interface_is("many-to-many") {
        return Ok("m2m".to_string());
    }
    if field.field.contains(FILES_RELATION_FIELD) {
        return Ok("uuid".to_string());
    }

    mapped_type
        .map(str::to_string)
        .ok_or_else(|| TranslationError::UnmappedType {
            collection: String::new(),
            field: field.field.clone(),
            field_type: field.field_type.clone().unwrap_or_default(),
        })
}

fn special_tags(field: &LegacyField, legacy_type: &str) -> Option<Vec<String>> {
    let key = if field.interface_is("many-to-many") {
        "m2m"
    } else {
        legacy_type
    };

    tables::special_tags(key).map(|tags| tags.iter().map(|t| t.to_string()).collect())
}

/// Raw default value, except for JSON fields whose default does not parse:
/// those get the serialized field definition so the original is not lost.
fn default_value(field: &LegacyField, mapped_type: Option<&str>) -> Value {
    let Some(parse_error) = json_default_error(field, mapped_type) else {
        return field.default_value.clone();
    };

    error!(
        field = %field.field,
        default_value = %field.default_value,
        error = %parse_error,
        "Invalid JSON default value, substituting field definition"
    );
    Value::String(serde_json::to_string(field).unwrap_or_else(|_| field.field.clone()))
}

fn json_default_error(field: &LegacyField, mapped_type: Option<&str>) -> Option<String> {
    if mapped_type != Some("json") {
        return None;
    }
    let Value::String(raw) = &field.default_value else {
        return None;
    };
    serde_json::from_str::<Value>(raw).err().map(|e| e.to_string())
}

/// Parse error of a JSON field's string default, if it does not parse.
///
/// [`translate_field`] replaces such defaults with the serialized field
/// definition; callers use this to record the substitution.
pub fn invalid_json_default(field: &LegacyField) -> Option<String> {
    json_default_error(field, tables::target_type(&field.type_lowercase()))
}

pub(crate) fn translate_labels(labels: Option<&[LegacyTranslation]>) -> Option<Vec<Translation>> {
    labels.map(|labels| {
        labels
            .iter()
            .map(|label| Translation {
                language: label.locale.clone(),
                translation: label.translation.clone(),
            })
            .collect()
    })
}

/// Column size information carried by the legacy `length` attribute.
#[derive(Debug, Default, PartialEq, Eq)]
struct LengthSpec {
    max_length: Option<u64>,
    precision: Option<u32>,
    scale: Option<u32>,
}

impl LengthSpec {
    /// `255` or `"255"` is a maximum length; `"10,2"` is precision and scale.
    /// Anything else yields nothing.
    fn parse(length: Option<&Value>) -> Self {
        match length {
            Some(Value::Number(n)) => Self {
                max_length: n.as_u64(),
                ..Default::default()
            },
            Some(Value::String(s)) => match s.split_once(',') {
                Some((precision, scale)) => {
                    match (precision.trim().parse::<u32>(), scale.trim().parse::<u32>()) {
                        (Ok(precision), Ok(scale)) => Self {
                            precision: Some(precision),
                            scale: Some(scale),
                            ..Default::default()
                        },
                        _ => Self::default(),
                    }
                }
                None => Self {
                    max_length: s.trim().parse().ok(),
                    ..Default::default()
                },
            },
            _ => Self::default(),
        }
    }
}
