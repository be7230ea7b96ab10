//! Legacy (v8) schema types.
//!
//! These mirror the payloads returned by the v8 `/collections` and
//! `/relations` endpoints. They are read-only input to the translator.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Prefix shared by every built-in system collection.
pub const SYSTEM_COLLECTION_PREFIX: &str = "directus_";

/// A localized label attached to a collection or field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyTranslation {
    pub locale: String,
    pub translation: String,
}

/// A collection definition as stored by the legacy instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyCollection {
    pub collection: String,
    /// Singleton collections hold exactly one record.
    #[serde(default, deserialize_with = "bool_or_null")]
    pub single: bool,
    #[serde(default, deserialize_with = "bool_or_null")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Fields in source order. The v8 API returns them keyed by name.
    #[serde(default, deserialize_with = "fields_in_order")]
    pub fields: Vec<LegacyField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Vec<LegacyTranslation>>,
}

impl LegacyCollection {
    /// Whether this is one of the built-in system collections.
    pub fn is_system(&self) -> bool {
        self.collection.starts_with(SYSTEM_COLLECTION_PREFIX)
    }

    /// Whether any field uses the `many-to-one` interface.
    pub fn has_many_to_one_field(&self) -> bool {
        self.fields
            .iter()
            .any(|field| field.interface_is("many-to-one"))
    }

    /// The first field using the `status` interface, if any.
    pub fn status_field(&self) -> Option<&LegacyField> {
        self.fields.iter().find(|field| field.interface_is("status"))
    }

    /// Fields whose raw type is exactly `datetime`.
    pub fn datetime_fields(&self) -> impl Iterator<Item = &LegacyField> {
        self.fields
            .iter()
            .filter(|field| field.field_type.as_deref() == Some("datetime"))
    }
}

/// A single field definition as stored by the legacy instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyField {
    #[serde(default)]
    pub field: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    /// Interface specific options. Shape depends on `interface`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(default, deserialize_with = "bool_or_null")]
    pub readonly: bool,
    #[serde(default, deserialize_with = "bool_or_null")]
    pub required: bool,
    #[serde(default, deserialize_with = "bool_or_null")]
    pub primary_key: bool,
    #[serde(default, deserialize_with = "bool_or_null")]
    pub auto_increment: bool,
    /// Either a plain length (`255`, `"255"`) or `"precision,scale"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Value>,
    #[serde(default)]
    pub default_value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "bool_or_null")]
    pub hidden_detail: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Vec<LegacyTranslation>>,
}

impl LegacyField {
    /// Create a field with only a name and a raw type.
    pub fn new(field: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            field_type: Some(field_type.into()),
            ..Default::default()
        }
    }

    /// Lower-cased raw type, empty when the source left it unset.
    pub fn type_lowercase(&self) -> String {
        self.field_type
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
    }

    pub fn interface_is(&self, interface: &str) -> bool {
        self.interface.as_deref() == Some(interface)
    }

    /// Look up a key in the options object.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|options| options.get(key))
    }
}

/// A relation between two collections.
///
/// Only the subset needed to detect references to system entities is kept.
/// Accepts both the flat v8 shape (`collection_many`, `field_many`,
/// `collection_one`) and the v9 shape nested under `meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RelationRepr")]
pub struct LegacyRelation {
    pub many_collection: String,
    pub many_field: String,
    pub one_collection: Option<String>,
}

impl LegacyRelation {
    pub fn new(
        many_collection: impl Into<String>,
        many_field: impl Into<String>,
        one_collection: impl Into<String>,
    ) -> Self {
        Self {
            many_collection: many_collection.into(),
            many_field: many_field.into(),
            one_collection: Some(one_collection.into()),
        }
    }

    /// Whether the referenced side is a built-in system collection.
    pub fn is_system(&self) -> bool {
        self.one_collection
            .as_deref()
            .is_some_and(|one| one.starts_with(SYSTEM_COLLECTION_PREFIX))
    }
}

#[derive(Deserialize)]
struct RelationFields {
    #[serde(alias = "collection_many")]
    many_collection: String,
    #[serde(alias = "field_many")]
    many_field: String,
    #[serde(default, alias = "collection_one")]
    one_collection: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelationRepr {
    Nested { meta: RelationFields },
    Flat(RelationFields),
}

impl From<RelationRepr> for LegacyRelation {
    fn from(repr: RelationRepr) -> Self {
        let fields = match repr {
            RelationRepr::Nested { meta } => meta,
            RelationRepr::Flat(fields) => fields,
        };
        Self {
            many_collection: fields.many_collection,
            many_field: fields.many_field,
            one_collection: fields.one_collection,
        }
    }
}

fn bool_or_null<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldList {
    Keyed(Map<String, Value>),
    Listed(Vec<LegacyField>),
}

fn fields_in_order<'de, D>(deserializer: D) -> Result<Vec<LegacyField>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FieldList>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(FieldList::Listed(fields)) => Ok(fields),
        Some(FieldList::Keyed(map)) => map
            .into_iter()
            .map(|(name, value)| {
                let mut field: LegacyField =
                    serde_json::from_value(value).map_err(D::Error::custom)?;
                if field.field.is_empty() {
                    field.field = name;
                }
                Ok(field)
            })
            .collect(),
    }
}
