//! Translated (v9) schema types.
//!
//! These are the payloads posted to the target `/collections` endpoint.
//! Optional members that the target treats as "not provided" are omitted
//! from the serialized JSON rather than written as `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A localized label in the target representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub language: String,
    pub translation: String,
}

/// A collection definition ready to be created on the target instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedCollection {
    pub collection: String,
    pub meta: CollectionMeta,
    /// Always empty; the target derives the table from `fields`.
    #[serde(default)]
    pub schema: Map<String, Value>,
    pub fields: Vec<TranslatedField>,
}

/// Collection level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub note: Option<String>,
    pub hidden: bool,
    pub singleton: bool,
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<Translation>>,
    pub sort_field: Option<String>,
    /// Present iff the source collection had a `status` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unarchive_value: Option<Value>,
}

/// A field definition in the target representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedField {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub meta: FieldMeta,
    /// Absent for virtual fields (aliases, one-to-many) that have no column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<FieldSchema>,
}

/// Presentation metadata of a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<Translation>>,
    pub readonly: bool,
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

/// Column definition of a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub has_auto_increment: bool,
    pub default_value: Value,
    pub is_primary_key: bool,
    pub is_nullable: bool,
    pub max_length: Option<u64>,
    pub numeric_precision: Option<u32>,
    pub numeric_scale: Option<u32>,
}
