//! Interface options translation.
//!
//! Each legacy interface that carries options has one translator in
//! [`OPTION_TRANSLATORS`]. Interfaces without an entry produce no options.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use cms_migrator_shared::LegacyField;

type OptionsTranslator = fn(&LegacyField) -> Value;

const OPTION_TRANSLATORS: &[(&str, OptionsTranslator)] = &[
    ("divider", divider),
    ("status", status),
    ("dropdown", dropdown),
    ("checkboxes", checkboxes),
    ("repeater", repeater),
    ("input-rich-text-html", rich_text),
    ("many-to-one", many_to_one),
    ("many-to-many", many_to_many),
];

/// Translate the options of a field for its interface.
///
/// Returns `None` when the interface has no options translator.
pub fn translate_options(field: &LegacyField) -> Option<Value> {
    let interface = field.interface.as_deref()?;
    let translator = OPTION_TRANSLATORS
        .iter()
        .find(|(name, _)| *name == interface)
        .map(|(_, translator)| *translator);

    match translator {
        Some(translate) => Some(translate(field)),
        None => {
            debug!(field = %field.field, interface = %interface, "No options translator");
            None
        }
    }
}

/// JavaScript-style truthiness, which is how the legacy API encodes flags.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn option_or_null(field: &LegacyField, key: &str) -> Value {
    field.option(key).cloned().unwrap_or(Value::Null)
}

fn insert_present(map: &mut Map<String, Value>, key: &str, value: Option<&Value>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.clone());
    }
}

/// Entries of an object as `(key, value)`, or of an array as `(index, value)`.
pub(crate) fn entries(value: Option<&Value>) -> Vec<(String, &Value)> {
    match value {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

/// Value and label of one status mapping entry, defaulting to its key.
pub(crate) fn status_entry_value(key: &str, entry: &Value) -> Value {
    entry
        .get("value")
        .cloned()
        .unwrap_or_else(|| Value::String(key.to_string()))
}

fn divider(field: &LegacyField) -> Value {
    json!({
        "title": option_or_null(field, "title"),
        "marginTop": option_or_null(field, "margin"),
    })
}

fn status(field: &LegacyField) -> Value {
    let choices: Vec<Value> = entries(field.option("status_mapping"))
        .into_iter()
        .map(|(key, entry)| {
            json!({
                "text": entry.get("name").cloned().unwrap_or_else(|| Value::String(key.clone())),
                "value": status_entry_value(&key, entry),
            })
        })
        .collect();

    json!({ "choices": choices })
}

/// `{ value: label }` choices as `[{ text, value }]`.
///
/// Some legacy instances store the choices object as a JSON string, and
/// plain lists of values also occur.
fn choices(field: &LegacyField) -> Vec<Value> {
    let parsed;
    let raw = match field.option("choices") {
        Some(Value::String(s)) => {
            parsed = serde_json::from_str::<Value>(s).ok();
            parsed.as_ref()
        }
        other => other,
    };

    match raw {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(value, text)| json!({ "text": text, "value": value }))
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| json!({ "text": item, "value": item }))
            .collect(),
        _ => Vec::new(),
    }
}

fn dropdown(field: &LegacyField) -> Value {
    let mut options = Map::new();
    options.insert("choices".to_string(), Value::Array(choices(field)));
    insert_present(&mut options, "placeholder", field.option("placeholder"));
    Value::Object(options)
}

fn checkboxes(field: &LegacyField) -> Value {
    let mut options = Map::new();
    options.insert("choices".to_string(), Value::Array(choices(field)));
    insert_present(&mut options, "allowOther", field.option("allow_other"));
    Value::Object(options)
}

fn repeater(field: &LegacyField) -> Value {
    let fields: Vec<Value> = match field.option("fields") {
        Some(Value::Array(items)) => items.iter().map(repeater_sub_field).collect(),
        _ => Vec::new(),
    };

    json!({ "fields": fields })
}

fn repeater_sub_field(raw: &Value) -> Value {
    let sub_field: LegacyField = match serde_json::from_value(raw.clone()) {
        Ok(sub_field) => sub_field,
        Err(e) => {
            warn!(sub_field = %raw, error = %e, "Unreadable repeater sub-field, emitting it empty");
            LegacyField::default()
        }
    };
    let field_type = sub_field
        .field_type
        .clone()
        .map(Value::String)
        .unwrap_or(Value::Null);

    let mut meta = Map::new();
    meta.insert("name".to_string(), json!(sub_field.field));
    meta.insert("type".to_string(), field_type.clone());
    meta.insert("field".to_string(), json!(sub_field.field));
    insert_present(&mut meta, "width", raw.get("width"));
    insert_present(&mut meta, "interface", raw.get("interface"));
    if let Some(options) = translate_options(&sub_field) {
        meta.insert("options".to_string(), options);
    }

    json!({
        "name": sub_field.field,
        "type": field_type,
        "field": sub_field.field,
        "meta": meta,
    })
}

fn rich_text(field: &LegacyField) -> Value {
    field.options.clone().unwrap_or(Value::Null)
}

fn many_to_one(field: &LegacyField) -> Value {
    let mut options = Map::new();
    if let Some(template) = field.option("template").filter(|t| is_truthy(t)) {
        options.insert("template".to_string(), template.clone());
    }
    Value::Object(options)
}

fn many_to_many(field: &LegacyField) -> Value {
    let mut options = Map::new();

    if let Some(template) = field
        .option("template")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
    {
        let inner = template.replacen("{{", "", 1).replacen("}}", "", 1);
        options.insert(
            "template".to_string(),
            Value::String(format!("{{{{{}_id.{}}}}}", field.field, inner.trim())),
        );
    }
    if let Some(allow_create) = field.option("allow_create").filter(|v| is_truthy(v)) {
        options.insert("enableCreate".to_string(), allow_create.clone());
    }
    if let Some(allow_select) = field.option("allow_select").filter(|v| is_truthy(v)) {
        options.insert("enableSelect".to_string(), allow_select.clone());
    }

    Value::Object(options)
}
