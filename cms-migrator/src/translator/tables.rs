//! Static lookup tables from legacy names to target names.

/// Legacy field type to target field type.
const TYPE_MAP: &[(&str, &str)] = &[
    ("alias", "alias"),
    ("array", "csv"),
    ("bigint", "bigInteger"),
    ("boolean", "boolean"),
    ("csv", "csv"),
    ("date", "date"),
    ("datetime", "dateTime"),
    ("datetime_created", "timestamp"),
    ("datetime_updated", "timestamp"),
    ("decimal", "decimal"),
    ("file", "uuid"),
    ("files", "alias"),
    ("float", "float"),
    ("group", "alias"),
    ("hash", "hash"),
    ("integer", "integer"),
    ("json", "json"),
    ("lang", "string"),
    ("m2o", "integer"),
    ("o2m", "alias"),
    ("owner", "uuid"),
    ("primary_key", "integer"),
    ("slug", "string"),
    ("sort", "integer"),
    ("status", "string"),
    ("string", "string"),
    ("text", "text"),
    ("time", "time"),
    ("translation", "alias"),
    ("user_created", "uuid"),
    ("user_updated", "uuid"),
    ("uuid", "uuid"),
];

/// Legacy interface name to target interface name.
const INTERFACE_MAP: &[(&str, &str)] = &[
    ("calendar", "datetime"),
    ("checkbox", "boolean"),
    ("checkboxes", "select-multiple-checkbox"),
    ("code", "input-code"),
    ("color", "select-color"),
    ("color-palette", "select-color"),
    ("date", "datetime"),
    ("datetime", "datetime"),
    ("datetime-created", "datetime"),
    ("datetime-updated", "datetime"),
    ("divider", "presentation-divider"),
    ("dropdown", "select-dropdown"),
    ("file", "file"),
    ("files", "files"),
    ("hashed", "input-hash"),
    ("icon", "select-icon"),
    ("input-rich-text-html", "input-rich-text-html"),
    ("json", "input-code"),
    ("language", "select-dropdown"),
    ("many-to-many", "list-m2m"),
    ("many-to-one", "select-dropdown-m2o"),
    ("markdown", "input-markdown"),
    ("multiselect", "select-multiple-dropdown"),
    ("numeric", "input"),
    ("one-to-many", "list-o2m"),
    ("owner", "select-dropdown-m2o"),
    ("password", "input-hash"),
    ("primary-key", "input"),
    ("radio-buttons", "select-radio"),
    ("repeater", "list"),
    ("slider", "slider"),
    ("slug", "input"),
    ("sort", "input"),
    ("status", "select-dropdown"),
    ("tags", "tags"),
    ("text-input", "input"),
    ("textarea", "input-multiline"),
    ("time", "datetime"),
    ("toggle", "boolean"),
    ("translation", "translations"),
    ("user-created", "select-dropdown-m2o"),
    ("user-updated", "select-dropdown-m2o"),
    ("wysiwyg", "input-rich-text-html"),
];

/// Legacy type (or `m2m` for the many-to-many interface) to special tags.
const SPECIAL_TAGS: &[(&str, &[&str])] = &[
    ("alias", &["alias", "no-data"]),
    ("boolean", &["boolean"]),
    ("hash", &["hash"]),
    ("json", &["json"]),
    ("uuid", &["uuid"]),
    ("owner", &["user-created"]),
    ("user_updated", &["user-updated"]),
    ("datetime_created", &["date-created"]),
    ("datetime_updated", &["date-updated"]),
    ("csv", &["csv"]),
    ("o2m", &["o2m"]),
    ("m2m", &["m2m"]),
    ("m2o", &["m2o"]),
];

/// Target types that describe a virtual field with no underlying column.
const VIRTUAL_TYPES: &[&str] = &["alias", "o2m"];

fn lookup<'a, T: Copy>(table: &'a [(&'a str, T)], key: &str) -> Option<T> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| *value)
}

/// Target type for a lower-cased legacy type.
pub fn target_type(legacy_type: &str) -> Option<&'static str> {
    lookup(TYPE_MAP, legacy_type)
}

/// Target interface for a lower-cased legacy interface.
pub fn target_interface(legacy_interface: &str) -> Option<&'static str> {
    lookup(INTERFACE_MAP, legacy_interface)
}

pub fn special_tags(key: &str) -> Option<&'static [&'static str]> {
    lookup(SPECIAL_TAGS, key)
}

pub fn is_virtual_type(field_type: &str) -> bool {
    VIRTUAL_TYPES.contains(&field_type)
}
