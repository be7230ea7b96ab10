//! Response envelope types shared by the v8 and v9 REST APIs.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The `{ data, meta }` wrapper every API response uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
}

/// Response metadata requested with `meta=total_count`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMeta {
    /// Some v8 deployments report counts as strings.
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_count: Option<u64>,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
