//! Datetime normalization.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Naive layouts the legacy API has been seen to emit. `%.f` makes the
/// fractional part optional.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a legacy datetime string. Values without an offset are UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Normalize a datetime value to ISO-8601 UTC with millisecond precision.
///
/// Strings are parsed with [`parse_datetime`]; integers are epoch
/// milliseconds. Returns `None` for anything else.
pub fn normalize_datetime(value: &Value) -> Option<String> {
    let parsed = match value {
        Value::String(raw) => parse_datetime(raw),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }?;

    Some(parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
}
