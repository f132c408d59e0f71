use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Epoch values below this are read as seconds, above as milliseconds
const SECONDS_CUTOFF: u64 = 100_000_000_000;

/// Turn an exported timestamp into display text.
///
/// Strings pass through untouched (exporters use many layouts and the value
/// never takes part in message identity). Numbers are read as a Unix epoch in
/// seconds or milliseconds and rendered as RFC 3339.
pub fn normalize_timestamp(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(from_epoch)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        _ => None,
    }
}

fn from_epoch(raw: i64) -> Option<DateTime<Utc>> {
    if raw.unsigned_abs() < SECONDS_CUTOFF {
        DateTime::from_timestamp(raw, 0)
    } else {
        DateTime::from_timestamp_millis(raw)
    }
}

/// Text of a loosely typed value: strings as-is, objects through their usual
/// text keys, anything else empty
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => ["mes", "text", "content"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}
