use chatweave_types::RawMessageEntry;
use serde_json::{Map, Value};

use crate::util::{normalize_timestamp, text_of};

/// Keys only the chat header line carries
const HEADER_KEYS: &[&str] = &["user_name", "character_name", "chat_metadata", "create_date"];

/// One line of a JSONL chat export
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ChatLine {
    /// Leading metadata record (names, creation date, chat settings)
    Header,
    Message(RawMessageEntry),
}

/// Classify a decoded line. Non-object lines yield None.
pub(crate) fn classify_line(value: &Value) -> Option<ChatLine> {
    let obj = value.as_object()?;
    if !obj.contains_key("mes") && HEADER_KEYS.iter().any(|k| obj.contains_key(*k)) {
        return Some(ChatLine::Header);
    }
    Some(ChatLine::Message(entry_from_object(obj)))
}

/// Build an entry from a message object, degrading odd fields
fn entry_from_object(obj: &Map<String, Value>) -> RawMessageEntry {
    let variants = match obj.get("swipes") {
        Some(Value::Array(items)) => items.iter().map(text_of).collect(),
        _ => Vec::new(),
    };

    RawMessageEntry {
        name: obj
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        is_user: flag(obj, "is_user"),
        is_system: flag(obj, "is_system"),
        content: obj.get("mes").map(text_of),
        timestamp: obj.get("send_date").and_then(normalize_timestamp),
        variants,
        selected_variant: obj
            .get("swipe_id")
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize,
    }
}

/// Boolean field that some exporters write as 0/1 or "true"
fn flag(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
