use chatweave_types::DraftMessage;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

use crate::traits::{ExportParser, FormatDetector, ParsedExport, ProbeResult};
use crate::{Error, Result};

/// JSON array of messages that may already carry uuids and branch tags
pub struct PlainDetector;

impl FormatDetector for PlainDetector {
    fn id(&self) -> &'static str {
        "plain"
    }

    fn probe(&self, path: &Path, content: &str) -> ProbeResult {
        if !content.trim_start().starts_with('[') {
            return ProbeResult::NoMatch;
        }

        let Ok(Value::Array(items)) = serde_json::from_str::<Value>(content) else {
            return ProbeResult::NoMatch;
        };

        let looks_tagged = items.first().and_then(Value::as_object).is_some_and(|obj| {
            obj.contains_key("sender") && obj.contains_key("content")
        });
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");

        match (looks_tagged, is_json) {
            (true, _) => ProbeResult::match_medium(),
            (false, true) if items.is_empty() => ProbeResult::match_low(),
            _ => ProbeResult::NoMatch,
        }
    }
}

/// Plain message array parser
pub struct PlainParser;

impl ExportParser for PlainParser {
    fn parse(&self, source_id: &str, content: &str) -> Result<ParsedExport> {
        parse_drafts(source_id, content).map(ParsedExport::Tagged)
    }
}

/// Decode a message array; items that are not messages are skipped.
pub fn parse_drafts(source_id: &str, content: &str) -> Result<Vec<DraftMessage>> {
    let Value::Array(items) = serde_json::from_str::<Value>(content)? else {
        return Err(Error::Parse(format!(
            "{}: expected a JSON array of messages",
            source_id
        )));
    };

    let total = items.len();
    let drafts: Vec<DraftMessage> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(draft) => Some(draft),
            Err(err) => {
                warn!(source = source_id, index, %err, "skipping undecodable message");
                None
            }
        })
        .collect();

    if total > 0 && drafts.is_empty() {
        return Err(Error::Parse(format!("{}: no decodable messages", source_id)));
    }

    Ok(drafts)
}
