use chatweave_types::RawMessageEntry;
use tracing::warn;

use super::schema::{ChatLine, classify_line};
use crate::traits::{ExportParser, ParsedExport};
use crate::{Error, Result};

/// Parse a JSONL chat export into ordered entries.
///
/// Undecodable lines are skipped with a warning. The file only fails when it
/// has content but not a single decodable line.
pub fn parse_chat_jsonl(source_id: &str, content: &str) -> Result<Vec<RawMessageEntry>> {
    let mut entries = Vec::new();
    let mut decoded = 0;
    let mut non_empty = 0;

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        non_empty += 1;

        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(err) => {
                warn!(source = source_id, line = line_no + 1, %err, "skipping malformed line");
                continue;
            }
        };
        decoded += 1;

        match classify_line(&value) {
            Some(ChatLine::Message(entry)) => entries.push(entry),
            Some(ChatLine::Header) => {}
            None => warn!(source = source_id, line = line_no + 1, "skipping non-object line"),
        }
    }

    if non_empty > 0 && decoded == 0 {
        return Err(Error::Parse(format!(
            "{}: no decodable JSON lines",
            source_id
        )));
    }

    Ok(entries)
}

/// SillyTavern chat parser implementation
pub struct SillyTavernParser;

impl ExportParser for SillyTavernParser {
    fn parse(&self, source_id: &str, content: &str) -> Result<ParsedExport> {
        parse_chat_jsonl(source_id, content).map(ParsedExport::Entries)
    }
}
