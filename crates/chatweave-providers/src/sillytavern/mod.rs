pub mod parser;
pub(crate) mod schema;

use crate::traits::{FormatDetector, ProbeResult};
use std::path::Path;

pub use self::parser::{SillyTavernParser, parse_chat_jsonl};

/// SillyTavern-style JSONL chat export
pub struct SillyTavernDetector;

impl FormatDetector for SillyTavernDetector {
    fn id(&self) -> &'static str {
        "sillytavern"
    }

    fn probe(&self, path: &Path, content: &str) -> ProbeResult {
        let is_jsonl = path.extension().and_then(|e| e.to_str()) == Some("jsonl");

        let first = content.lines().map(str::trim).find(|l| !l.is_empty());
        let recognized = first
            .and_then(|line| serde_json::from_str::<serde_json::Value>(line).ok())
            .and_then(|value| schema::classify_line(&value))
            .is_some_and(|line| match line {
                schema::ChatLine::Header => true,
                schema::ChatLine::Message(_) => first.is_some_and(|l| l.contains("\"mes\"")),
            });

        match (is_jsonl, recognized) {
            (true, true) => ProbeResult::match_high(),
            (false, true) => ProbeResult::match_medium(),
            (true, false) => ProbeResult::match_low(),
            (false, false) => ProbeResult::NoMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_jsonl_with_header() {
        let content = r#"{"user_name":"You","character_name":"Aria"}"#;
        let result = SillyTavernDetector.probe(Path::new("chat.jsonl"), content);
        assert_eq!(result, ProbeResult::match_high());
    }

    #[test]
    fn test_probe_message_line_without_extension() {
        let content = r#"{"name":"Aria","is_user":false,"mes":"hi"}"#;
        let result = SillyTavernDetector.probe(Path::new("export.txt"), content);
        assert_eq!(result, ProbeResult::match_medium());
    }

    #[test]
    fn test_probe_rejects_json_document() {
        let content = r#"{"turns":[]}"#;
        let result = SillyTavernDetector.probe(Path::new("export.json"), content);
        assert_eq!(result, ProbeResult::NoMatch);
    }
}
