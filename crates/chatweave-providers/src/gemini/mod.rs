pub mod parser;
pub(crate) mod schema;

use crate::traits::{FormatDetector, ProbeResult};
use serde_json::Value;
use std::path::Path;

pub use self::parser::GeminiParser;

/// Multi-version (turns with numbered human/assistant versions) JSON export
pub struct GeminiDetector;

impl FormatDetector for GeminiDetector {
    fn id(&self) -> &'static str {
        "gemini"
    }

    fn probe(&self, path: &Path, content: &str) -> ProbeResult {
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let head = content.trim_start();
        if !head.starts_with('{') {
            return ProbeResult::NoMatch;
        }

        match serde_json::from_str::<Value>(head) {
            Ok(Value::Object(obj)) if obj.get("turns").is_some_and(Value::is_array) => {
                if is_json {
                    ProbeResult::match_high()
                } else {
                    ProbeResult::match_medium()
                }
            }
            _ => ProbeResult::NoMatch,
        }
    }
}
