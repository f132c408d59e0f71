use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Multi-version conversation export
///
/// Every turn pairs the human side with the assistant side; each side keeps
/// all numbered versions (edits of the prompt, regenerations of the reply).
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiExport {
    #[serde(default, alias = "id")]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub turns: Vec<GeminiTurn>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub(crate) struct GeminiTurn {
    #[serde(default, alias = "user", alias = "prompts")]
    pub human: Vec<GeminiVersion>,
    #[serde(default, alias = "model", alias = "responses")]
    pub assistant: Vec<GeminiVersion>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiVersion {
    /// Version number; falls back to the position in the list
    #[serde(default)]
    pub version: Option<u32>,

    /// "normal", "edit" or "retry"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default, alias = "content")]
    pub text: Option<String>,

    #[serde(default)]
    pub timestamp: Option<Value>,

    /// Display name (model name on the assistant side)
    #[serde(default, alias = "model")]
    pub author: Option<String>,

    /// Human version this reply answers (assistant side only)
    #[serde(default)]
    pub answers_version: Option<u32>,
}
