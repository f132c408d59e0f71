use serde::{Deserialize, Serialize};

/// One message record as it appears in an export file.
///
/// Entries are immutable input: the engine reads them but never rewrites them.
/// Platform adapters are responsible for mapping their vendor shape onto these
/// fields and for degrading malformed values (missing content, odd variant
/// lists) into something usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawMessageEntry {
    /// Display name of the speaker ("User", a character name, a model name)
    pub name: String,

    /// True when the human side authored this entry
    pub is_user: bool,

    /// Non-conversational marker (system notices, narrator lines)
    #[serde(default)]
    pub is_system: bool,

    /// Message text; `None` when the export omitted it
    #[serde(default)]
    pub content: Option<String>,

    /// Export timestamp as written by the exporting client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Alternate replies stored for this slot ("swipes", regenerations)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<String>,

    /// Index into `variants` of the reply currently shown
    #[serde(default)]
    pub selected_variant: usize,
}

impl RawMessageEntry {
    pub fn new(name: impl Into<String>, is_user: bool, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_user,
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Content text, or an empty string for entries that carried none
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// True when the entry should be expanded into sibling variant messages
    pub fn has_variants(&self) -> bool {
        self.variants.len() > 1
    }

    /// Selected variant index, clamped to a valid position
    pub fn selected_index(&self) -> usize {
        if self.selected_variant < self.variants.len() {
            self.selected_variant
        } else {
            0
        }
    }

    pub fn role(&self) -> Role {
        if self.is_user {
            Role::Human
        } else {
            Role::Assistant
        }
    }
}

/// Which side of the conversation authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "user")]
    Human,
    #[serde(alias = "model", alias = "ai")]
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Human => "human",
            Role::Assistant => "assistant",
        }
    }

    /// Label used when an export gives no display name
    pub fn default_label(&self) -> &'static str {
        match self {
            Role::Human => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One export file's worth of entries, in file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Caller-chosen identifier, usually the file name
    pub source_id: String,
    pub entries: Vec<RawMessageEntry>,
}

impl SourceFile {
    pub fn new(source_id: impl Into<String>, entries: Vec<RawMessageEntry>) -> Self {
        Self {
            source_id: source_id.into(),
            entries,
        }
    }
}
