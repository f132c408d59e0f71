use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BranchId, Role, SourceFile};

/// Parent id shared by every first-turn human version of a multi-version export.
///
/// Lets a timeline detect branching on the very first prompt even though those
/// messages have no real predecessor.
pub const ROOT_SENTINEL: Uuid = Uuid::nil();

/// What a platform adapter hands to the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterOutput {
    /// Plain ordered sequences, one per file; reconciled through the graph
    Graph(Vec<SourceFile>),

    /// Messages that already carry (some) branch tags
    Tagged(Vec<DraftMessage>),

    /// Turn/version records from a self-describing export; branch tags are
    /// derived from the version numbers
    Versioned(Vec<VersionedMessage>),
}

impl AdapterOutput {
    pub fn kind(&self) -> &'static str {
        match self {
            AdapterOutput::Graph(_) => "graph",
            AdapterOutput::Tagged(_) => "tagged",
            AdapterOutput::Versioned(_) => "versioned",
        }
    }
}

/// A message from an adapter that tags branches itself; any field may be absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftMessage {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub parent_uuid: Option<Uuid>,
    pub sender: Role,
    #[serde(default)]
    pub sender_label: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    #[serde(default)]
    pub branch_level: Option<u32>,
}

/// How a version came to exist in a multi-version export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VersionKind {
    #[default]
    Normal,
    Edit,
    Retry,
}

impl VersionKind {
    /// Unknown labels degrade to `Normal`
    pub fn parse(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "edit" | "edited" => VersionKind::Edit,
            "retry" | "regenerate" | "regenerated" => VersionKind::Retry,
            _ => VersionKind::Normal,
        }
    }
}

/// Where a versioned message sits in its export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTag {
    pub turn: usize,
    pub side: Role,
    pub number: u32,
    pub kind: VersionKind,
    /// Human version number this message answers (equals `number` on the human side)
    pub answers: u32,
}

impl VersionTag {
    pub fn is_mainline(&self) -> bool {
        self.number == 0 && self.kind == VersionKind::Normal
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedMessage {
    pub uuid: Uuid,
    pub parent_uuid: Uuid,
    pub sender: Role,
    pub sender_label: String,
    pub timestamp: Option<String>,
    pub content: String,
    pub version: VersionTag,
}
