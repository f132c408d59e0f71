use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::Role;

/// Branch identifier as shown in the timeline ("main", "branch_3", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(String);

impl BranchId {
    pub const MAIN: &'static str = "main";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn main() -> Self {
        Self(Self::MAIN.to_string())
    }

    /// Sequentially allocated branch id used by the linearizer
    pub fn numbered(n: usize) -> Self {
        Self(format!("branch_{}", n))
    }

    pub fn is_main(&self) -> bool {
        self.0 == Self::MAIN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a message among the alternate replies of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInfo {
    pub total: usize,
    pub is_selected: bool,
    pub variant_index: usize,
}

/// A message in the reconstructed, branch-tagged history
///
/// Serialized with camelCase keys because timeline renderers and exporters
/// consume this shape directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMessage {
    /// Position in emission order, starting at 0
    pub display_index: usize,

    /// Engine-generated id; stable only within one merge session
    pub uuid: Uuid,

    /// Lineage edge for the timeline; None for conversation roots
    pub parent_uuid: Option<Uuid>,

    pub sender: Role,
    pub sender_label: String,

    /// Export timestamp, or an empty string when the source had none
    pub timestamp: String,

    pub content: String,

    pub branch_id: BranchId,
    pub branch_level: u32,

    #[serde(default)]
    pub is_branch_point: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_info: Option<VariantInfo>,
}
