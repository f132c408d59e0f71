use serde::{Deserialize, Serialize};

use crate::NormalizedMessage;

/// Output of one merge session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeResult {
    pub history: Vec<NormalizedMessage>,
    pub metadata: MergeMetadata,
}

/// Describes which files went into a merge and what the engine found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MergeMetadata {
    pub total_files: usize,
    pub file_names: Vec<String>,

    /// The first file of the group; its conversation owns the "main" branch
    pub main_file: Option<String>,

    /// Every other file in the group, in input order
    pub branch_files: Vec<String>,

    pub is_single_file: bool,

    pub stats: MergeStats,
}

impl MergeMetadata {
    /// Metadata for a group of files, before any stats are known
    pub fn for_files(file_names: Vec<String>) -> Self {
        Self {
            total_files: file_names.len(),
            main_file: file_names.first().cloned(),
            branch_files: file_names.iter().skip(1).cloned().collect(),
            is_single_file: file_names.len() == 1,
            file_names,
            stats: MergeStats::default(),
        }
    }
}

/// Counters gathered while building and linearizing the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MergeStats {
    /// Conversational entries read across all files (graph path only, else 0)
    pub entries_seen: usize,

    /// Distinct fingerprints (graph nodes; 0 off the graph path)
    pub node_count: usize,

    /// Entries that resolved to an already existing node
    pub duplicates_collapsed: usize,

    pub root_count: usize,

    /// Distinct branch ids in the emitted history, "main" included
    pub branch_count: usize,

    pub branch_points: usize,

    /// Messages emitted as alternate-reply siblings
    pub variant_messages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_for_files() {
        let meta = MergeMetadata::for_files(vec!["a.jsonl".to_string(), "b.jsonl".to_string()]);
        assert_eq!(meta.total_files, 2);
        assert_eq!(meta.main_file.as_deref(), Some("a.jsonl"));
        assert_eq!(meta.branch_files, vec!["b.jsonl".to_string()]);
        assert!(!meta.is_single_file);

        let single = MergeMetadata::for_files(vec!["only.json".to_string()]);
        assert!(single.is_single_file);
        assert!(single.branch_files.is_empty());
    }

    #[test]
    fn test_empty_group() {
        let meta = MergeMetadata::for_files(Vec::new());
        assert_eq!(meta.total_files, 0);
        assert_eq!(meta.main_file, None);
        assert!(!meta.is_single_file);
    }
}
