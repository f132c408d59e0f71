use std::collections::BTreeSet;

use chatweave_types::{MergeMetadata, MergeResult, MergeStats, NormalizedMessage, SourceFile};
use tracing::debug;
use uuid::Uuid;

use crate::graph::GraphBuilder;
use crate::linearize::{DEFAULT_NAMESPACE, Linearizer};

/// One merge over a group of export files that belong together.
///
/// Deciding which files form a group is the caller's job. A session is
/// consumed by [`finish`](MergeSession::finish).
#[derive(Debug, Default)]
pub struct MergeSession {
    graph: GraphBuilder,
    file_names: Vec<String>,
}

impl MergeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: &SourceFile) {
        let file_index = self.file_names.len();
        self.graph.add_file(&file.entries, file_index);
        self.file_names.push(file.source_id.clone());
    }

    pub fn graph(&self) -> &GraphBuilder {
        &self.graph
    }

    pub fn finish(self) -> MergeResult {
        let entries_seen = self.graph.entries_seen();
        let node_count = self.graph.node_count();
        let root_count = self.graph.find_true_roots().len();
        let namespace = session_namespace(&self.file_names);

        let history = Linearizer::with_namespace(self.graph, namespace).generate_history();

        let mut metadata = MergeMetadata::for_files(self.file_names);
        metadata.stats = MergeStats {
            entries_seen,
            node_count,
            duplicates_collapsed: entries_seen - node_count,
            root_count,
            ..history_stats(&history)
        };

        debug!(
            files = metadata.total_files,
            messages = history.len(),
            branches = metadata.stats.branch_count,
            "merge session finished"
        );

        MergeResult { history, metadata }
    }
}

/// Merge a group of files in the given order
pub fn merge_files(files: &[SourceFile]) -> MergeResult {
    let mut session = MergeSession::new();
    for file in files {
        session.add_file(file);
    }
    session.finish()
}

/// Namespace for message uuids, derived from the file names of the group
pub(crate) fn session_namespace(file_names: &[String]) -> Uuid {
    Uuid::new_v5(&DEFAULT_NAMESPACE, file_names.join("\n").as_bytes())
}

/// Counters that can be read off any finished history.
///
/// Graph counters (`entries_seen`, `node_count`, `duplicates_collapsed`) stay
/// zero; only a merge session has a graph to count.
pub(crate) fn history_stats(history: &[NormalizedMessage]) -> MergeStats {
    let branches: BTreeSet<&str> = history.iter().map(|m| m.branch_id.as_str()).collect();

    MergeStats {
        root_count: history.iter().filter(|m| m.parent_uuid.is_none()).count(),
        branch_count: branches.len(),
        branch_points: history.iter().filter(|m| m.is_branch_point).count(),
        variant_messages: history.iter().filter(|m| m.variant_info.is_some()).count(),
        ..MergeStats::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatweave_types::RawMessageEntry;

    fn file(name: &str, texts: &[(&str, bool)]) -> SourceFile {
        SourceFile::new(
            name,
            texts
                .iter()
                .map(|(t, is_user)| {
                    RawMessageEntry::new(if *is_user { "User" } else { "Bot" }, *is_user, *t)
                })
                .collect(),
        )
    }

    #[test]
    fn test_metadata_and_stats() {
        let result = merge_files(&[
            file("a.jsonl", &[("hi", true), ("one", false)]),
            file("b.jsonl", &[("hi", true), ("two", false)]),
        ]);

        let meta = &result.metadata;
        assert_eq!(meta.total_files, 2);
        assert_eq!(meta.main_file.as_deref(), Some("a.jsonl"));
        assert_eq!(meta.branch_files, vec!["b.jsonl".to_string()]);
        assert!(!meta.is_single_file);

        assert_eq!(meta.stats.entries_seen, 4);
        assert_eq!(meta.stats.node_count, 3);
        assert_eq!(meta.stats.duplicates_collapsed, 1);
        assert_eq!(meta.stats.root_count, 1);
        assert_eq!(meta.stats.branch_count, 2);
        assert_eq!(meta.stats.branch_points, 1);
        assert_eq!(meta.stats.variant_messages, 0);
    }

    #[test]
    fn test_uuids_depend_on_file_group() {
        let a = merge_files(&[file("a.jsonl", &[("hi", true)])]);
        let b = merge_files(&[file("b.jsonl", &[("hi", true)])]);
        assert_ne!(a.history[0].uuid, b.history[0].uuid);

        let again = merge_files(&[file("a.jsonl", &[("hi", true)])]);
        assert_eq!(a, again);
    }

    #[test]
    fn test_empty_group() {
        let result = merge_files(&[]);
        assert!(result.history.is_empty());
        assert_eq!(result.metadata.total_files, 0);
    }
}
