use std::collections::HashMap;

use chatweave_types::{
    AdapterOutput, BranchId, DraftMessage, MergeMetadata, MergeResult, NormalizedMessage, Role,
    VersionTag, VersionedMessage,
};
use tracing::debug;
use uuid::Uuid;

use crate::session::{history_stats, merge_files, session_namespace};

/// Route adapter output to the right reconciliation path.
///
/// Plain sequences go through one graph merge; pre-tagged sequences only get
/// defaults filled in; versioned sequences get branch tags derived from their
/// version numbers. Output that already came from the graph is never merged
/// again: callers hand a `MergeResult` straight to the UI.
///
/// `file_names` names the sources for the non-graph paths; graph input carries
/// its own source ids.
pub fn dispatch(output: AdapterOutput, file_names: &[String]) -> MergeResult {
    debug!(kind = output.kind(), files = file_names.len(), "dispatching adapter output");

    match output {
        AdapterOutput::Graph(files) => merge_files(&files),
        AdapterOutput::Tagged(drafts) => {
            let history = apply_default_tags(drafts, session_namespace(file_names));
            finish(history, file_names)
        }
        AdapterOutput::Versioned(versions) => finish(classify_versions(versions), file_names),
    }
}

fn finish(history: Vec<NormalizedMessage>, file_names: &[String]) -> MergeResult {
    let mut metadata = MergeMetadata::for_files(file_names.to_vec());
    metadata.stats = history_stats(&history);
    MergeResult { history, metadata }
}

/// Fill `main`/0 on untagged drafts and mint missing uuids. Existing tags are
/// left untouched.
///
/// A missing parent is chained to the latest earlier message on the same
/// branch. The first message of a branch with no parent given stays
/// parentless; its fork point is unknown.
pub fn apply_default_tags(drafts: Vec<DraftMessage>, namespace: Uuid) -> Vec<NormalizedMessage> {
    let mut history: Vec<NormalizedMessage> = Vec::with_capacity(drafts.len());
    let mut branch_tails: HashMap<BranchId, Uuid> = HashMap::new();

    for (index, draft) in drafts.into_iter().enumerate() {
        let uuid = draft
            .uuid
            .unwrap_or_else(|| Uuid::new_v5(&namespace, format!("draft:{}", index).as_bytes()));
        let branch_id = draft.branch_id.unwrap_or_else(BranchId::main);
        let parent_uuid = draft
            .parent_uuid
            .or_else(|| branch_tails.get(&branch_id).copied());
        branch_tails.insert(branch_id.clone(), uuid);

        history.push(NormalizedMessage {
            display_index: index,
            uuid,
            parent_uuid,
            sender: draft.sender,
            sender_label: draft
                .sender_label
                .unwrap_or_else(|| draft.sender.default_label().to_string()),
            timestamp: draft.timestamp.unwrap_or_default(),
            content: draft.content,
            branch_id,
            branch_level: draft.branch_level.unwrap_or(0),
            is_branch_point: false,
            variant_info: None,
        });
    }

    mark_branch_points(&mut history);
    history
}

/// Tag multi-version messages by version number.
///
/// Version 0 of kind `normal` is the main line. Everything else (later
/// versions, edits, retries) gets a branch id built from its turn, the human
/// version it answers and its own number, at level `max(number, 1)`. This is
/// a heuristic: two retries of different turns can share a level while
/// living on unrelated branches.
pub fn classify_versions(versions: Vec<VersionedMessage>) -> Vec<NormalizedMessage> {
    let mut history: Vec<NormalizedMessage> = versions
        .into_iter()
        .enumerate()
        .map(|(display_index, message)| {
            let (branch_id, branch_level) = version_branch(&message.version);
            NormalizedMessage {
                display_index,
                uuid: message.uuid,
                parent_uuid: Some(message.parent_uuid),
                sender: message.sender,
                sender_label: message.sender_label,
                timestamp: message.timestamp.unwrap_or_default(),
                content: message.content,
                branch_id,
                branch_level,
                is_branch_point: false,
                variant_info: None,
            }
        })
        .collect();

    mark_branch_points(&mut history);
    history
}

fn version_branch(tag: &VersionTag) -> (BranchId, u32) {
    if tag.is_mainline() {
        return (BranchId::main(), 0);
    }

    let id = match tag.side {
        Role::Assistant => format!("branch_t{}_h{}_v{}", tag.turn, tag.answers, tag.number),
        Role::Human => format!("branch_t{}_h{}", tag.turn, tag.number),
    };
    (BranchId::new(id), tag.number.max(1))
}

/// Flag every message that more than one other message names as its parent
fn mark_branch_points(history: &mut [NormalizedMessage]) {
    let mut fan_out: HashMap<Uuid, usize> = HashMap::new();
    for message in history.iter() {
        if let Some(parent) = message.parent_uuid {
            *fan_out.entry(parent).or_default() += 1;
        }
    }

    for message in history.iter_mut() {
        if fan_out.get(&message.uuid).copied().unwrap_or(0) > 1 {
            message.is_branch_point = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatweave_types::{ROOT_SENTINEL, RawMessageEntry, SourceFile, VersionKind};

    fn versioned(
        uuid: u128,
        parent: Uuid,
        side: Role,
        turn: usize,
        number: u32,
        kind: VersionKind,
        answers: u32,
    ) -> VersionedMessage {
        VersionedMessage {
            uuid: Uuid::from_u128(uuid),
            parent_uuid: parent,
            sender: side,
            sender_label: side.default_label().to_string(),
            timestamp: None,
            content: format!("t{} {:?} v{}", turn, side, number),
            version: VersionTag {
                turn,
                side,
                number,
                kind,
                answers,
            },
        }
    }

    #[test]
    fn test_retry_gets_its_own_branch() {
        let human = Uuid::from_u128(1);
        let versions = vec![
            versioned(1, ROOT_SENTINEL, Role::Human, 0, 0, VersionKind::Normal, 0),
            versioned(2, human, Role::Assistant, 0, 0, VersionKind::Normal, 0),
            versioned(3, human, Role::Assistant, 0, 1, VersionKind::Retry, 0),
        ];

        let result = dispatch(AdapterOutput::Versioned(versions), &["chat.json".to_string()]);
        let history = &result.history;

        assert_eq!(history[0].parent_uuid, Some(ROOT_SENTINEL));
        assert!(history[0].is_branch_point);

        assert_eq!(history[1].branch_id.as_str(), "main");
        assert_eq!(history[1].branch_level, 0);

        assert_ne!(history[2].branch_id.as_str(), "main");
        assert!(history[2].branch_level >= 1);
        assert_eq!(history[1].parent_uuid, Some(human));
        assert_eq!(history[2].parent_uuid, Some(human));

        assert!(result.metadata.is_single_file);
        assert_eq!(result.metadata.stats.branch_count, 2);
        assert_eq!(result.metadata.stats.branch_points, 1);
        assert_eq!(result.metadata.stats.entries_seen, 0);
        assert_eq!(result.metadata.stats.node_count, 0);
        assert_eq!(result.metadata.stats.duplicates_collapsed, 0);
    }

    #[test]
    fn test_edited_version_zero_is_not_main() {
        let tag = VersionTag {
            turn: 2,
            side: Role::Human,
            number: 0,
            kind: VersionKind::Edit,
            answers: 0,
        };
        let (branch, level) = version_branch(&tag);
        assert_eq!(branch.as_str(), "branch_t2_h0");
        assert_eq!(level, 1);
    }

    #[test]
    fn test_higher_versions_use_number_as_level() {
        let tag = VersionTag {
            turn: 1,
            side: Role::Assistant,
            number: 3,
            kind: VersionKind::Retry,
            answers: 1,
        };
        let (branch, level) = version_branch(&tag);
        assert_eq!(branch.as_str(), "branch_t1_h1_v3");
        assert_eq!(level, 3);
    }

    #[test]
    fn test_defaults_fill_only_missing_tags() {
        let drafts = vec![
            DraftMessage {
                uuid: None,
                parent_uuid: None,
                sender: Role::Human,
                sender_label: None,
                timestamp: None,
                content: "hello".to_string(),
                branch_id: None,
                branch_level: None,
            },
            DraftMessage {
                uuid: Some(Uuid::from_u128(42)),
                parent_uuid: None,
                sender: Role::Assistant,
                sender_label: Some("Claude".to_string()),
                timestamp: Some("2024-05-01T10:00:00Z".to_string()),
                content: "hi".to_string(),
                branch_id: Some(BranchId::new("alt")),
                branch_level: Some(2),
            },
        ];

        let history = apply_default_tags(drafts, Uuid::from_u128(9));

        assert_eq!(history[0].branch_id.as_str(), "main");
        assert_eq!(history[0].branch_level, 0);
        assert_eq!(history[0].sender_label, "User");
        assert_eq!(history[0].parent_uuid, None);
        assert_eq!(history[0].timestamp, "");

        assert_eq!(history[1].uuid, Uuid::from_u128(42));
        assert_eq!(history[1].parent_uuid, None);
        assert_eq!(history[1].branch_id.as_str(), "alt");
        assert_eq!(history[1].branch_level, 2);
    }

    fn draft(content: &str, branch: Option<BranchId>, parent: Option<Uuid>) -> DraftMessage {
        DraftMessage {
            uuid: None,
            parent_uuid: parent,
            sender: Role::Assistant,
            sender_label: None,
            timestamp: None,
            content: content.to_string(),
            branch_id: branch,
            branch_level: None,
        }
    }

    #[test]
    fn test_missing_parents_follow_their_own_branch() {
        let drafts = vec![
            draft("prompt", None, None),
            draft("reply", None, None),
            draft("alternate reply", Some(BranchId::numbered(1)), None),
            draft("follow-up", None, None),
            draft("alternate follow-up", Some(BranchId::numbered(1)), None),
        ];

        let history = apply_default_tags(drafts, Uuid::from_u128(9));
        let by_uuid: HashMap<Uuid, &NormalizedMessage> =
            history.iter().map(|m| (m.uuid, m)).collect();

        for message in history.iter().filter(|m| m.branch_id.is_main()) {
            if let Some(parent) = message.parent_uuid {
                assert!(by_uuid[&parent].branch_id.is_main());
            }
        }
        assert_eq!(history[2].parent_uuid, None);
        assert_eq!(history[3].parent_uuid, Some(history[1].uuid));
        assert_eq!(history[4].parent_uuid, Some(history[2].uuid));
    }

    #[test]
    fn test_given_parent_is_kept() {
        let fork = Uuid::from_u128(7);
        let drafts = vec![
            draft("reply", None, None),
            draft("alternate reply", Some(BranchId::numbered(1)), Some(fork)),
        ];

        let history = apply_default_tags(drafts, Uuid::from_u128(9));
        assert_eq!(history[1].parent_uuid, Some(fork));
    }

    #[test]
    fn test_graph_output_goes_through_merge() {
        let files = vec![
            SourceFile::new("a", vec![RawMessageEntry::new("User", true, "x")]),
            SourceFile::new("b", vec![RawMessageEntry::new("User", true, "x")]),
        ];

        let result = dispatch(AdapterOutput::Graph(files), &[]);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.metadata.total_files, 2);
        assert_eq!(result.metadata.stats.duplicates_collapsed, 1);
    }
}
