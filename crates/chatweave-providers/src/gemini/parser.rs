use std::collections::HashSet;

use chatweave_types::{ROOT_SENTINEL, Role, VersionKind, VersionTag, VersionedMessage};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::gemini::schema::{GeminiExport, GeminiVersion};
use crate::traits::{ExportParser, ParsedExport};
use crate::util::normalize_timestamp;
use crate::Result;

const DEFAULT_ASSISTANT_LABEL: &str = "Gemini";

/// Deterministic message ids for one export
///
/// Uses UUID v5 with the conversation as namespace and `turn:side:version`
/// as name, so the same export always yields the same ids and a reference to
/// a version can be computed before (or without) the version itself.
pub(crate) struct VersionIds {
    namespace: Uuid,
}

impl VersionIds {
    pub(crate) fn new(conversation: &str) -> Self {
        Self {
            namespace: Uuid::new_v5(&Uuid::NAMESPACE_OID, conversation.as_bytes()),
        }
    }

    pub(crate) fn id(&self, turn: usize, side: Role, number: u32) -> Uuid {
        let name = format!("turn-{}:{}:v{}", turn, side.as_str(), number);
        Uuid::new_v5(&self.namespace, name.as_bytes())
    }
}

/// Flatten a multi-version export into parent-linked versioned messages.
///
/// Parent rules:
/// - human versions of turn 0 hang from [`ROOT_SENTINEL`]
/// - human versions of turn N hang from the last listed assistant version of
///   turn N-1 (version 0 when that turn has none)
/// - assistant versions hang from the human version named by `answersVersion`
pub(crate) fn flatten_versions(export: &GeminiExport, source_id: &str) -> Vec<VersionedMessage> {
    let conversation = export.conversation_id.as_deref().unwrap_or(source_id);
    let ids = VersionIds::new(conversation);

    let last_assistant: Vec<u32> = export
        .turns
        .iter()
        .map(|turn| {
            turn.assistant
                .iter()
                .enumerate()
                .last()
                .map(|(pos, v)| version_number(v, pos))
                .unwrap_or(0)
        })
        .collect();

    let mut messages = Vec::new();

    for (turn_index, turn) in export.turns.iter().enumerate() {
        let human_parent = match turn_index {
            0 => ROOT_SENTINEL,
            n => ids.id(n - 1, Role::Assistant, last_assistant[n - 1]),
        };

        let mut seen = HashSet::new();
        for (pos, version) in turn.human.iter().enumerate() {
            let number = version_number(version, pos);
            if !seen.insert(number) {
                warn!(turn = turn_index, number, "duplicate human version skipped");
                continue;
            }
            messages.push(build_message(
                &ids,
                turn_index,
                Role::Human,
                number,
                number,
                human_parent,
                version,
            ));
        }

        let mut seen = HashSet::new();
        for (pos, version) in turn.assistant.iter().enumerate() {
            let number = version_number(version, pos);
            if !seen.insert(number) {
                warn!(turn = turn_index, number, "duplicate assistant version skipped");
                continue;
            }
            let answers = version.answers_version.unwrap_or(0);
            let parent = ids.id(turn_index, Role::Human, answers);
            messages.push(build_message(
                &ids,
                turn_index,
                Role::Assistant,
                number,
                answers,
                parent,
                version,
            ));
        }
    }

    debug!(
        source = source_id,
        turns = export.turns.len(),
        messages = messages.len(),
        "flattened multi-version export"
    );
    messages
}

fn version_number(version: &GeminiVersion, position: usize) -> u32 {
    version.version.unwrap_or(position as u32)
}

fn build_message(
    ids: &VersionIds,
    turn: usize,
    side: Role,
    number: u32,
    answers: u32,
    parent_uuid: Uuid,
    version: &GeminiVersion,
) -> VersionedMessage {
    let sender_label = version.author.clone().unwrap_or_else(|| match side {
        Role::Human => side.default_label().to_string(),
        Role::Assistant => DEFAULT_ASSISTANT_LABEL.to_string(),
    });

    VersionedMessage {
        uuid: ids.id(turn, side, number),
        parent_uuid,
        sender: side,
        sender_label,
        timestamp: version.timestamp.as_ref().and_then(normalize_timestamp),
        content: version.text.clone().unwrap_or_default(),
        version: VersionTag {
            turn,
            side,
            number,
            kind: version
                .kind
                .as_deref()
                .map(VersionKind::parse)
                .unwrap_or_default(),
            answers,
        },
    }
}

/// Gemini multi-version parser implementation
pub struct GeminiParser;

impl ExportParser for GeminiParser {
    fn parse(&self, source_id: &str, content: &str) -> Result<ParsedExport> {
        let export: GeminiExport = serde_json::from_str(content)?;
        Ok(ParsedExport::Versioned(flatten_versions(&export, source_id)))
    }
}
