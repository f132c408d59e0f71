use chatweave_types::{MergeResult, NormalizedMessage};

const PREVIEW_CHARS: usize = 72;

/// Deeper branches render at this indent
const MAX_INDENT_LEVEL: u32 = 16;

pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Collapse whitespace (newlines included) and truncate
pub fn preview(text: &str, max_chars: usize) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&flattened, max_chars)
}

/// Text timeline: one line per message, indented by branch level
pub fn timeline(result: &MergeResult) -> String {
    let mut lines: Vec<String> = result.history.iter().map(timeline_line).collect();

    let stats = &result.metadata.stats;
    lines.push(String::new());
    lines.push(format!(
        "{} message(s), {} branch(es), {} branch point(s) from {} file(s)",
        result.history.len(),
        stats.branch_count,
        stats.branch_points,
        result.metadata.total_files
    ));
    lines.join("\n")
}

fn timeline_line(message: &NormalizedMessage) -> String {
    let indent = "  ".repeat(message.branch_level.min(MAX_INDENT_LEVEL) as usize);
    let marker = if message.is_branch_point { "* " } else { "" };
    let variant = match &message.variant_info {
        Some(info) if info.is_selected => {
            format!(" [variant {}/{}, selected]", info.variant_index + 1, info.total)
        }
        Some(info) => format!(" [variant {}/{}]", info.variant_index + 1, info.total),
        None => String::new(),
    };

    format!(
        "{:>4}  {:<14} {}{}{}: {}{}",
        message.display_index,
        message.branch_id.as_str(),
        indent,
        marker,
        message.sender_label,
        preview(&message.content, PREVIEW_CHARS),
        variant
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatweave_types::{BranchId, MergeMetadata, Role, VariantInfo};
    use uuid::Uuid;

    fn message(index: usize, branch: BranchId, level: u32, content: &str) -> NormalizedMessage {
        NormalizedMessage {
            display_index: index,
            uuid: Uuid::from_u128(index as u128 + 1),
            parent_uuid: None,
            sender: Role::Assistant,
            sender_label: "Aria".to_string(),
            timestamp: String::new(),
            content: content.to_string(),
            branch_id: branch,
            branch_level: level,
            is_branch_point: false,
            variant_info: None,
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer sentence", 10), "a longe...");
    }

    #[test]
    fn test_preview_flattens_lines() {
        assert_eq!(preview("line one\n\n  line two", 40), "line one line two");
    }

    #[test]
    fn test_deep_levels_are_clamped() {
        let deep = message(0, BranchId::new("branch_t0_h0_v4000000000"), u32::MAX, "retry");
        let line = timeline_line(&deep);
        let indent = "  ".repeat(MAX_INDENT_LEVEL as usize);
        assert!(line.contains(&format!(" {}Aria: retry", indent)));
        assert!(line.len() < 200);
    }

    #[test]
    fn test_timeline_lines() {
        let mut variant = message(1, BranchId::numbered(1), 1, "Paris?");
        variant.is_branch_point = true;
        variant.variant_info = Some(VariantInfo {
            total: 3,
            is_selected: false,
            variant_index: 0,
        });

        let mut metadata = MergeMetadata::for_files(vec!["a.jsonl".to_string()]);
        metadata.stats.branch_count = 2;
        metadata.stats.branch_points = 1;
        let result = MergeResult {
            history: vec![message(0, BranchId::main(), 0, "Hello"), variant],
            metadata,
        };

        let text = timeline(&result);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "   0  main           Aria: Hello");
        assert_eq!(lines[1], "   1  branch_1         * Aria: Paris? [variant 1/3]");
        assert_eq!(
            lines[3],
            "2 message(s), 2 branch(es), 1 branch point(s) from 1 file(s)"
        );
    }
}
