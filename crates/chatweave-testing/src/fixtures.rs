//! Fixtures for building export entries and locating sample files.

use anyhow::{Context, Result};
use chatweave_types::{RawMessageEntry, SourceFile};
use std::path::PathBuf;

/// Human entry named "User"
pub fn user(text: &str) -> RawMessageEntry {
    RawMessageEntry::new("User", true, text)
}

/// Assistant entry named "Assistant"
pub fn assistant(text: &str) -> RawMessageEntry {
    RawMessageEntry::new("Assistant", false, text)
}

/// Non-conversational marker entry
pub fn system(text: &str) -> RawMessageEntry {
    RawMessageEntry {
        name: "System".to_string(),
        is_system: true,
        content: Some(text.to_string()),
        ..RawMessageEntry::default()
    }
}

/// Assistant entry carrying alternate replies, `selected` shown
pub fn swiped(variants: &[&str], selected: usize) -> RawMessageEntry {
    let shown = variants.get(selected).copied().unwrap_or_default();
    RawMessageEntry {
        variants: variants.iter().map(|v| v.to_string()).collect(),
        selected_variant: selected,
        ..assistant(shown)
    }
}

/// Attach a timestamp to an entry
pub fn at(mut entry: RawMessageEntry, timestamp: &str) -> RawMessageEntry {
    entry.timestamp = Some(timestamp.to_string());
    entry
}

pub fn file(name: &str, entries: Vec<RawMessageEntry>) -> SourceFile {
    SourceFile::new(name, entries)
}

/// Directory holding the provider sample exports.
///
/// Samples live in `crates/chatweave-providers/tests/samples/`.
pub fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("chatweave-providers/tests/samples")
}

pub fn sample_path(name: &str) -> PathBuf {
    samples_dir().join(name)
}

pub fn read_sample(name: &str) -> Result<String> {
    let path = sample_path(name);
    std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read sample: {}", path.display()))
}
