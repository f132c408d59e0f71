use chatweave_types::RawMessageEntry;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Content-derived identity of a message
///
/// Two entries with the same fingerprint are treated as the same message no
/// matter which export file they came from. Shape: `role|name|len:hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the fingerprint of an entry.
///
/// Only the speaker (role and display name) and the content take part.
/// Timestamps are excluded because the same message is routinely exported
/// with different times. Missing content hashes as the empty string.
///
/// The content hash is the first 64 bits of a SHA-256 digest. Collisions are
/// not treated as an error; two colliding messages from the same speaker
/// would merge into one node.
pub fn fingerprint(entry: &RawMessageEntry) -> Fingerprint {
    let content = entry.content_or_empty();
    let digest = Sha256::digest(content.as_bytes());
    let hash: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();

    Fingerprint(format!(
        "{}|{}|{}:{}",
        entry.role().as_str(),
        entry.name,
        content.len(),
        hash
    ))
}
