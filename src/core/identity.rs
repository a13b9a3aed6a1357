use sha2::{Digest, Sha256};

use super::feed::types::ParsedEntry;

/// Stable deduplication key for an entry: the SHA-256 of its natural id,
/// falling back to the link, then the title, then the empty string.
pub fn identify(entry: &ParsedEntry) -> String {
    let base = [&entry.id, &entry.link, &entry.title]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default();
    let digest = Sha256::digest(base.as_bytes());
    format!("{digest:x}")
}
