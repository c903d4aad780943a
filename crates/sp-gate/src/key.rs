//! Content-addressed cache keys.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 fingerprint of a request, as 64 lowercase hex chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_prompt(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Same four components in, same key out. Each part is trimmed and written
/// with its byte length in front, so no choice of contents can make two
/// different requests collide on concatenation.
pub fn build_key(system_version: &str, model_id: &str, client_id: &str, text: &str) -> CacheKey {
    let mut hasher = Sha256::new();
    for part in [system_version, model_id, client_id, text] {
        let part = part.trim();
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    CacheKey(format!("{:x}", hasher.finalize()))
}
