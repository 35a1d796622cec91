//! Content normalization and fingerprinting
//!
//! A fingerprint is the identity key of a captured clipboard value: the
//! SHA-256 digest of the normalized text, encoded as 64 lowercase hex
//! characters. Entries on disk are named by their fingerprint, so two ticks
//! that capture byte-identical normalized content always resolve to the same
//! entry path. Hash collisions are treated as identity.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded fingerprint (SHA-256 → 32 bytes → 64 hex chars).
pub const FINGERPRINT_LEN: usize = 64;

/// Strip leading and trailing whitespace (spaces, tabs, newlines).
/// Interior whitespace is untouched. Idempotent; whitespace-only input
/// normalizes to the empty string.
pub fn normalize(raw: &str) -> &str {
    raw.trim()
}

/// Hash-derived identity key for a piece of normalized clipboard content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of normalized content. Pure function: no
    /// hidden state, identical input always yields identical output.
    pub fn of(content: &str) -> Self {
        let digest = Sha256::digest(content.as_bytes());
        Self(digest.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Interpret a storage file name as a fingerprint. Returns `None` for
    /// anything that is not exactly 64 lowercase hex characters, which is
    /// how the listing side skips foreign files in the storage directory.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let is_lower_hex = name
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if name.len() == FINGERPRINT_LEN && is_lower_hex {
            Some(Self(name.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
