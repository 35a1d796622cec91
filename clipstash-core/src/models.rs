//! Entry metadata and display labels
//!
//! The picker lists entries by a short label read from the entry file:
//! embedded newlines become spaces and the text is cut at a fixed number of
//! characters with an ellipsis marker. Truncation counts characters, not
//! bytes, so multibyte text is never split mid-codepoint.

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::fingerprint::Fingerprint;

/// Default number of label characters shown per entry.
pub const DEFAULT_LABEL_CHARS: usize = 50;

/// One stored entry as seen by the listing side: its identity, its path and
/// the modification time that orders it.
#[derive(Debug, Clone)]
pub struct EntryMetadata {
    pub fingerprint: Fingerprint,
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl EntryMetadata {
    pub fn modified_utc(&self) -> DateTime<Utc> {
        self.modified.into()
    }

    /// Read this entry's display label. An unreadable entry (e.g. removed
    /// out from under us) labels as empty rather than failing the listing.
    pub fn label(&self, max_chars: usize) -> String {
        match fs::read_to_string(&self.path) {
            Ok(content) => entry_label(&content, max_chars),
            Err(_) => String::new(),
        }
    }
}

/// Build a display label: newlines to spaces, cut at `max_chars` characters
/// with `…` appended when the limit is hit.
pub fn entry_label(content: &str, max_chars: usize) -> String {
    let mut label = String::with_capacity(max_chars + 4);
    for (count, ch) in content.chars().enumerate() {
        if count == max_chars {
            label.push('…');
            break;
        }
        label.push(match ch {
            '\n' | '\r' => ' ',
            c => c,
        });
    }
    label
}
