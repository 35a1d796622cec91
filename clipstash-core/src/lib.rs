//! clipstash core - clipboard capture and content-addressed storage
//!
//! The capture daemon (`clipstashd`) polls the system clipboard on a fixed
//! interval and persists each distinct value as a write-once file named by
//! the SHA-256 of its normalized content. Repeated values only refresh the
//! entry's modification time, which the picker (`clipstash-pick`) uses as
//! its recency ordering when listing entries for re-selection.
//!
//! # Architecture
//! - `capture`: clipboard access via spawned platform helpers, size limits
//! - `fingerprint`: whitespace normalization and content identity
//! - `store`: per-user content-addressed entry store
//! - `models`: entry metadata and display labels
//! - `daemon`: the poll loop tying the stages together
//! - `config`: defaults and runtime configuration

pub mod capture;
pub mod config;
pub mod daemon;
pub mod fingerprint;
pub mod models;
pub mod store;

pub use capture::{Backend, CaptureError, CaptureLimits, ClipboardSource, CommandSource};
pub use daemon::{Daemon, TickOutcome};
pub use fingerprint::{normalize, Fingerprint};
pub use models::{entry_label, EntryMetadata, DEFAULT_LABEL_CHARS};
pub use store::{EntryStore, Recorded, StoreError};
