//! Content-addressed entry store
//!
//! One file per distinct clipboard value under a per-user directory,
//! `{temp root}/.clipboard_{user}/`, named by the value's fingerprint with
//! no extension. Entry content is write-once: the first occurrence of a
//! fingerprint creates the file (temp file + rename, so a concurrently
//! reading picker never sees a partial entry), every later occurrence only
//! refreshes the modification time. The mtime is the sole recency signal;
//! nothing here ever deletes an entry.
//!
//! The directory is shared without locking: creates are content-addressed
//! and write-once, touches are commutative, so concurrent daemon instances
//! for the same user at worst duplicate a touch.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

use crate::fingerprint::Fingerprint;
use crate::models::EntryMetadata;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The OS user could not be resolved, so no per-user directory exists.
    /// Fatal at daemon startup.
    #[error("unable to resolve the current OS user (USER/USERNAME unset)")]
    UnknownUser,
    /// The storage directory could not be created or opened. Fatal at
    /// daemon startup.
    #[error("storage directory {path} unavailable: {source}")]
    DirectoryUnavailable { path: PathBuf, source: io::Error },
    /// An entry could not be created or touched. Non-fatal; logged by the
    /// daemon and the tick is dropped.
    #[error("unable to write entry {fingerprint}: {source}")]
    EntryWrite {
        fingerprint: String,
        source: io::Error,
    },
    #[error("unable to list entries: {0}")]
    List(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// What `record` did with a fingerprint + content pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// First occurrence: a new entry file was created.
    Created,
    /// The entry already existed; only its modification time moved.
    Touched,
}

/// Content-addressed filesystem store shared with the picker process.
pub struct EntryStore {
    root: PathBuf,
}

impl EntryStore {
    /// Per-user storage root: `{temp root}/.clipboard_{user}/`.
    /// Both the daemon and the picker derive it the same way.
    pub fn default_root() -> StoreResult<PathBuf> {
        let user = os_username().ok_or(StoreError::UnknownUser)?;
        Ok(std::env::temp_dir().join(format!(".clipboard_{user}")))
    }

    /// Open a store, creating the directory with owner-only permissions if
    /// it does not exist yet (daemon side).
    pub fn open(root: PathBuf) -> StoreResult<Self> {
        ensure_private_dir(&root)?;
        Ok(Self { root })
    }

    /// Open an existing store without creating anything (picker side).
    pub fn open_existing(root: PathBuf) -> StoreResult<Self> {
        if !root.is_dir() {
            return Err(StoreError::DirectoryUnavailable {
                source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
                path: root,
            });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(fingerprint.as_str())
    }

    /// Create the entry on first occurrence of a fingerprint, refresh its
    /// modification time on repeats. Existing content is never rewritten.
    pub fn record(&self, fingerprint: &Fingerprint, content: &str) -> StoreResult<Recorded> {
        let path = self.entry_path(fingerprint);

        if path.exists() {
            touch(&path).map_err(|source| StoreError::EntryWrite {
                fingerprint: fingerprint.to_string(),
                source,
            })?;
            return Ok(Recorded::Touched);
        }

        // Temp cleaners can remove the directory between ticks; recreate it
        // lazily before the first write after that.
        ensure_private_dir(&self.root)?;
        write_via_rename(&path, content.as_bytes()).map_err(|source| StoreError::EntryWrite {
            fingerprint: fingerprint.to_string(),
            source,
        })?;
        Ok(Recorded::Created)
    }

    /// All entries, most recently touched first. Files whose names are not
    /// fingerprint-shaped are skipped, as are entries that vanish while the
    /// directory is being read.
    pub fn entries(&self) -> StoreResult<Vec<EntryMetadata>> {
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.root)? {
            let dir_entry = dir_entry?;
            let name = dir_entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(fingerprint) = Fingerprint::from_file_name(name) else {
                continue;
            };
            let Ok(metadata) = dir_entry.metadata() else {
                continue;
            };
            let Ok(modified) = metadata.modified() else {
                continue;
            };
            entries.push(EntryMetadata {
                fingerprint,
                path: dir_entry.path(),
                modified,
            });
        }
        entries.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(entries)
    }
}

fn os_username() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|user| !user.is_empty())
}

#[cfg(unix)]
fn ensure_private_dir(path: &Path) -> StoreResult<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(path)
        .map_err(|source| StoreError::DirectoryUnavailable {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(not(unix))]
fn ensure_private_dir(path: &Path) -> StoreResult<()> {
    fs::create_dir_all(path).map_err(|source| StoreError::DirectoryUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `content` to a dot-prefixed temp file in the same directory, then
/// rename it into place. The temp name is never fingerprint-shaped, so a
/// concurrent listing cannot pick it up.
fn write_via_rename(path: &Path, content: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("entry");
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    fs::write(&tmp, content)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(())
}

/// Refresh a file's modification time without altering its content.
fn touch(path: &Path) -> io::Result<()> {
    fs::OpenOptions::new()
        .append(true)
        .open(path)?
        .set_modified(SystemTime::now())
}
