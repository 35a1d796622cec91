//! Clipboard capture
//!
//! Reads the current clipboard text through a spawned platform helper
//! (`xclip`, `wl-paste` or `pbpaste`), enforcing per-line and total size
//! limits while reading. A capture that breaks either limit is discarded
//! whole, never truncated.
//!
//! The helper call may block for as long as the helper takes to respond;
//! no timeout is enforced in this baseline.

use std::io::BufRead;
use std::io::BufReader;
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    /// The clipboard mechanism failed to start or respond. Non-fatal; the
    /// daemon retries on the next tick.
    #[error("clipboard mechanism unavailable: {0}")]
    Unavailable(String),
    /// A single line exceeded the configured line limit.
    #[error("clipboard line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
    /// The accumulated capture exceeded the configured total limit.
    #[error("clipboard content exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Size limits applied while reading a clipboard snapshot.
#[derive(Debug, Clone, Copy)]
pub struct CaptureLimits {
    pub max_total_bytes: usize,
    pub max_line_bytes: usize,
}

impl CaptureLimits {
    pub const DEFAULT_MAX_TOTAL_BYTES: usize = 1024 * 1024; // 1 MiB
    pub const DEFAULT_MAX_LINE_BYTES: usize = 10 * 1024; // 10 KiB
}

impl Default for CaptureLimits {
    fn default() -> Self {
        Self {
            max_total_bytes: Self::DEFAULT_MAX_TOTAL_BYTES,
            max_line_bytes: Self::DEFAULT_MAX_LINE_BYTES,
        }
    }
}

/// Capability interface for "read the current clipboard text or fail".
/// The daemon is written against this trait so platform access stays
/// swappable (and scriptable in tests).
pub trait ClipboardSource {
    fn read_text(&mut self) -> CaptureResult<String>;
}

/// Platform clipboard helper selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// `xclip -o -selection clipboard`
    X11,
    /// `wl-paste --no-newline`
    Wayland,
    /// `pbpaste`
    Macos,
}

impl Backend {
    /// Pick a helper for the current environment.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Backend::Macos
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Backend::Wayland
        } else {
            Backend::X11
        }
    }

    fn command(self) -> Command {
        match self {
            Backend::X11 => {
                let mut cmd = Command::new("xclip");
                cmd.args(["-o", "-selection", "clipboard"]);
                cmd
            }
            Backend::Wayland => {
                let mut cmd = Command::new("wl-paste");
                cmd.arg("--no-newline");
                cmd
            }
            Backend::Macos => Command::new("pbpaste"),
        }
    }
}

/// Clipboard source that spawns a platform helper once per tick and reads
/// its stdout line by line under the configured limits.
pub struct CommandSource {
    backend: Backend,
    limits: CaptureLimits,
}

impl CommandSource {
    pub fn new(backend: Backend, limits: CaptureLimits) -> Self {
        Self { backend, limits }
    }
}

impl ClipboardSource for CommandSource {
    fn read_text(&mut self) -> CaptureResult<String> {
        run_helper(self.backend.command(), &self.limits)
    }
}

/// Spawn `cmd` and read its stdout under `limits`. The helper's exit status
/// is deliberately ignored: some helpers exit non-zero for an empty
/// clipboard, which is just an empty capture, not a failure.
fn run_helper(mut cmd: Command, limits: &CaptureLimits) -> CaptureResult<String> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| CaptureError::Unavailable(err.to_string()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| CaptureError::Unavailable("helper has no stdout".to_string()))?;

    let result = read_limited(BufReader::new(stdout), limits);

    // On an aborted read the pipe closes early and the helper terminates on
    // its own; wait either way so it never lingers as a zombie.
    let _ = child.wait();

    result
}

/// Read line-oriented text from `reader`, aborting the instant any single
/// line exceeds the line limit or the accumulated size exceeds the total
/// limit. Line sizes count the trailing newline where one is present.
pub fn read_limited<R: BufRead>(mut reader: R, limits: &CaptureLimits) -> CaptureResult<String> {
    let mut data: Vec<u8> = Vec::new();
    let mut line: Vec<u8> = Vec::new();

    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .map_err(|err| CaptureError::Unavailable(err.to_string()))?;
        if n == 0 {
            break;
        }
        if n > limits.max_line_bytes {
            return Err(CaptureError::LineTooLong {
                limit: limits.max_line_bytes,
            });
        }
        if data.len() + n > limits.max_total_bytes {
            return Err(CaptureError::TooLarge {
                limit: limits.max_total_bytes,
            });
        }
        data.extend_from_slice(&line);
    }

    String::from_utf8(data)
        .map_err(|_| CaptureError::Unavailable("clipboard produced non-text data".to_string()))
}
