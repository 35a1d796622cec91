//! clipstashd - the clipboard capture daemon
//!
//! Polls the clipboard on a fixed interval and stores each distinct value
//! in the per-user entry directory. Runs until killed.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use clipstash_core::capture::{Backend, CaptureLimits, CommandSource};
use clipstash_core::config::{DaemonConfig, DEFAULT_POLL_INTERVAL_MS};
use clipstash_core::daemon::Daemon;
use clipstash_core::store::EntryStore;

#[derive(Parser)]
#[command(name = "clipstashd")]
#[command(about = "Clipboard capture daemon: polls the clipboard and stores distinct values")]
#[command(version)]
struct Args {
    /// Poll interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    interval_ms: u64,

    /// Maximum total capture size in bytes; larger captures are discarded
    #[arg(long, default_value_t = CaptureLimits::DEFAULT_MAX_TOTAL_BYTES)]
    max_bytes: usize,

    /// Maximum single-line size in bytes; larger captures are discarded
    #[arg(long, default_value_t = CaptureLimits::DEFAULT_MAX_LINE_BYTES)]
    max_line_bytes: usize,

    /// Clipboard helper to use (defaults to platform detection)
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Storage directory (defaults to the per-user directory under the
    /// system temp root)
    #[arg(long)]
    dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = DaemonConfig {
        backend: args.backend.unwrap_or_else(Backend::detect),
        limits: CaptureLimits {
            max_total_bytes: args.max_bytes,
            max_line_bytes: args.max_line_bytes,
        },
        interval: Duration::from_millis(args.interval_ms),
        storage_dir: args.dir,
    };

    // Startup is the only fatal window: no user, no directory, no daemon.
    let root = config
        .storage_root()
        .context("cannot resolve storage directory")?;
    let store = EntryStore::open(root).context("cannot prepare storage directory")?;

    log::info!(
        "polling {:?} clipboard every {:?}, storing in {}",
        config.backend,
        config.interval,
        store.root().display()
    );

    let source = CommandSource::new(config.backend, config.limits);
    let mut daemon = Daemon::new(source, store, config.interval);
    daemon.run()
}
