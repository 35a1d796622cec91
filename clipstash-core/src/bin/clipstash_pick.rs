//! clipstash-pick - list stored clipboard entries and emit a selection
//!
//! Lists entries most recently used first with truncated labels. A
//! selection prints the chosen entry's file path as the sole stdout
//! output, so shell glue can feed it straight back to the clipboard:
//!
//! ```sh
//! xclip -selection clipboard -i "$(clipstash-pick --latest)"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;

use clipstash_core::models::{EntryMetadata, DEFAULT_LABEL_CHARS};
use clipstash_core::store::EntryStore;

#[derive(Parser)]
#[command(name = "clipstash-pick")]
#[command(about = "Browse stored clipboard entries, most recent first")]
#[command(version)]
struct Args {
    /// Label width in characters
    #[arg(long, default_value_t = DEFAULT_LABEL_CHARS)]
    label_chars: usize,

    /// Storage directory (defaults to the per-user directory under the
    /// system temp root)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Print the listing as JSON instead of numbered rows
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Emit the most recent entry's path and exit
    #[arg(long, default_value_t = false)]
    latest: bool,

    /// Emit the path of the Nth listed entry (1 = most recent) and exit
    #[arg(long)]
    pick: Option<usize>,
}

#[derive(Serialize)]
struct ListingRow<'a> {
    path: &'a Path,
    label: String,
    modified: DateTime<Utc>,
}

fn row<'a>(entry: &'a EntryMetadata, label_chars: usize) -> ListingRow<'a> {
    ListingRow {
        path: &entry.path,
        label: entry.label(label_chars),
        modified: entry.modified_utc(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let root = match args.dir {
        Some(dir) => dir,
        None => EntryStore::default_root().context("cannot resolve storage directory")?,
    };
    let store = EntryStore::open_existing(root).context("no clipboard store found")?;
    let entries = store.entries().context("cannot list entries")?;

    if args.latest || args.pick.is_some() {
        let index = args.pick.map(|n| n.saturating_sub(1)).unwrap_or(0);
        let Some(entry) = entries.get(index) else {
            bail!("no entry at position {} ({} stored)", index + 1, entries.len());
        };
        print!("{}", entry.path.display());
        return Ok(());
    }

    if args.json {
        let rows: Vec<ListingRow> = entries
            .iter()
            .map(|entry| row(entry, args.label_chars))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for (position, entry) in entries.iter().enumerate() {
        println!("{:>4}  {}", position + 1, entry.label(args.label_chars));
    }
    Ok(())
}
