use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI for SnapVault snapshot management
#[derive(Parser, Debug)]
#[command(name = "snapvault", version, about = "SnapVault snapshot CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Create a snapshot of a segment directory
    Create {
        /// Live index (segment) directory to snapshot
        #[arg(long)]
        index: PathBuf,
        /// Base location snapshots are stored under
        #[arg(long)]
        location: PathBuf,
        /// Explicit snapshot name; omitted => timestamp-derived name
        #[arg(long)]
        name: Option<String>,
        /// Reconcile into an existing snapshot directory by checksum
        #[arg(long, default_value_t = false)]
        incremental: bool,
        /// After an anonymous snapshot, keep only this many timestamped ones
        #[arg(long)]
        keep: Option<usize>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Delete a named snapshot
    Delete {
        #[arg(long)]
        location: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List timestamped snapshots under a location, newest first
    List {
        #[arg(long)]
        location: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Prune old timestamped snapshots, keeping the N most recent
    Prune {
        #[arg(long)]
        location: PathBuf,
        #[arg(long)]
        keep: usize,
    },
}
