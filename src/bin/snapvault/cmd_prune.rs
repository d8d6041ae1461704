use anyhow::{Context, Result};
use std::path::PathBuf;

use SnapVault::retention::delete_old_snapshots;
use SnapVault::LocalFsRepository;

/// Delete all but the `keep` most recent timestamped snapshots.
pub fn exec(location: PathBuf, keep: usize) -> Result<()> {
    let repo = LocalFsRepository::new();
    let outcome = delete_old_snapshots(&repo, &location, keep)
        .with_context(|| format!("prune snapshots at {}", location.display()))?;

    println!(
        "prune: examined={} deleted={} failed={}",
        outcome.examined, outcome.deleted, outcome.failed
    );
    Ok(())
}
