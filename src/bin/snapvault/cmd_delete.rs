use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use SnapVault::{DirCommitSource, LocalFsRepository, SnapshotRequest, Snapshotter};

/// Delete a named snapshot and print the status report.
pub fn exec(location: PathBuf, name: String, json: bool) -> Result<()> {
    let repo = Arc::new(LocalFsRepository::new());
    // Deletion never touches the index; the location stands in for it.
    let commits = Arc::new(DirCommitSource::new(&location));

    let shooter = Snapshotter::new(
        repo,
        commits,
        &location,
        SnapshotRequest::new().named(name),
    );

    shooter
        .validate_delete()
        .with_context(|| format!("validate snapshot deletion at {}", location.display()))?;

    let report = shooter.delete();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "snapshot-delete: status={} name={}",
            report.status, report.snapshot_name
        );
    }
    Ok(())
}
