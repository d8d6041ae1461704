use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use SnapVault::retention::delete_old_snapshots;
use SnapVault::{DirCommitSource, LocalFsRepository, SnapshotRequest, Snapshotter};

/// Create a snapshot and print the resulting report.
pub fn exec(
    index: PathBuf,
    location: PathBuf,
    name: Option<String>,
    incremental: bool,
    keep: Option<usize>,
    json: bool,
) -> Result<()> {
    let repo = Arc::new(LocalFsRepository::new());
    let commits = Arc::new(DirCommitSource::new(&index));

    let mut request = SnapshotRequest::new().incremental(incremental);
    let anonymous = name.is_none();
    if let Some(n) = name {
        request = request.named(n);
    }

    let shooter = Snapshotter::new(repo.clone(), commits, &location, request);
    let directory_name = shooter.directory_name().to_string();

    let report = shooter
        .create()
        .with_context(|| format!("create snapshot at {}", location.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "snapshot: status={:?} dir={} files={}",
            report.status, directory_name, report.file_count
        );
    }

    // Retention only ever applies to anonymous (timestamp-named) snapshots.
    if anonymous {
        if let Some(keep) = keep {
            let outcome = delete_old_snapshots(repo.as_ref(), &location, keep)
                .with_context(|| format!("prune old snapshots at {}", location.display()))?;
            println!(
                "prune: examined={} deleted={} failed={}",
                outcome.examined, outcome.deleted, outcome.failed
            );
        }
    }
    Ok(())
}
