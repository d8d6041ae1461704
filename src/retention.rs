//! Retention pruning of old anonymous snapshots.
//!
//! Only timestamp-named directories (`snapshot.<yyyyMMddHHmmssSSS>`)
//! participate: explicitly named snapshots and anything else under the base
//! location are opaque to retention and never auto-deleted. Deletion is
//! best-effort per directory; one failed delete never aborts the loop.

use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::descriptor::parse_timestamp;
use crate::errors::Result;
use crate::metrics::record_retention_run;
use crate::repo::{PathType, Repository};

/// A prunable snapshot directory: timestamp parsed out of its name.
#[derive(Debug, Clone)]
pub struct OldSnapshotDir {
    pub name: String,
    pub timestamp: NaiveDateTime,
    pub path: PathBuf,
}

/// Outcome of one retention pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionOutcome {
    /// Timestamp-named directories found under the base location.
    pub examined: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// List the timestamp-named snapshot directories under `base`, newest first.
pub fn list_old_snapshots(repo: &dyn Repository, base: &Path) -> Result<Vec<OldSnapshotDir>> {
    let mut dirs = Vec::new();
    for name in repo.list_all(base)? {
        let path = repo.resolve(base, &name);
        if repo.path_type(&path)? != PathType::Directory {
            continue;
        }
        match parse_timestamp(&name) {
            Some(timestamp) => dirs.push(OldSnapshotDir {
                name,
                timestamp,
                path,
            }),
            None => debug!("retention: ignoring non-timestamp entry {}", name),
        }
    }
    dirs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(dirs)
}

/// Delete all but the `number_to_keep` most recent timestamp-named
/// snapshot directories under `base`.
pub fn delete_old_snapshots(
    repo: &dyn Repository,
    base: &Path,
    number_to_keep: usize,
) -> Result<RetentionOutcome> {
    let dirs = list_old_snapshots(repo, base)?;

    let mut outcome = RetentionOutcome {
        examined: dirs.len(),
        ..Default::default()
    };

    // No-op whenever number_to_keep > count - 1.
    if number_to_keep >= dirs.len() {
        record_retention_run(0);
        return Ok(outcome);
    }

    for dir in &dirs[number_to_keep..] {
        match repo.delete_directory(&dir.path) {
            Ok(()) => outcome.deleted += 1,
            Err(e) => {
                warn!("retention: unable to delete old snapshot {}: {}", dir.name, e);
                outcome.failed += 1;
            }
        }
    }

    info!(
        "retention: done, examined={} kept={} deleted={} failed={}",
        outcome.examined, number_to_keep, outcome.deleted, outcome.failed
    );
    record_retention_run(outcome.deleted as u64);
    Ok(outcome)
}
