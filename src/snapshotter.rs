//! Snapshot lifecycle controller.
//!
//! Orchestrates validate -> resolve (reserving the commit in latest mode) ->
//! copy -> release -> optional retention. The reservation is released by
//! guard drop on every exit path; a failed non-incremental copy rolls the
//! partially written directory back before the error surfaces, so a
//! destination directory is either fully absent or a complete snapshot.
//!
//! Concurrent snapshot operations against the same destination are not
//! coordinated here; callers serialize them.

use chrono::Utc;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use crate::commit::{resolve_commit, CommitHandle, CommitSource};
use crate::copy::{full_copy, incremental_copy};
use crate::descriptor::SnapshotDescriptor;
use crate::errors::{Result, SnapError};
use crate::metrics::{record_snapshot_created, record_snapshot_deleted, record_snapshot_failed};
use crate::repo::{PathType, Repository};
use crate::report::{DeletionReport, SnapshotReport};
use crate::request::SnapshotRequest;
use crate::retention::delete_old_snapshots;

/// One snapshot operation against one base location.
pub struct Snapshotter {
    repo: Arc<dyn Repository>,
    commits: Arc<dyn CommitSource>,
    base: PathBuf,
    snapshot_name: Option<String>,
    commit_name: Option<String>,
    incremental: bool,
    directory_name: String,
    snapshot_dir: PathBuf,
}

impl Snapshotter {
    pub fn new(
        repo: Arc<dyn Repository>,
        commits: Arc<dyn CommitSource>,
        base: impl Into<PathBuf>,
        request: SnapshotRequest,
    ) -> Self {
        let base = base.into();
        let descriptor = SnapshotDescriptor::derive(repo.as_ref(), &base, request.name.as_deref());
        Self {
            repo,
            commits,
            base,
            snapshot_name: request.name,
            commit_name: request.commit_name,
            incremental: request.incremental,
            directory_name: descriptor.directory_name,
            snapshot_dir: descriptor.location,
        }
    }

    /// Parent location all snapshots for this index live under.
    pub fn location(&self) -> &Path {
        &self.base
    }

    /// Resolved snapshot directory for this request.
    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    /// Directory name (`snapshot.<...>`) for this request.
    pub fn directory_name(&self) -> &str {
        &self.directory_name
    }

    fn display_name(&self) -> &str {
        self.snapshot_name.as_deref().unwrap_or("<not named>")
    }

    // ----------------- creation -----------------

    /// Creation preconditions: base location exists; for non-incremental
    /// requests the destination must not exist yet.
    pub fn validate_create(&self) -> Result<()> {
        if !self.repo.exists(&self.base)? {
            return Err(SnapError::BaseLocationMissing {
                path: self.base.clone(),
            });
        }
        if !self.incremental && self.repo.exists(&self.snapshot_dir)? {
            return Err(SnapError::AlreadyExists {
                path: self.snapshot_dir.clone(),
            });
        }
        Ok(())
    }

    /// Blocking snapshot creation. The commit reservation (latest mode) is
    /// held for the whole copy and released on every exit path.
    pub fn create(&self) -> Result<SnapshotReport> {
        self.validate_create()?;
        let resolved = resolve_commit(self.commits.as_ref(), self.commit_name.as_deref())?;
        self.copy_commit(&resolved.handle)
        // resolved drops here: reservation released exactly once
    }

    fn copy_commit(&self, commit: &CommitHandle) -> Result<SnapshotReport> {
        info!(
            "snapshot: creating {} at {}, generation={}, incremental={}",
            self.display_name(),
            self.base.display(),
            commit.generation,
            self.incremental
        );
        let started = Utc::now();
        let source_dir = self.commits.index_dir();

        let result = if self.incremental {
            incremental_copy(
                self.repo.as_ref(),
                &source_dir,
                commit,
                &self.snapshot_dir,
            )
        } else {
            full_copy(self.repo.as_ref(), &source_dir, commit, &self.snapshot_dir)
        };

        match result {
            Ok(stats) => {
                info!(
                    "snapshot: done creating {} at {}, files={} copied={} skipped={} deleted={}",
                    self.display_name(),
                    self.base.display(),
                    commit.files.len(),
                    stats.copied,
                    stats.skipped,
                    stats.deleted
                );
                record_snapshot_created();
                Ok(SnapshotReport::success(
                    self.snapshot_name.clone(),
                    started,
                    commit.files.len(),
                ))
            }
            Err(e) => {
                record_snapshot_failed();
                if !self.incremental {
                    // The directory must never appear as a partial sibling
                    // next to successful snapshots.
                    if let Err(del_err) = self.repo.delete_directory(&self.snapshot_dir) {
                        warn!(
                            "snapshot: rollback of {} failed: {}",
                            self.snapshot_dir.display(),
                            del_err
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Run the blocking path on a detached thread. The callback always
    /// receives a report: failures are captured into a failure-shaped one,
    /// never left to escape the thread. Afterwards, anonymous snapshots
    /// that succeeded get a retention pass keeping `number_to_keep`
    /// directories; retention failure is logged, not propagated.
    pub fn create_async<F>(self, number_to_keep: usize, on_complete: F) -> thread::JoinHandle<()>
    where
        F: FnOnce(SnapshotReport) + Send + 'static,
    {
        thread::spawn(move || {
            let started = Utc::now();
            let report = match self.create() {
                Ok(report) => report,
                Err(e) => {
                    error!("snapshot: creation of {} failed: {}", self.display_name(), e);
                    SnapshotReport::failure(self.snapshot_name.clone(), started, e.to_string())
                }
            };
            let prune = self.snapshot_name.is_none() && report.is_success();
            on_complete(report);

            if prune {
                if let Err(e) =
                    delete_old_snapshots(self.repo.as_ref(), &self.base, number_to_keep)
                {
                    warn!("snapshot: unable to delete old snapshots: {}", e);
                }
            }
        })
    }

    // ----------------- deletion -----------------

    /// Deletion precondition: the named snapshot directory exists under the
    /// base location.
    pub fn validate_delete(&self) -> Result<()> {
        let name = self
            .snapshot_name
            .as_deref()
            .ok_or_else(|| SnapError::NotFound("snapshot name required for deletion".into()))?;

        let found = self
            .repo
            .list_all(&self.base)?
            .iter()
            .any(|entry| entry == &self.directory_name)
            && self.repo.path_type(&self.snapshot_dir)? == PathType::Directory;

        if !found {
            return Err(SnapError::NotFound(format!(
                "snapshot {} cannot be found in directory {}",
                name,
                self.base.display()
            )));
        }
        Ok(())
    }

    /// Delete the snapshot directory. I/O failures are captured into the
    /// report, not raised; this path typically runs detached.
    pub fn delete(&self) -> DeletionReport {
        let name = self.display_name().to_string();
        info!("snapshot: deleting {}", name);

        match self.repo.delete_directory(&self.snapshot_dir) {
            Ok(()) => {
                record_snapshot_deleted();
                DeletionReport::success(name)
            }
            Err(e) => {
                warn!("snapshot: unable to delete {}: {}", name, e);
                DeletionReport::failure(name, e)
            }
        }
    }

    /// Deletion on a detached thread; report through the callback.
    pub fn delete_async<F>(self, on_complete: F) -> thread::JoinHandle<()>
    where
        F: FnOnce(DeletionReport) + Send + 'static,
    {
        thread::spawn(move || on_complete(self.delete()))
    }
}
