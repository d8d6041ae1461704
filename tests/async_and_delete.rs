// tests/async_and_delete.rs
//
// Run only this file:
//   cargo test --test async_and_delete -- --nocapture
//
// Covers:
// 1) Async creation always hands a report to the callback: a success report
//    on the happy path, a failure-shaped one on error (never a panic).
// 2) Anonymous async snapshots trigger retention afterwards; named ones and
//    failed ones never do.
// 3) Deletion: validate + delete reports, including the captured-failure
//    shape, sync and async.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use SnapVault::checksum::FileChecksum;
use SnapVault::{
    DirCommitSource, LocalFsRepository, PathType, Repository, SnapError, SnapshotRequest,
    SnapshotStatus, Snapshotter,
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("svtest-async-{prefix}-{pid}-{t}-{id}"))
}

fn seed(root: &PathBuf) -> Result<(PathBuf, PathBuf)> {
    let index = root.join("index");
    let base = root.join("backups");
    fs::create_dir_all(&index)?;
    fs::create_dir_all(&base)?;
    fs::write(index.join("segments_1"), b"g1")?;
    fs::write(index.join("_0.cfs"), b"seg0")?;
    Ok((index, base))
}

fn shooter(index: &PathBuf, base: &PathBuf, request: SnapshotRequest) -> Snapshotter {
    Snapshotter::new(
        Arc::new(LocalFsRepository::new()),
        Arc::new(DirCommitSource::new(index)),
        base,
        request,
    )
}

fn seed_old_snapshots(base: &PathBuf, count: usize) -> Result<()> {
    for i in 0..count {
        let name = format!("snapshot.2023010100000{:04}", i);
        fs::create_dir_all(base.join(name))?;
    }
    Ok(())
}

#[test]
fn async_create_delivers_success_report() -> Result<()> {
    let root = unique_root("ok");
    let (index, base) = seed(&root)?;

    let (tx, rx) = mpsc::channel();
    let handle = shooter(&index, &base, SnapshotRequest::new().named("daily"))
        .create_async(0, move |report| tx.send(report).unwrap());
    handle.join().expect("snapshot thread must not panic");

    let report = rx.recv()?;
    assert_eq!(report.status, SnapshotStatus::Success);
    assert_eq!(report.file_count, 2);
    assert!(base.join("snapshot.daily").exists());
    Ok(())
}

#[test]
fn async_create_captures_failure_into_report() -> Result<()> {
    let root = unique_root("fail");
    let index = root.join("index");
    let base = root.join("missing-base"); // never created
    fs::create_dir_all(&index)?;
    fs::write(index.join("segments_1"), b"g1")?;

    let (tx, rx) = mpsc::channel();
    let handle = shooter(&index, &base, SnapshotRequest::new().named("daily"))
        .create_async(0, move |report| tx.send(report).unwrap());
    handle.join().expect("failure must be captured, not panicked");

    let report = rx.recv()?;
    assert_eq!(report.status, SnapshotStatus::Failure);
    let error = report.error.expect("failure report carries the cause");
    assert!(error.contains("base location"), "error={error}");
    Ok(())
}

#[test]
fn anonymous_async_snapshot_prunes_old_ones() -> Result<()> {
    let root = unique_root("prune");
    let (index, base) = seed(&root)?;
    seed_old_snapshots(&base, 4)?;

    let (tx, rx) = mpsc::channel();
    let handle = shooter(&index, &base, SnapshotRequest::new())
        .create_async(2, move |report| tx.send(report).unwrap());
    handle.join().unwrap();
    assert!(rx.recv()?.is_success());

    // 4 seeded + 1 fresh = 5 timestamped dirs; keep 2.
    let remaining: Vec<String> = fs::read_dir(&base)?
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("snapshot."))
        .collect();
    assert_eq!(remaining.len(), 2, "remaining={remaining:?}");
    Ok(())
}

#[test]
fn named_async_snapshot_never_prunes() -> Result<()> {
    let root = unique_root("noprune");
    let (index, base) = seed(&root)?;
    seed_old_snapshots(&base, 3)?;

    let (tx, rx) = mpsc::channel();
    let handle = shooter(&index, &base, SnapshotRequest::new().named("daily"))
        .create_async(0, move |report| tx.send(report).unwrap());
    handle.join().unwrap();
    assert!(rx.recv()?.is_success());

    for i in 0..3 {
        let name = format!("snapshot.2023010100000{:04}", i);
        assert!(base.join(name).exists(), "named snapshots must not prune");
    }
    Ok(())
}

#[test]
fn delete_snapshot_reports_success() -> Result<()> {
    let root = unique_root("del");
    let (index, base) = seed(&root)?;

    shooter(&index, &base, SnapshotRequest::new().named("daily")).create()?;

    let s = shooter(&index, &base, SnapshotRequest::new().named("daily"));
    s.validate_delete()?;
    let report = s.delete();

    assert!(report.is_success());
    assert_eq!(report.snapshot_name, "daily");
    assert!(report.deleted_at.is_some());
    assert!(!base.join("snapshot.daily").exists());
    Ok(())
}

#[test]
fn validate_delete_missing_snapshot_is_not_found() -> Result<()> {
    let root = unique_root("delmiss");
    let (index, base) = seed(&root)?;

    let s = shooter(&index, &base, SnapshotRequest::new().named("ghost"));
    let err = s.validate_delete().unwrap_err();
    assert!(matches!(err, SnapError::NotFound(_)));

    // Deletion without validation captures the failure into the report.
    let report = s.delete();
    assert!(!report.is_success());
    assert!(report.status.contains("Unable to delete"), "status={}", report.status);
    assert!(report.deleted_at.is_none());
    Ok(())
}

/// Repository whose directory deletion always fails.
struct NoDeleteRepo(LocalFsRepository);

impl Repository for NoDeleteRepo {
    fn exists(&self, location: &Path) -> Result<bool, SnapError> {
        self.0.exists(location)
    }
    fn list_all(&self, location: &Path) -> Result<Vec<String>, SnapError> {
        self.0.list_all(location)
    }
    fn path_type(&self, location: &Path) -> Result<PathType, SnapError> {
        self.0.path_type(location)
    }
    fn resolve(&self, base: &Path, child: &str) -> PathBuf {
        self.0.resolve(base, child)
    }
    fn copy_file_from(
        &self,
        source_dir: &Path,
        file_name: &str,
        dest_dir: &Path,
    ) -> Result<(), SnapError> {
        self.0.copy_file_from(source_dir, file_name, dest_dir)
    }
    fn checksum(&self, location: &Path, file_name: &str) -> Result<FileChecksum, SnapError> {
        self.0.checksum(location, file_name)
    }
    fn delete(&self, location: &Path, names: &[String]) -> Result<(), SnapError> {
        self.0.delete(location, names)
    }
    fn delete_directory(&self, location: &Path) -> Result<(), SnapError> {
        Err(SnapError::Io {
            path: location.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

#[test]
fn delete_async_reports_captured_failure() -> Result<()> {
    let root = unique_root("delasync");
    let (index, base) = seed(&root)?;

    shooter(&index, &base, SnapshotRequest::new().named("daily")).create()?;

    let s = Snapshotter::new(
        Arc::new(NoDeleteRepo(LocalFsRepository::new())),
        Arc::new(DirCommitSource::new(&index)),
        &base,
        SnapshotRequest::new().named("daily"),
    );
    let (tx, rx) = mpsc::channel();
    let handle = s.delete_async(move |report| tx.send(report).unwrap());
    handle.join().unwrap();

    let report = rx.recv()?;
    assert!(!report.is_success());
    assert!(report.status.contains("read-only"), "status={}", report.status);
    Ok(())
}
