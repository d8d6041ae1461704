// tests/snapshot_full.rs
//
// Run only this file:
//   cargo test --test snapshot_full -- --nocapture
//
// Covers:
// 1) Full named snapshot: exact file-for-file copy of the commit.
// 2) Validation: destination collision, missing base location.
// 3) Anonymous snapshots get a parseable timestamp-derived name.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use SnapVault::descriptor::parse_timestamp;
use SnapVault::{
    DirCommitSource, LocalFsRepository, SnapError, SnapshotRequest, SnapshotStatus, Snapshotter,
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("svtest-full-{prefix}-{pid}-{t}-{id}"))
}

fn seed_index(index: &PathBuf, files: &[(&str, &[u8])]) -> Result<()> {
    fs::create_dir_all(index)?;
    for (name, content) in files {
        fs::write(index.join(name), content)?;
    }
    Ok(())
}

fn shooter(index: &PathBuf, base: &PathBuf, request: SnapshotRequest) -> Snapshotter {
    Snapshotter::new(
        Arc::new(LocalFsRepository::new()),
        Arc::new(DirCommitSource::new(index)),
        base,
        request,
    )
}

#[test]
fn full_named_snapshot_copies_commit_files() -> Result<()> {
    let root = unique_root("named");
    let index = root.join("index");
    let base = root.join("backups");
    seed_index(&index, &[("segments_1", b"g1"), ("_0.cfs", b"seg0 data")])?;
    fs::create_dir_all(&base)?;

    let report = shooter(&index, &base, SnapshotRequest::new().named("daily")).create()?;

    assert_eq!(report.status, SnapshotStatus::Success);
    assert_eq!(report.file_count, 2);
    assert_eq!(report.snapshot_name.as_deref(), Some("daily"));
    assert!(report.completed_at.is_some());

    let snap = base.join("snapshot.daily");
    let mut names: Vec<String> = fs::read_dir(&snap)?
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["_0.cfs".to_string(), "segments_1".to_string()]);
    assert_eq!(fs::read(snap.join("_0.cfs"))?, b"seg0 data");
    Ok(())
}

#[test]
fn full_snapshot_fails_when_destination_exists() -> Result<()> {
    let root = unique_root("collision");
    let index = root.join("index");
    let base = root.join("backups");
    seed_index(&index, &[("segments_1", b"g1")])?;
    fs::create_dir_all(&base)?;

    shooter(&index, &base, SnapshotRequest::new().named("daily")).create()?;
    let err = shooter(&index, &base, SnapshotRequest::new().named("daily"))
        .create()
        .unwrap_err();
    assert!(matches!(err, SnapError::AlreadyExists { .. }));
    Ok(())
}

#[test]
fn create_fails_when_base_location_missing() -> Result<()> {
    let root = unique_root("nobase");
    let index = root.join("index");
    let base = root.join("does-not-exist");
    seed_index(&index, &[("segments_1", b"g1")])?;

    let err = shooter(&index, &base, SnapshotRequest::new().named("daily"))
        .create()
        .unwrap_err();
    assert!(matches!(err, SnapError::BaseLocationMissing { .. }));
    // Fail-fast: nothing was created.
    assert!(!base.exists());
    Ok(())
}

#[test]
fn anonymous_snapshot_derives_timestamp_name() -> Result<()> {
    let root = unique_root("anon");
    let index = root.join("index");
    let base = root.join("backups");
    seed_index(&index, &[("segments_1", b"g1"), ("_0.cfs", b"x")])?;
    fs::create_dir_all(&base)?;

    let s = shooter(&index, &base, SnapshotRequest::new());
    let dir_name = s.directory_name().to_string();
    let report = s.create()?;

    assert_eq!(report.status, SnapshotStatus::Success);
    assert_eq!(report.snapshot_name, None);
    assert!(parse_timestamp(&dir_name).is_some(), "dir={dir_name}");
    assert!(base.join(&dir_name).join("segments_1").exists());
    Ok(())
}

#[test]
fn commit_excludes_superseded_manifests_and_lock_file() -> Result<()> {
    let root = unique_root("super");
    let index = root.join("index");
    let base = root.join("backups");
    seed_index(
        &index,
        &[
            ("segments_1", b"g1"),
            ("segments_2", b"g2"),
            ("_0.cfs", b"x"),
            ("write.lock", b""),
        ],
    )?;
    fs::create_dir_all(&base)?;

    let report = shooter(&index, &base, SnapshotRequest::new().named("cur")).create()?;
    assert_eq!(report.file_count, 2); // _0.cfs + segments_2

    let snap = base.join("snapshot.cur");
    assert!(snap.join("segments_2").exists());
    assert!(!snap.join("segments_1").exists());
    assert!(!snap.join("write.lock").exists());
    Ok(())
}
