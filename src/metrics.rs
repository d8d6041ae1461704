//! Lightweight global metrics for SnapVault.
//!
//! Thread-safe atomic counters for the snapshot subsystems:
//! - Copy engine (files copied / skipped / deleted at destination)
//! - Snapshot lifecycle (created / failed / deleted)
//! - Retention (runs / directories pruned)

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Copy engine -----
static FILES_COPIED: AtomicU64 = AtomicU64::new(0);
static FILES_SKIPPED: AtomicU64 = AtomicU64::new(0);
static FILES_DELETED: AtomicU64 = AtomicU64::new(0);

// ----- Snapshot lifecycle -----
static SNAPSHOTS_CREATED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOTS_FAILED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOTS_DELETED: AtomicU64 = AtomicU64::new(0);

// ----- Retention -----
static RETENTION_RUNS: AtomicU64 = AtomicU64::new(0);
static RETENTION_DIRS_DELETED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub files_copied: u64,
    pub files_skipped: u64,
    pub files_deleted: u64,

    pub snapshots_created: u64,
    pub snapshots_failed: u64,
    pub snapshots_deleted: u64,

    pub retention_runs: u64,
    pub retention_dirs_deleted: u64,
}

impl MetricsSnapshot {
    /// Share of examined files the incremental path skipped unchanged.
    pub fn skip_ratio(&self) -> f64 {
        let total = self.files_copied + self.files_skipped;
        if total == 0 {
            0.0
        } else {
            self.files_skipped as f64 / total as f64
        }
    }
}

// ----- Recorders (copy engine) -----
pub fn record_file_copied() {
    FILES_COPIED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_file_skipped() {
    FILES_SKIPPED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_files_deleted(count: u64) {
    FILES_DELETED.fetch_add(count, Ordering::Relaxed);
}

// ----- Recorders (snapshot lifecycle) -----
pub fn record_snapshot_created() {
    SNAPSHOTS_CREATED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_snapshot_failed() {
    SNAPSHOTS_FAILED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_snapshot_deleted() {
    SNAPSHOTS_DELETED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (retention) -----
pub fn record_retention_run(dirs_deleted: u64) {
    RETENTION_RUNS.fetch_add(1, Ordering::Relaxed);
    RETENTION_DIRS_DELETED.fetch_add(dirs_deleted, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        files_copied: FILES_COPIED.load(Ordering::Relaxed),
        files_skipped: FILES_SKIPPED.load(Ordering::Relaxed),
        files_deleted: FILES_DELETED.load(Ordering::Relaxed),

        snapshots_created: SNAPSHOTS_CREATED.load(Ordering::Relaxed),
        snapshots_failed: SNAPSHOTS_FAILED.load(Ordering::Relaxed),
        snapshots_deleted: SNAPSHOTS_DELETED.load(Ordering::Relaxed),

        retention_runs: RETENTION_RUNS.load(Ordering::Relaxed),
        retention_dirs_deleted: RETENTION_DIRS_DELETED.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    FILES_COPIED.store(0, Ordering::Relaxed);
    FILES_SKIPPED.store(0, Ordering::Relaxed);
    FILES_DELETED.store(0, Ordering::Relaxed);

    SNAPSHOTS_CREATED.store(0, Ordering::Relaxed);
    SNAPSHOTS_FAILED.store(0, Ordering::Relaxed);
    SNAPSHOTS_DELETED.store(0, Ordering::Relaxed);

    RETENTION_RUNS.store(0, Ordering::Relaxed);
    RETENTION_DIRS_DELETED.store(0, Ordering::Relaxed);
}
