//! Operation reports returned to the caller.
//!
//! A report is the sole observable output of a copy or deletion: returned
//! synchronously or delivered through the async callback, never persisted
//! and never written into shared state by a background task.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    Success,
    Failure,
}

/// Result of one snapshot creation.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    pub status: SnapshotStatus,
    pub start_time: String,
    pub file_count: usize,
    pub completed_at: Option<String>,
    pub snapshot_name: Option<String>,
    /// First fatal cause, failure only.
    pub error: Option<String>,
}

impl SnapshotReport {
    pub fn success(
        snapshot_name: Option<String>,
        started: DateTime<Utc>,
        file_count: usize,
    ) -> Self {
        Self {
            status: SnapshotStatus::Success,
            start_time: fmt_ts(started),
            file_count,
            completed_at: Some(fmt_ts(Utc::now())),
            snapshot_name,
            error: None,
        }
    }

    pub fn failure(snapshot_name: Option<String>, started: DateTime<Utc>, error: String) -> Self {
        Self {
            status: SnapshotStatus::Failure,
            start_time: fmt_ts(started),
            file_count: 0,
            completed_at: None,
            snapshot_name,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SnapshotStatus::Success
    }
}

/// Result of one snapshot deletion. I/O failures are captured into the
/// status text rather than raised; deletion typically runs detached.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionReport {
    pub status: String,
    pub snapshot_name: String,
    pub deleted_at: Option<String>,
}

impl DeletionReport {
    pub fn success(snapshot_name: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            snapshot_name: snapshot_name.into(),
            deleted_at: Some(fmt_ts(Utc::now())),
        }
    }

    pub fn failure(snapshot_name: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        let snapshot_name = snapshot_name.into();
        Self {
            status: format!("Unable to delete snapshot {}: {}", snapshot_name, cause),
            snapshot_name,
            deleted_at: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
