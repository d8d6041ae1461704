//! Per-operation snapshot configuration.
//!
//! Created once per operation, immutable after the Snapshotter consumes it.
//! Unnamed requests produce anonymous (timestamp-named) snapshots, which are
//! the only ones retention prunes automatically.

/// Configuration for one snapshot operation.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRequest {
    /// Explicit snapshot name; None derives a timestamp name.
    pub name: Option<String>,
    /// Explicit commit name to copy; None takes the latest commit (with
    /// reservation).
    pub commit_name: Option<String>,
    /// Incremental copy: reconcile against an existing destination by
    /// checksum instead of requiring a fresh directory.
    pub incremental: bool,
}

impl SnapshotRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn commit_name(mut self, name: impl Into<String>) -> Self {
        self.commit_name = Some(name.into());
        self
    }

    pub fn incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }
}
