//! Error taxonomy for snapshot operations.
//!
//! Validation errors (NotFound / AlreadyExists / BaseLocationMissing) are
//! surfaced before any I/O mutation. CorruptFile is special: the incremental
//! copy path recovers from it locally (the file is recopied) and it never
//! reaches the caller from there. Io carries the offending path alongside the
//! underlying cause.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = SnapError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SnapError {
    /// A named commit or snapshot directory could not be resolved.
    #[error("not found: {0}")]
    NotFound(String),

    /// Non-incremental destination collision.
    #[error("snapshot directory already exists: {}", .path.display())]
    AlreadyExists { path: PathBuf },

    /// The configured base location does not exist.
    #[error("base location does not exist: {}", .path.display())]
    BaseLocationMissing { path: PathBuf },

    /// An existing file could not be fingerprinted (unreadable/inconsistent
    /// content). Recoverable on the incremental path: recopy the file.
    #[error("corrupt file {}: {detail}", .path.display())]
    CorruptFile { path: PathBuf, detail: String },

    /// Any underlying copy/list/delete failure.
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SnapError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapError::Io {
            path: path.into(),
            source,
        }
    }
}
