//! Commit handles, the index collaborator trait and commit resolution.
//!
//! A CommitHandle is an immutable reference to one generation of the index's
//! on-disk state: the engine reads its file list and holds the generation
//! alive via reservation for the duration of a copy, nothing more.
//!
//! Resolution modes:
//! - by name: look up a recorded commit in the index's commit metadata;
//!   carries no reservation.
//! - latest: take the deletion policy's most recently retained commit (or
//!   fall back to the live view when nothing is tracked yet) and reserve its
//!   generation before returning, so background reclamation cannot delete
//!   files mid-copy. The reservation is a guard released exactly once on
//!   drop.

use log::debug;
use std::path::PathBuf;

use crate::errors::{Result, SnapError};

/// One generation of the index's committed on-disk state.
#[derive(Debug, Clone)]
pub struct CommitHandle {
    /// Monotonic generation number, externally assigned.
    pub generation: u64,
    /// File names belonging to this generation, manifest included.
    pub files: Vec<String>,
    /// The segment-list file among `files`; the entry point that makes a
    /// directory look like a valid commit to a reader.
    pub manifest: String,
}

impl CommitHandle {
    pub fn new(generation: u64, files: Vec<String>, manifest: impl Into<String>) -> Self {
        Self {
            generation,
            files,
            manifest: manifest.into(),
        }
    }
}

/// The index/storage-engine collaborator.
///
/// reserve/release form a reference-counted hold keyed by generation; the
/// engine pairs them exactly once per latest-mode resolution via
/// [`CommitReservation`].
pub trait CommitSource: Send + Sync {
    /// A previously recorded commit by its snapshot/commit name.
    fn commit_by_name(&self, name: &str) -> Result<Option<CommitHandle>>;

    /// The deletion policy's most recently retained commit, if any.
    fn latest_commit(&self) -> Result<Option<CommitHandle>>;

    /// Live-view fallback: the current commit when no retained commit is
    /// tracked yet.
    fn current_commit(&self) -> Result<CommitHandle>;

    /// The live index directory files are copied out of.
    fn index_dir(&self) -> PathBuf;

    /// Increment the hold count for `generation`.
    fn reserve(&self, generation: u64);

    /// Decrement the hold count for `generation`.
    fn release(&self, generation: u64);
}

/// Scoped hold on a commit generation. Releases on drop, exactly once.
pub struct CommitReservation<'a> {
    source: &'a dyn CommitSource,
    generation: u64,
}

impl<'a> CommitReservation<'a> {
    fn acquire(source: &'a dyn CommitSource, generation: u64) -> Self {
        debug!("commit: reserving generation {}", generation);
        source.reserve(generation);
        Self { source, generation }
    }
}

impl Drop for CommitReservation<'_> {
    fn drop(&mut self) {
        debug!("commit: releasing generation {}", self.generation);
        self.source.release(self.generation);
    }
}

/// A resolved commit plus the reservation keeping it alive, when one was
/// taken (latest mode only).
pub struct ResolvedCommit<'a> {
    pub handle: CommitHandle,
    _reservation: Option<CommitReservation<'a>>,
}

/// Resolve the commit to copy.
pub fn resolve_commit<'a>(
    source: &'a dyn CommitSource,
    commit_name: Option<&str>,
) -> Result<ResolvedCommit<'a>> {
    match commit_name {
        Some(name) => {
            let handle = source.commit_by_name(name)?.ok_or_else(|| {
                SnapError::NotFound(format!("unable to find an index commit with name {}", name))
            })?;
            Ok(ResolvedCommit {
                handle,
                _reservation: None,
            })
        }
        None => {
            let handle = match source.latest_commit()? {
                Some(c) => c,
                None => source.current_commit()?,
            };
            let reservation = CommitReservation::acquire(source, handle.generation);
            Ok(ResolvedCommit {
                handle,
                _reservation: Some(reservation),
            })
        }
    }
}
