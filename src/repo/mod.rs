//! Repository abstraction over the storage backend holding snapshots.
//!
//! Locations are opaque PathBuf addresses; all child resolution goes through
//! `Repository::resolve` so a non-filesystem backend can impose its own
//! structure. The snapshot engine consumes only this trait; the local
//! filesystem backend below is the reference implementation.

use log::debug;
use std::path::{Path, PathBuf};

use crate::checksum::FileChecksum;
use crate::errors::Result;

mod local;

pub use local::LocalFsRepository;

/// What a location points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    File,
    Directory,
}

pub trait Repository: Send + Sync {
    /// Whether anything exists at `location`.
    fn exists(&self, location: &Path) -> Result<bool>;

    /// Names of the immediate children of `location`, in stable order.
    fn list_all(&self, location: &Path) -> Result<Vec<String>>;

    /// File-or-directory query for `location`.
    fn path_type(&self, location: &Path) -> Result<PathType>;

    /// Resolve `child` as an address under `base`.
    fn resolve(&self, base: &Path, child: &str) -> PathBuf;

    /// Copy one named file out of the live index directory into `dest_dir`.
    fn copy_file_from(&self, source_dir: &Path, file_name: &str, dest_dir: &Path) -> Result<()>;

    /// Fingerprint a named file under `location`.
    ///
    /// Returns CorruptFile when an existing file cannot be read consistently;
    /// the incremental copy path treats that as "recopy", not as fatal.
    fn checksum(&self, location: &Path, file_name: &str) -> Result<FileChecksum>;

    /// Delete named files under `location`. Best-effort: every name is
    /// attempted, the first failure is reported after the loop.
    fn delete(&self, location: &Path, names: &[String]) -> Result<()>;

    /// Delete a directory and everything under it.
    fn delete_directory(&self, location: &Path) -> Result<()>;

    /// Best-effort listing: maps failure (missing destination included) to an
    /// empty set. The fallible/empty distinction does not matter for the one
    /// caller of this (incremental destination scan), so it is collapsed here
    /// in exactly one place.
    fn list_all_or_empty(&self, location: &Path) -> Vec<String> {
        match self.list_all(location) {
            Ok(names) => names,
            Err(e) => {
                debug!(
                    "repo: list {} failed, treating as empty: {}",
                    location.display(),
                    e
                );
                Vec::new()
            }
        }
    }
}
