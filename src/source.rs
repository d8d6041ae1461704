//! Live-directory commit source.
//!
//! Adapts a plain segment directory to the CommitSource trait: the current
//! directory listing is the one and only commit, with the generation parsed
//! out of the newest `segments_<gen>` manifest (radix-36 suffix, the way the
//! index format numbers its segment-list files). No named-commit metadata
//! and no background reclamation exist in this mode, so by-name lookups
//! resolve to nothing and reserve/release are no-ops.

use log::debug;
use std::path::PathBuf;

use crate::commit::{CommitHandle, CommitSource};
use crate::errors::{Result, SnapError};

/// Manifest file prefix in a segment directory.
pub const MANIFEST_PREFIX: &str = "segments_";

/// Lock file never belonging to a commit.
const LOCK_FILE: &str = "write.lock";

pub struct DirCommitSource {
    dir: PathBuf,
}

impl DirCommitSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn scan(&self) -> Result<CommitHandle> {
        let rd = std::fs::read_dir(&self.dir).map_err(|e| SnapError::io(&self.dir, e))?;

        let mut names: Vec<String> = Vec::new();
        for entry in rd {
            let entry = entry.map_err(|e| SnapError::io(&self.dir, e))?;
            let md = entry.metadata().map_err(|e| SnapError::io(&self.dir, e))?;
            if !md.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == LOCK_FILE {
                continue;
            }
            names.push(name);
        }
        names.sort();

        let (manifest, generation) = names
            .iter()
            .filter_map(|n| parse_generation(n).map(|g| (n.clone(), g)))
            .max_by_key(|&(_, g)| g)
            .ok_or_else(|| {
                SnapError::NotFound(format!(
                    "no manifest file ({}N) in {}",
                    MANIFEST_PREFIX,
                    self.dir.display()
                ))
            })?;

        // A commit references exactly one manifest; drop superseded ones.
        let files: Vec<String> = names
            .into_iter()
            .filter(|n| parse_generation(n).is_none() || *n == manifest)
            .collect();

        Ok(CommitHandle::new(generation, files, manifest))
    }
}

/// Generation of a manifest file name, None for anything else.
fn parse_generation(file_name: &str) -> Option<u64> {
    let suffix = file_name.strip_prefix(MANIFEST_PREFIX)?;
    u64::from_str_radix(suffix, 36).ok()
}

impl CommitSource for DirCommitSource {
    fn commit_by_name(&self, _name: &str) -> Result<Option<CommitHandle>> {
        // A bare directory records no named commits.
        Ok(None)
    }

    fn latest_commit(&self) -> Result<Option<CommitHandle>> {
        // No deletion policy tracks commits here; callers fall back to the
        // live view.
        Ok(None)
    }

    fn current_commit(&self) -> Result<CommitHandle> {
        self.scan()
    }

    fn index_dir(&self) -> PathBuf {
        self.dir.clone()
    }

    fn reserve(&self, generation: u64) {
        debug!("source: reserve generation {} (no-op)", generation);
    }

    fn release(&self, generation: u64) {
        debug!("source: release generation {} (no-op)", generation);
    }
}
