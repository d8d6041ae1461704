//! Local filesystem repository backend.

use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum::{crc32_of_file, FileChecksum};
use crate::errors::{Result, SnapError};
use crate::repo::{PathType, Repository};

/// Repository over a locally mounted filesystem (including shared
/// filesystems exposed via a local mount point).
#[derive(Debug, Default, Clone)]
pub struct LocalFsRepository;

impl LocalFsRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Repository for LocalFsRepository {
    fn exists(&self, location: &Path) -> Result<bool> {
        Ok(location.exists())
    }

    fn list_all(&self, location: &Path) -> Result<Vec<String>> {
        let rd = fs::read_dir(location).map_err(|e| SnapError::io(location, e))?;
        let mut names = Vec::new();
        for entry in rd {
            let entry = entry.map_err(|e| SnapError::io(location, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn path_type(&self, location: &Path) -> Result<PathType> {
        let md = fs::metadata(location).map_err(|e| SnapError::io(location, e))?;
        if md.is_dir() {
            Ok(PathType::Directory)
        } else {
            Ok(PathType::File)
        }
    }

    fn resolve(&self, base: &Path, child: &str) -> PathBuf {
        base.join(child)
    }

    fn copy_file_from(&self, source_dir: &Path, file_name: &str, dest_dir: &Path) -> Result<()> {
        // The destination directory appears with the first copied file.
        fs::create_dir_all(dest_dir).map_err(|e| SnapError::io(dest_dir, e))?;

        let src = source_dir.join(file_name);
        let dst = dest_dir.join(file_name);
        fs::copy(&src, &dst).map_err(|e| SnapError::io(&src, e))?;
        Ok(())
    }

    fn checksum(&self, location: &Path, file_name: &str) -> Result<FileChecksum> {
        let path = location.join(file_name);
        if !path.exists() {
            return Err(SnapError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            ));
        }
        // The file is there but cannot be fingerprinted: corrupt, not fatal.
        crc32_of_file(&path).map_err(|e| SnapError::CorruptFile {
            path,
            detail: e.to_string(),
        })
    }

    fn delete(&self, location: &Path, names: &[String]) -> Result<()> {
        let mut first_err: Option<SnapError> = None;
        for name in names {
            let path = location.join(name);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(SnapError::io(&path, e));
                    }
                }
            }
        }
        match first_err {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    fn delete_directory(&self, location: &Path) -> Result<()> {
        fs::remove_dir_all(location).map_err(|e| SnapError::io(location, e))
    }
}
