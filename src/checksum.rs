//! Content fingerprints for copied files.
//!
//! A FileChecksum is used strictly for equality comparison between a source
//! file and a possibly-stale destination copy of the same name. It is never
//! reconstructed into content. Equal checksums mean "skip the copy";
//! anything else means "must copy".

use crc32fast::Hasher as Crc32;
use std::fs::OpenOptions;
use std::io::Read;
use std::path::Path;

/// Algorithm identifier carried by every checksum produced here.
pub const CHECKSUM_ALGORITHM: &str = "crc32";

/// (algorithm, value, byte length) triple over a file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChecksum {
    pub algorithm: &'static str,
    pub value: u32,
    pub length: u64,
}

impl FileChecksum {
    pub fn crc32(value: u32, length: u64) -> Self {
        Self {
            algorithm: CHECKSUM_ALGORITHM,
            value,
            length,
        }
    }
}

/// Compute a crc32 fingerprint over the whole file at `path`.
///
/// Read errors are returned as-is; the caller decides whether they mean
/// "corrupt destination, recopy" or a hard failure.
pub fn crc32_of_file(path: &Path) -> std::io::Result<FileChecksum> {
    let mut f = OpenOptions::new().read(true).open(path)?;

    let mut hasher = Crc32::new();
    let mut length: u64 = 0;
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        length += n as u64;
    }

    Ok(FileChecksum::crc32(hasher.finalize(), length))
}
