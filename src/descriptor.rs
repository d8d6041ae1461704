//! Snapshot directory naming.
//!
//! Every snapshot lives in a directory named `snapshot.<name>` for named
//! requests or `snapshot.<yyyyMMddHHmmssSSS>` for anonymous ones. The
//! timestamp pattern is fixed and lexicographically sortable; retention
//! parses it back out of directory names and ignores anything that does not
//! match.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use std::path::PathBuf;

use crate::repo::Repository;

/// Prefix of every snapshot directory name.
pub const SNAPSHOT_PREFIX: &str = "snapshot.";

/// Fixed timestamp pattern for anonymous snapshot names (millisecond
/// precision, 17 digits).
pub const TIMESTAMP_FMT: &str = "%Y%m%d%H%M%S%3f";

/// Immutable per-request naming: directory name plus resolved location.
#[derive(Debug, Clone)]
pub struct SnapshotDescriptor {
    pub directory_name: String,
    pub location: PathBuf,
}

impl SnapshotDescriptor {
    /// Compute the snapshot directory name and its location under `base`.
    /// Anonymous requests get a wall-clock derived name.
    pub fn derive(
        repo: &dyn Repository,
        base: &std::path::Path,
        name: Option<&str>,
    ) -> SnapshotDescriptor {
        let directory_name = match name {
            Some(n) => format!("{}{}", SNAPSHOT_PREFIX, n),
            None => format!(
                "{}{}",
                SNAPSHOT_PREFIX,
                Utc::now().naive_utc().format(TIMESTAMP_FMT)
            ),
        };
        let location = repo.resolve(base, &directory_name);
        SnapshotDescriptor {
            directory_name,
            location,
        }
    }
}

/// Recover the timestamp embedded in a snapshot directory name.
///
/// Only `snapshot.` + exactly 17 digits qualifies; everything else (named
/// snapshots included) returns None and is opaque to retention.
pub fn parse_timestamp(directory_name: &str) -> Option<NaiveDateTime> {
    let digits = directory_name.strip_prefix(SNAPSHOT_PREFIX)?;
    if digits.len() != 17 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let num = |s: &str| s.parse::<u32>().ok();
    let date = NaiveDate::from_ymd_opt(
        digits[0..4].parse::<i32>().ok()?,
        num(&digits[4..6])?,
        num(&digits[6..8])?,
    )?;
    date.and_hms_milli_opt(
        num(&digits[8..10])?,
        num(&digits[10..12])?,
        num(&digits[12..14])?,
        num(&digits[14..17])?,
    )
}
