use anyhow::{Context, Result};
use std::path::PathBuf;

use SnapVault::retention::list_old_snapshots;
use SnapVault::LocalFsRepository;

/// List timestamped snapshot directories, newest first.
pub fn exec(location: PathBuf, json: bool) -> Result<()> {
    let repo = LocalFsRepository::new();
    let dirs = list_old_snapshots(&repo, &location)
        .with_context(|| format!("list snapshots at {}", location.display()))?;

    if json {
        let names: Vec<&str> = dirs.iter().map(|d| d.name.as_str()).collect();
        println!("{}", serde_json::to_string(&names)?);
        return Ok(());
    }
    if dirs.is_empty() {
        println!("(no snapshots)");
        return Ok(());
    }
    for d in dirs {
        println!("{}  {}", d.timestamp, d.name);
    }
    Ok(())
}
