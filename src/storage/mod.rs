//! Leaderboard persistence: the whole registry as one JSON array.
//!
//! Saves are atomic (temp file + rename). Loads never fail: a missing file means no players yet,
//! and an unreadable one is logged and replaced by an empty registry.

mod error;

pub use error::{PersistenceError, Result};

use crate::models::{PlayerRecord, PlayerRegistry, PlayerSnapshot};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Write every player, in ascending name order, to `path`.
///
/// The JSON goes to a sibling `.tmp` file first and is renamed over `path` once it is synced,
/// so a failed save leaves the previous file untouched.
pub fn save(registry: &PlayerRegistry, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let records: Vec<&PlayerRecord> = registry.inorder();
    let json = serde_json::to_string_pretty(&records)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let written = write_synced(&tmp, json.as_bytes()).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    log::debug!("Saved {} player(s) to {}", records.len(), path.display());
    Ok(())
}

/// Read the leaderboard at `path`, surfacing any problem as an error.
///
/// A missing file yields an empty registry. Records are inserted in file order; a record whose
/// counters contradict each other, or a name listed twice, is reported as corruption.
pub fn try_load<S: AsRef<str>>(
    path: impl AsRef<Path>,
    categories: &[S],
) -> Result<PlayerRegistry> {
    let path = path.as_ref();
    let mut registry = PlayerRegistry::new(categories);

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No leaderboard at {}; starting empty", path.display());
            return Ok(registry);
        }
        Err(e) => return Err(e.into()),
    };

    let snapshots: Vec<PlayerSnapshot> = serde_json::from_str(&text)?;
    for snapshot in snapshots {
        let record = PlayerRecord::from_snapshot(snapshot, categories);
        record.check_stats().map_err(PersistenceError::corruption)?;
        registry
            .create(record)
            .map_err(|e| PersistenceError::corruption(e.to_string()))?;
    }
    Ok(registry)
}

/// Read the leaderboard at `path`. Unreadable or malformed files are logged and replaced by an
/// empty registry instead of failing startup.
pub fn load<S: AsRef<str>>(path: impl AsRef<Path>, categories: &[S]) -> PlayerRegistry {
    let path = path.as_ref();
    match try_load(path, categories) {
        Ok(registry) => {
            log::info!("Loaded {} player(s) from {}", registry.len(), path.display());
            registry
        }
        Err(e) => {
            log::warn!(
                "Discarding leaderboard {}: {}. Starting with an empty registry",
                path.display(),
                e
            );
            PlayerRegistry::new(categories)
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}
