//! Savedata file handling
//!
//! The engine's identity and contact state is an opaque byte blob. It is read
//! once at startup and written back at checkpoints. A checkpoint writes
//! `<path>.tmp` and renames it over `<path>`, so the file on disk is always
//! either the previous complete snapshot or the new complete snapshot.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to rename '{}' to '{}': {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of a checkpoint attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Snapshot written and renamed into place
    Saved { bytes: usize },

    /// Nothing to write; any existing file is left untouched
    SkippedEmpty,

    /// Write or rename failed; the next checkpoint tries again
    Failed,
}

/// Path of the temporary file used while writing `path`
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Load savedata written by a previous run
///
/// Returns `None` when there is no usable prior state (missing, unreadable or
/// empty file). That is the normal first-run case, not an error.
pub fn load_savedata(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(data) if !data.is_empty() => {
            info!("loaded savedata: {} ({} bytes)", path.display(), data.len());
            Some(data)
        }
        Ok(_) => {
            info!("no savedata found, starting fresh (empty file {})", path.display());
            None
        }
        Err(e) => {
            info!("no savedata found, starting fresh ({})", e);
            None
        }
    }
}

/// Write `data` to `path` via a temporary file and an atomic rename
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), PersistenceError> {
    let tmp = temp_path(path);

    if let Err(source) = write_private(&tmp, data) {
        let _ = fs::remove_file(&tmp);
        return Err(PersistenceError::Write { path: tmp, source });
    }

    if let Err(source) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(PersistenceError::Rename {
            from: tmp,
            to: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

/// Checkpoint the engine state, logging instead of failing
pub fn save_savedata(path: &Path, data: &[u8]) -> SaveOutcome {
    if data.is_empty() {
        warn!("save skipped: empty savedata");
        return SaveOutcome::SkippedEmpty;
    }

    match write_atomic(path, data) {
        Ok(()) => {
            info!("saved: {} ({} bytes)", path.display(), data.len());
            SaveOutcome::Saved { bytes: data.len() }
        }
        Err(e) => {
            warn!("save failed: {}", e);
            SaveOutcome::Failed
        }
    }
}

/// Create (or truncate) a file readable only by the owner and fill it
fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()
}
