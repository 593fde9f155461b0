//! Bounded rotating pool of materialized temp files.
//!
//! Every response is exposed to callers as the path of a real file, so
//! computed byte buffers are spooled to disk first. The pool keeps at most
//! `max_files` numbered files in its directory and rotates through the
//! slots with a monotonically advancing cursor, overwriting the slot's
//! previous occupant. There is no reference counting: a very slow consumer
//! can observe its slot being rewritten once the cursor wraps all the way
//! around, which the default 64 slots make unlikely for the intended
//! read-promptly local consumers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Default number of rotating slots in a pool.
pub const DEFAULT_MAX_FILES: usize = 64;

/// Subdirectory of the temp root holding all pools.
const SUBDIRECTORY_NAME: &str = "tmp";

/// Errors raised by temp file pool operations.
#[derive(Debug, Error)]
pub enum SpoolError {
    /// Filesystem failure while creating, writing, or clearing pool files
    #[error("Temp file pool I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A bounded rotating pool of numbered temp files.
///
/// Files live in `<temp_root>/tmp/<name>/` and are numbered `1` through
/// `max_files`. The pool directory is wiped at construction to discard
/// files from a prior process lifetime.
pub struct TempFilePool {
    /// Absolute pool directory
    dir: PathBuf,
    /// Slot count; the pool never holds more live files than this
    max_files: usize,
    /// Last slot written; the next write goes to `(cursor % max_files) + 1`
    cursor: Mutex<usize>,
}

impl TempFilePool {
    /// Create a pool named `name` under `temp_root`, clearing any files
    /// left behind by a previous process.
    ///
    /// # Errors
    ///
    /// Returns [`SpoolError::Io`] when the pool directory cannot be
    /// created or the leftover files cannot be listed.
    pub fn new(temp_root: &Path, name: &str) -> Result<Self, SpoolError> {
        let dir = temp_root.join(SUBDIRECTORY_NAME).join(name);
        fs::create_dir_all(&dir)?;
        let dir = fs::canonicalize(&dir)?;
        let pool = Self {
            dir,
            max_files: DEFAULT_MAX_FILES,
            cursor: Mutex::new(0),
        };
        pool.clear()?;
        Ok(pool)
    }

    /// Set the slot count (builder style). A pool needs at least one slot
    /// to rotate through.
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files.max(1);
        self
    }

    /// Materialize a byte buffer into the next rotating slot.
    ///
    /// Deletes the slot's previous occupant, writes the full buffer, and
    /// returns the absolute path of the new file. The cursor only advances
    /// on success, so a failed write leaves the rotation where it was.
    ///
    /// # Errors
    ///
    /// Returns [`SpoolError::Io`] when the file cannot be written; no
    /// usable path exists in that case.
    pub fn add(&self, content: &[u8]) -> Result<PathBuf, SpoolError> {
        let mut cursor = self.cursor.lock().unwrap();
        let slot = (*cursor % self.max_files) + 1;
        let path = self.dir.join(slot.to_string());
        if path.exists() {
            if let Err(err) = fs::remove_file(&path) {
                warn!(slot, error = %err, "could not delete previous slot occupant");
            }
        }
        fs::write(&path, content)?;
        *cursor = slot;
        debug!(slot, bytes = content.len(), "materialized response file");
        Ok(path)
    }

    /// Delete every file in the pool directory and reset the cursor.
    ///
    /// Runs once at construction and serves as the low-resource
    /// reclamation hook afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SpoolError::Io`] when the directory cannot be listed;
    /// individual deletions are best-effort.
    pub fn clear(&self) -> Result<(), SpoolError> {
        let mut cursor = self.cursor.lock().unwrap();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                if let Err(err) = fs::remove_file(entry.path()) {
                    warn!(path = %entry.path().display(), error = %err, "could not delete pool file");
                }
            }
        }
        *cursor = 0;
        Ok(())
    }

    /// The absolute pool directory.
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// The pool's slot count.
    pub fn max_files(&self) -> usize {
        self.max_files
    }
}
