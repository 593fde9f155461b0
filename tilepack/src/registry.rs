//! Process-wide cache of open archive accessors.
//!
//! The registry maps archive identifiers (the raw, still percent-encoded
//! path segment) to open [`ArchiveAccessor`]s. Entries persist across
//! requests as a warm cache until explicitly closed. An identifier whose
//! archive failed to open is recorded with a failed-open sentinel so the
//! broken archive is not reopened on every request.
//!
//! One mutex guards the whole map, and every accessor open, close, and
//! lookup runs while holding it. Two concurrent requests can therefore
//! never double-open the same archive or use an accessor mid-close; the
//! cost is that lookups serialize (correctness over query parallelism).

use crate::archive::{contained_path, ArchiveAccessor, ArchiveError};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Registry of open tile archives under one trusted root directory.
///
/// Owned by the dispatcher and passed by reference; never ambient global
/// state.
pub struct ArchiveRegistry {
    /// Trusted root directory all archive paths resolve under
    root: PathBuf,
    /// Archive id -> accessor, or `None` for a recorded open failure
    archives: Mutex<HashMap<String, Option<ArchiveAccessor>>>,
}

impl ArchiveRegistry {
    /// Create an empty registry rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            archives: Mutex::new(HashMap::new()),
        }
    }

    /// The trusted root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `f` against the accessor for `id`, opening it first if needed.
    ///
    /// The closure executes while the registry lock is held, so the
    /// accessor cannot be closed or evicted mid-use. A warm entry
    /// (including a recorded open failure) is returned as-is with no
    /// re-open attempt. On a miss the identifier is percent-decoded,
    /// resolved under the root via [`contained_path`], and opened; an open
    /// failure is recorded so subsequent requests fail fast.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::NotFound`] when the archive cannot be obtained (open
    /// failed now or previously, or the id does not decode), plus whatever
    /// `f` itself returns.
    pub fn with_archive<T>(
        &self,
        id: &str,
        readonly: bool,
        f: impl FnOnce(&mut ArchiveAccessor) -> Result<T, ArchiveError>,
    ) -> Result<T, ArchiveError> {
        let mut archives = self.archives.lock().unwrap();

        if !archives.contains_key(id) {
            let decoded = match percent_decode_str(id).decode_utf8() {
                Ok(decoded) => decoded.into_owned(),
                Err(err) => {
                    // Undecodable ids are rejected without being cached.
                    warn!(archive = id, error = %err, "archive id does not percent-decode");
                    return Err(ArchiveError::NotFound);
                }
            };
            let path = contained_path(&self.root, &decoded);
            let mut accessor = ArchiveAccessor::new(path);
            let entry = match accessor.open(readonly) {
                Ok(()) => {
                    debug!(archive = id, path = %accessor.path().display(), "opened tile archive");
                    Some(accessor)
                }
                Err(err) => {
                    warn!(archive = id, error = %err, "failed to open tile archive");
                    None
                }
            };
            archives.insert(id.to_string(), entry);
        }

        match archives.get_mut(id) {
            Some(Some(accessor)) => f(accessor),
            _ => Err(ArchiveError::NotFound),
        }
    }

    /// Close and evict the accessor for `id`.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::NotFound`] when `id` has no registry entry. A
    /// recorded open failure counts as an entry and evicts cleanly.
    pub fn close_one(&self, id: &str) -> Result<(), ArchiveError> {
        let mut archives = self.archives.lock().unwrap();
        match archives.remove(id) {
            Some(entry) => {
                if let Some(mut accessor) = entry {
                    accessor.close();
                }
                debug!(archive = id, "closed tile archive");
                Ok(())
            }
            None => Err(ArchiveError::NotFound),
        }
    }

    /// Close every live accessor and clear the map. Always succeeds.
    pub fn close_all(&self) {
        let mut archives = self.archives.lock().unwrap();
        for entry in archives.values_mut() {
            if let Some(accessor) = entry {
                accessor.close();
            }
        }
        archives.clear();
        debug!("closed all tile archives");
    }

    /// Number of registry entries, recorded open failures included.
    pub fn entry_count(&self) -> usize {
        self.archives.lock().unwrap().len()
    }
}
