//! Service configuration.

use crate::spool::DEFAULT_MAX_FILES;
use std::path::PathBuf;

/// Configuration for a [`TilePackService`](crate::service::TilePackService).
///
/// The hosting environment supplies two locations at construction: the
/// trusted root directory archives resolve under, and the directory where
/// response files are materialized.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Trusted root directory containing tile archives
    pub root_dir: PathBuf,
    /// Directory for materialized response files
    pub temp_dir: PathBuf,
    /// Name of the service's temp file pool subdirectory
    pub pool_name: String,
    /// Slot count of the rotating temp file pool
    pub max_temp_files: usize,
    /// Whether archives open read-only
    pub readonly: bool,
}

impl ServiceConfig {
    /// Create a configuration with the two required directories.
    pub fn new(root_dir: impl Into<PathBuf>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            temp_dir: temp_dir.into(),
            pool_name: "tilepack".to_string(),
            max_temp_files: DEFAULT_MAX_FILES,
            readonly: true,
        }
    }

    /// Set the temp file pool's slot count.
    pub fn with_max_temp_files(mut self, max_temp_files: usize) -> Self {
        self.max_temp_files = max_temp_files;
        self
    }

    /// Set the temp file pool's subdirectory name.
    pub fn with_pool_name(mut self, pool_name: impl Into<String>) -> Self {
        self.pool_name = pool_name.into();
        self
    }

    /// Open archives read-write instead of read-only.
    ///
    /// Only read lookups are ever issued; this exists for hosts that share
    /// the connection with a writer.
    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }
}
