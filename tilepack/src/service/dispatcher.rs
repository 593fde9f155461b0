//! Per-request orchestration.

use crate::archive::{ArchiveAccessor, ArchiveError};
use crate::metadata::{render, MetadataKey, MetadataSet};
use crate::registry::ArchiveRegistry;
use crate::request::{resolve_request, Operation};
use crate::service::{RequestError, ServiceConfig};
use crate::spool::{SpoolError, TempFilePool};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// The tile serving service.
///
/// Holds the only persistent state of the system: the archive registry
/// (warm cache of open archives) and the temp file pool. Each request is
/// otherwise stateless. Safe to call from multiple threads; the registry
/// mutex serializes all archive access, and every call blocks its thread
/// until the request completes or fails.
pub struct TilePackService {
    registry: ArchiveRegistry,
    pool: TempFilePool,
    readonly: bool,
}

impl TilePackService {
    /// Create a service from its configuration.
    ///
    /// Creates the temp file pool directory and discards any response
    /// files left behind by a prior process lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`SpoolError`] when the pool directory cannot be prepared.
    pub fn new(config: ServiceConfig) -> Result<Self, SpoolError> {
        let pool = TempFilePool::new(&config.temp_dir, &config.pool_name)?
            .with_max_files(config.max_temp_files);
        info!(
            root = %config.root_dir.display(),
            pool = %pool.directory().display(),
            "tile pack service ready"
        );
        Ok(Self {
            registry: ArchiveRegistry::new(config.root_dir),
            pool,
            readonly: config.readonly,
        })
    }

    /// Serve one request path, returning the materialized response file.
    ///
    /// Resolves the path into an operation, obtains (lazily opening) the
    /// archive where one is named, executes the lookup or control step,
    /// and spools the resulting bytes (empty for control operations) into
    /// the rotating pool.
    ///
    /// # Errors
    ///
    /// - [`RequestError::InvalidPath`] for an unroutable segment count
    /// - [`RequestError::NotFound`] for everything else that fails: the
    ///   archive is missing or unopenable, the tile or metadata row is
    ///   absent, the metadata key is not allow-listed, a close target has
    ///   no entry, or the response file could not be written. There are no
    ///   partial responses.
    pub fn open_request(&self, request: &str) -> Result<PathBuf, RequestError> {
        let operation = resolve_request(request)?;
        debug!(request, ?operation, "dispatching request");

        let bytes = match operation {
            Operation::Tile {
                archive,
                zoom,
                column,
                row,
            } => self.registry.with_archive(&archive, self.readonly, |acc| {
                acc.get_tile(&zoom, &column, &row)
            })?,
            Operation::AllMetadata { archive, mode } => {
                let set = self
                    .registry
                    .with_archive(&archive, self.readonly, collect_metadata)?;
                render(&set, &mode).into_bytes()
            }
            Operation::SingleMetadata { archive, key, mode } => {
                let key = MetadataKey::from_name(&key).ok_or(RequestError::NotFound)?;
                let value = self
                    .registry
                    .with_archive(&archive, self.readonly, |acc| acc.get_meta(key.name()))?;
                let mut set = MetadataSet::new();
                set.insert(key, value);
                render(&set, &mode).into_bytes()
            }
            Operation::CloseOne { archive, close } => {
                if close {
                    self.registry.close_one(&archive)?;
                }
                Vec::new()
            }
            Operation::CloseAll { close } => {
                if close {
                    self.registry.close_all();
                }
                Vec::new()
            }
        };

        self.pool.add(&bytes).map_err(|err| {
            warn!(request, error = %err, "failed to materialize response");
            err.into()
        })
    }

    /// Low-resource signal from the hosting environment.
    ///
    /// Forcibly closes and evicts every archive and clears the temp file
    /// pool. Eviction takes the registry lock, so it cannot interrupt a
    /// lookup mid-query; it can, however, delete response files a slow
    /// consumer has not finished reading.
    pub fn on_low_memory(&self) {
        info!("low memory: closing all archives and clearing the temp pool");
        self.registry.close_all();
        if let Err(err) = self.pool.clear() {
            warn!(error = %err, "failed to clear temp file pool");
        }
    }

    /// Number of archive registry entries (recorded failures included).
    pub fn archive_count(&self) -> usize {
        self.registry.entry_count()
    }
}

/// Assemble the metadata set served by an all-metadata request.
///
/// Queries every allow-listed key; keys with no row are omitted, rows
/// holding SQL NULL are kept as null values. The set is built fresh per
/// request and never cached.
fn collect_metadata(accessor: &mut ArchiveAccessor) -> Result<MetadataSet, ArchiveError> {
    let mut set = MetadataSet::new();
    for key in MetadataKey::ALL {
        match accessor.get_meta(key.name()) {
            Ok(value) => {
                set.insert(key, value);
            }
            Err(ArchiveError::NotFound) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_archive(dir: &Path, name: &str) {
        let conn = Connection::open(dir.join(name)).unwrap();
        conn.execute_batch(
            "CREATE TABLE metadata (name TEXT, value TEXT);
             CREATE TABLE tiles (
                 zoom_level INTEGER, tile_column INTEGER,
                 tile_row INTEGER, tile_data BLOB
             );
             INSERT INTO metadata VALUES ('name', 'Test');
             INSERT INTO metadata VALUES ('version', '1');
             INSERT INTO metadata VALUES ('format', 'png');
             INSERT INTO tiles VALUES (3, 4, 5, x'89504e47');",
        )
        .unwrap();
    }

    fn service(root: &TempDir, temp: &TempDir) -> TilePackService {
        TilePackService::new(ServiceConfig::new(root.path(), temp.path())).unwrap()
    }

    #[test]
    fn test_tile_request_materializes_blob() {
        let root = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        create_archive(root.path(), "a.mbtiles");
        let service = service(&root, &temp);

        let path = service.open_request("/a.mbtiles/3/4/5.png").unwrap();

        assert_eq!(std::fs::read(path).unwrap(), vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[test]
    fn test_unknown_metadata_key_is_not_found_without_opening() {
        let root = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        create_archive(root.path(), "a.mbtiles");
        let service = service(&root, &temp);

        let err = service.open_request("/a.mbtiles/secret").unwrap_err();

        assert_eq!(err, RequestError::NotFound);
        // The allow-list check fires before any archive is touched.
        assert_eq!(service.archive_count(), 0);
    }

    #[test]
    fn test_invalid_segment_count_is_invalid_path() {
        let root = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let service = service(&root, &temp);

        assert_eq!(
            service.open_request("/a/b/c").unwrap_err(),
            RequestError::InvalidPath
        );
    }

    #[test]
    fn test_control_operations_materialize_empty_payload() {
        let root = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        create_archive(root.path(), "a.mbtiles");
        let service = service(&root, &temp);

        service.open_request("/a.mbtiles/3/4/5").unwrap();
        let path = service.open_request("/a.mbtiles?c=close").unwrap();

        assert_eq!(std::fs::read(path).unwrap().len(), 0);
        assert_eq!(service.archive_count(), 0);
    }

    #[test]
    fn test_one_segment_without_close_param_is_noop_success() {
        let root = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let service = service(&root, &temp);

        // No close requested: succeeds even though nothing is open.
        let path = service.open_request("/a.mbtiles").unwrap();
        assert_eq!(std::fs::read(path).unwrap().len(), 0);
    }

    #[test]
    fn test_collect_metadata_skips_missing_keys() {
        let root = TempDir::new().unwrap();
        create_archive(root.path(), "a.mbtiles");
        let mut accessor = ArchiveAccessor::new(root.path().join("a.mbtiles"));
        accessor.open(true).unwrap();

        let set = collect_metadata(&mut accessor).unwrap();

        assert_eq!(set.len(), 3);
        assert!(set.contains_key(&MetadataKey::Name));
        assert!(set.contains_key(&MetadataKey::Version));
        assert!(set.contains_key(&MetadataKey::Format));
        assert!(!set.contains_key(&MetadataKey::Bounds));
    }

    #[test]
    fn test_on_low_memory_evicts_archives_and_clears_pool() {
        let root = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        create_archive(root.path(), "a.mbtiles");
        let service = service(&root, &temp);

        let response = service.open_request("/a.mbtiles/3/4/5").unwrap();
        assert!(response.exists());

        service.on_low_memory();

        assert_eq!(service.archive_count(), 0);
        assert!(!response.exists());
    }
}
