//! Archive accessor: one open connection to one tile archive.

use crate::archive::{ArchiveError, ImageFormat};
use regex::Regex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Pattern every tile coordinate string must match before a lookup runs.
fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]+$").unwrap())
}

/// One open connection to one tile archive.
///
/// Holds the archive's filesystem path, the connection state, and the
/// tile image format resolved lazily from the archive's own metadata on
/// first open. Accessors are owned exclusively by the
/// [`ArchiveRegistry`](crate::registry::ArchiveRegistry), which serializes
/// every open, close, and lookup under its lock.
pub struct ArchiveAccessor {
    /// Resolved filesystem path of the archive
    path: PathBuf,
    /// Open connection, `None` when closed
    conn: Option<Connection>,
    /// Tile image format, classified once on first successful open
    format: ImageFormat,
}

impl ArchiveAccessor {
    /// Create an accessor for the archive at `path`, without opening it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
            format: ImageFormat::Unset,
        }
    }

    /// Open the archive connection.
    ///
    /// No-op when already open. On the first successful open the archive's
    /// `format` metadata value is queried once to classify the stored tile
    /// image format.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::NoPath`] when no path is configured
    /// - [`ArchiveError::Sqlite`] when the file cannot be opened as a
    ///   SQLite database (missing, corrupt, or schema-less)
    pub fn open(&mut self, readonly: bool) -> Result<(), ArchiveError> {
        if self.conn.is_some() {
            return Ok(());
        }
        if self.path.as_os_str().is_empty() {
            return Err(ArchiveError::NoPath);
        }

        let flags = if readonly {
            OpenFlags::SQLITE_OPEN_READ_ONLY
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
        };
        let conn = Connection::open_with_flags(&self.path, flags)?;
        self.conn = Some(conn);

        if self.format == ImageFormat::Unset {
            match self.get_meta("format") {
                Ok(value) => {
                    self.format = ImageFormat::classify(value.as_deref());
                    debug!(archive = %self.path.display(), format = ?self.format, "classified tile format");
                }
                // No `format` row: the format stays unresolved.
                Err(ArchiveError::NotFound) => {}
                // The metadata table itself is broken: treat as open failure.
                Err(err) => {
                    self.close();
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Close the connection. Idempotent.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, err)) = conn.close() {
                debug!(archive = %self.path.display(), error = %err, "error closing archive connection");
            }
        }
    }

    /// Whether the connection is currently open.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// The archive's resolved filesystem path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The tile image format classified on first open.
    pub fn image_format(&self) -> ImageFormat {
        self.format
    }

    /// Fetch one tile blob by its coordinate strings.
    ///
    /// All three strings must match `^-?[0-9]+$`; anything else fails with
    /// [`ArchiveError::NotFound`] before any lookup executes. Coordinates
    /// are bound as text and compared under SQLite's numeric affinity, so
    /// `"07"` matches a stored zoom level of `7`.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::NotFound`] for malformed coordinates or a missing
    ///   tile row
    /// - [`ArchiveError::Closed`] when the connection is closed
    pub fn get_tile(&self, zoom: &str, column: &str, row: &str) -> Result<Vec<u8>, ArchiveError> {
        let pattern = integer_pattern();
        if !pattern.is_match(zoom) || !pattern.is_match(column) || !pattern.is_match(row) {
            return Err(ArchiveError::NotFound);
        }

        let conn = self.conn.as_ref().ok_or(ArchiveError::Closed)?;
        let mut stmt = conn.prepare_cached(
            "SELECT tile_data FROM tiles \
             WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
        )?;
        let blob = stmt
            .query_row(params![zoom, column, row], |r| r.get::<_, Vec<u8>>(0))
            .optional()?;
        blob.ok_or(ArchiveError::NotFound)
    }

    /// Fetch one metadata value by name.
    ///
    /// Returns `Ok(None)` when the row exists but stores SQL NULL.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::Closed`] when the connection is closed
    /// - [`ArchiveError::NotFound`] when the metadata table has no row for
    ///   `name`
    pub fn get_meta(&self, name: &str) -> Result<Option<String>, ArchiveError> {
        let conn = self.conn.as_ref().ok_or(ArchiveError::Closed)?;
        let mut stmt = conn.prepare_cached("SELECT value FROM metadata WHERE name = ?1")?;
        let row = stmt
            .query_row(params![name], |r| r.get::<_, Option<String>>(0))
            .optional()?;
        row.ok_or(ArchiveError::NotFound)
    }
}
