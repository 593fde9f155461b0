//! Archive error types.

use thiserror::Error;

/// Errors raised by archive open and lookup operations.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The requested tile row or metadata row does not exist
    #[error("Tile archive row not found")]
    NotFound,

    /// The accessor has no filesystem path configured
    #[error("Tile archive has no path configured")]
    NoPath,

    /// The accessor's connection is closed
    #[error("Tile archive connection is closed")]
    Closed,

    /// Underlying SQLite failure
    #[error("Tile archive database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found() {
        assert_eq!(ArchiveError::NotFound.to_string(), "Tile archive row not found");
    }

    #[test]
    fn test_display_no_path() {
        assert!(ArchiveError::NoPath.to_string().contains("no path"));
    }

    #[test]
    fn test_sqlite_error_wraps_source() {
        let err = ArchiveError::from(rusqlite::Error::InvalidQuery);
        assert!(err.to_string().contains("database error"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
