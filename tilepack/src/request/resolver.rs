//! Path-to-operation resolution.

use crate::metadata::RenderMode;
use crate::request::QueryParams;
use std::fmt;

/// The reserved segment naming the all-metadata operation.
const METADATA_SEGMENT: &str = "metadata";

/// A typed operation resolved from a request path.
///
/// The variant is decided purely by segment count; no I/O happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Fetch one tile blob: `/{archive}/{zoom}/{column}/{row}[.{ext}]`.
    ///
    /// Coordinates are carried as raw strings; the archive accessor
    /// validates them against the integer pattern before any lookup.
    Tile {
        /// Percent-encoded archive identifier
        archive: String,
        /// Zoom level segment, unvalidated
        zoom: String,
        /// Tile column segment, unvalidated
        column: String,
        /// Tile row segment with any `.{ext}` suffix removed, unvalidated
        row: String,
    },
    /// Fetch every allow-listed metadata value: `/{archive}/metadata`.
    AllMetadata {
        /// Percent-encoded archive identifier
        archive: String,
        /// Wire format selected by the query parameters
        mode: RenderMode,
    },
    /// Fetch a single metadata value: `/{archive}/{key}`.
    ///
    /// The key is carried verbatim; the dispatcher rejects names outside
    /// the allow-list as a not-found condition.
    SingleMetadata {
        /// Percent-encoded archive identifier
        archive: String,
        /// Requested metadata key name, unchecked
        key: String,
        /// Wire format selected by the query parameters
        mode: RenderMode,
    },
    /// Control operation on one archive: `/{archive}[?c=close]`.
    CloseOne {
        /// Percent-encoded archive identifier
        archive: String,
        /// Whether the request actually asked to close (`c=close`)
        close: bool,
    },
    /// Control operation on every archive: `/[?c=close]`.
    CloseAll {
        /// Whether the request actually asked to close (`c=close`)
        close: bool,
    },
}

/// Error resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Segment count outside the routable set {0, 1, 2, 4}
    InvalidSegmentCount(usize),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::InvalidSegmentCount(count) => {
                write!(f, "Invalid request path: {} segments", count)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Select the metadata wire format from the query parameters.
///
/// A present `callback` parameter selects JSONP (the name is vetted later,
/// at render time); otherwise a present `json` parameter selects JSON;
/// otherwise plain text.
fn render_mode(query: &QueryParams) -> RenderMode {
    if let Some(callback) = query.get("callback") {
        RenderMode::Jsonp(callback.to_string())
    } else if query.contains("json") {
        RenderMode::Json
    } else {
        RenderMode::Text
    }
}

/// Whether the request's `c` parameter asks for a close.
fn close_requested(query: &QueryParams) -> bool {
    query.get("c") == Some("close")
}

/// Resolve non-empty path segments and query parameters into an operation.
///
/// # Arguments
///
/// * `segments` - Path segments with empty segments already dropped
/// * `query` - Query parameter lookup for the request
///
/// # Errors
///
/// Returns [`ResolveError::InvalidSegmentCount`] when the segment count is
/// outside the routable set {0, 1, 2, 4}.
pub fn resolve(segments: &[&str], query: &QueryParams) -> Result<Operation, ResolveError> {
    match segments {
        [archive, zoom, column, row_ext] => {
            // Row index runs up to the first `.`; the extension is cosmetic.
            let row = match row_ext.find('.') {
                Some(dot) => &row_ext[..dot],
                None => *row_ext,
            };
            Ok(Operation::Tile {
                archive: archive.to_string(),
                zoom: zoom.to_string(),
                column: column.to_string(),
                row: row.to_string(),
            })
        }
        [archive, key] if *key == METADATA_SEGMENT => Ok(Operation::AllMetadata {
            archive: archive.to_string(),
            mode: render_mode(query),
        }),
        [archive, key] => Ok(Operation::SingleMetadata {
            archive: archive.to_string(),
            key: key.to_string(),
            mode: render_mode(query),
        }),
        [archive] => Ok(Operation::CloseOne {
            archive: archive.to_string(),
            close: close_requested(query),
        }),
        [] => Ok(Operation::CloseAll {
            close: close_requested(query),
        }),
        _ => Err(ResolveError::InvalidSegmentCount(segments.len())),
    }
}

/// Resolve a full request string (path plus optional `?query`).
///
/// Splits the request at the first `?`, drops empty path segments, and
/// routes through [`resolve`].
///
/// # Example
///
/// ```
/// use tilepack::request::{resolve_request, Operation};
///
/// let op = resolve_request("/world.mbtiles/3/4/5.png").unwrap();
/// assert_eq!(
///     op,
///     Operation::Tile {
///         archive: "world.mbtiles".to_string(),
///         zoom: "3".to_string(),
///         column: "4".to_string(),
///         row: "5".to_string(),
///     }
/// );
/// ```
pub fn resolve_request(request: &str) -> Result<Operation, ResolveError> {
    let (path, query) = match request.split_once('?') {
        Some((path, query)) => (path, QueryParams::parse(query)),
        None => (request, QueryParams::empty()),
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    resolve(&segments, &query)
}
