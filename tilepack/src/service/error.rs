//! Boundary error type for dispatched requests.

use crate::archive::ArchiveError;
use crate::request::ResolveError;
use crate::spool::SpoolError;
use std::fmt;

/// Terminal failure of one request.
///
/// This is the whole caller-visible taxonomy: the requested content either
/// was not found (archive missing or unopenable, tile or metadata row
/// absent, close target absent, or an internal fault degraded to the same
/// answer) or the request path itself was unroutable. Causes are
/// distinguished in logs, not in the return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The addressed content does not exist or could not be produced
    NotFound,
    /// The request path's segment count is unroutable
    InvalidPath,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NotFound => write!(f, "Not found"),
            RequestError::InvalidPath => write!(f, "Invalid request path"),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<ArchiveError> for RequestError {
    fn from(_: ArchiveError) -> Self {
        RequestError::NotFound
    }
}

impl From<ResolveError> for RequestError {
    fn from(_: ResolveError) -> Self {
        RequestError::InvalidPath
    }
}

impl From<SpoolError> for RequestError {
    fn from(_: SpoolError) -> Self {
        RequestError::NotFound
    }
}
