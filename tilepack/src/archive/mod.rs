//! Tile archive access.
//!
//! A tile archive is a SQLite database with the embedded tile schema: a
//! `tiles` table (`zoom_level`, `tile_column`, `tile_row`, `tile_data`)
//! and a `metadata` table (`name`, `value`). This module provides:
//!
//! - [`ArchiveAccessor`]: one open connection to one archive, with tile and
//!   metadata lookups
//! - [`contained_path`]: the containment rule anchoring requested archive
//!   paths under the trusted root directory
//! - [`ImageFormat`]: the stored tile image format, classified lazily from
//!   the archive's own metadata

mod accessor;
mod contain;
mod error;
mod format;

pub use accessor::ArchiveAccessor;
pub use contain::contained_path;
pub use error::ArchiveError;
pub use format::ImageFormat;
