//! TilePack - Tile and metadata serving from SQLite tile archives
//!
//! This library serves map tiles and metadata stored in SQLite-backed tile
//! packages ("tile archives"). Clients address content with a hierarchical
//! request path (`/{archive}/{zoom}/{column}/{row}` or
//! `/{archive}/{metadata-key}`) and receive back the path of a freshly
//! materialized file containing the response bytes.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use tilepack::service::{ServiceConfig, TilePackService};
//!
//! let config = ServiceConfig::new("/data/tiles", "/data/tmp");
//! let service = TilePackService::new(config)?;
//!
//! // Fetch a tile; the response is the path of a materialized temp file.
//! let path = service.open_request("/world.mbtiles/3/4/5.png")?;
//! let bytes = std::fs::read(path)?;
//! ```

pub mod archive;
pub mod logging;
pub mod metadata;
pub mod registry;
pub mod request;
pub mod service;
pub mod spool;

/// Version of the TilePack library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
