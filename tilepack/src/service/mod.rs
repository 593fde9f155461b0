//! High-level tile serving facade.
//!
//! [`TilePackService`] composes the request resolver, the archive
//! registry, the metadata renderer, and the temp file pool into the single
//! entry point a hosting environment calls per request: hand it a request
//! path, get back the path of a materialized file holding the response
//! bytes.
//!
//! # Example
//!
//! ```ignore
//! use tilepack::service::{ServiceConfig, TilePackService};
//!
//! let config = ServiceConfig::new("/data/tiles", "/data/tmp");
//! let service = TilePackService::new(config)?;
//!
//! let tile = service.open_request("/world.mbtiles/3/4/5.png")?;
//! let meta = service.open_request("/world.mbtiles/metadata?json")?;
//! ```

mod config;
mod dispatcher;
mod error;

pub use config::ServiceConfig;
pub use dispatcher::TilePackService;
pub use error::RequestError;
