//! Request path parsing and routing.
//!
//! A request addresses content in a tile archive with a hierarchical path
//! plus optional query parameters:
//!
//! ```text
//! /{archive}/{zoom}/{column}/{row}[.{ext}]       -> tile bytes
//! /{archive}/metadata[?json|?callback=NAME]      -> all allow-listed metadata
//! /{archive}/{metaKey}[?json|?callback=NAME]     -> one metadata value
//! /{archive}[?c=close]                           -> close one archive
//! /[?c=close]                                    -> close all archives
//! ```
//!
//! Routing is decided purely by segment count (empty segments from
//! consecutive separators are dropped). Tile coordinates stay unvalidated
//! strings here; the archive accessor enforces the integer pattern before
//! any lookup runs.

mod query;
mod resolver;

pub use query::QueryParams;
pub use resolver::{resolve, resolve_request, Operation, ResolveError};
