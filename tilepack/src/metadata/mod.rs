//! Archive metadata keys and response rendering.
//!
//! Tile archives carry a `metadata` table of name/value pairs. Only a fixed
//! allow-list of well-known keys is ever served; requests for any other key
//! are treated as not found. A metadata response renders in one of three
//! wire formats selected by the request's query parameters:
//!
//! - plain text (tab-separated `key\tvalue` lines, the default)
//! - a flat JSON object (`json` parameter present)
//! - JSONP (`callback=NAME` parameter present, name validated before use)

mod key;
mod render;

pub use key::MetadataKey;
pub use render::{render, valid_callback_name, MetadataSet, RenderMode};
