//! `metadata` subcommand: render an archive's metadata.

use crate::commands::common::{encode_archive_id, serve_to_output};
use crate::error::CliError;
use tilepack::service::TilePackService;

/// Build and serve the `/{archive}/metadata` request.
///
/// A callback implies JSON and takes precedence over `--json`.
pub fn run(
    service: &TilePackService,
    archive: &str,
    json: bool,
    callback: Option<&str>,
) -> Result<(), CliError> {
    let mut request = format!("/{}/metadata", encode_archive_id(archive));
    if let Some(callback) = callback {
        request.push_str("?callback=");
        request.push_str(callback);
    } else if json {
        request.push_str("?json");
    }
    serve_to_output(service, &request, None)
}
