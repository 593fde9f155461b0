//! `fetch` subcommand: serve one raw request path.

use crate::commands::common::serve_to_output;
use crate::error::CliError;
use std::path::PathBuf;
use tilepack::service::TilePackService;

/// Serve `request` verbatim and write the response bytes out.
pub fn run(
    service: &TilePackService,
    request: &str,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    serve_to_output(service, request, output)
}
