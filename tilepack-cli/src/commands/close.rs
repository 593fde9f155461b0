//! `close` subcommand: issue the close control operations.

use crate::commands::common::encode_archive_id;
use crate::error::CliError;
use tilepack::service::TilePackService;

/// Close one archive, or every archive with `--all`.
pub fn run(
    service: &TilePackService,
    archive: Option<&str>,
    all: bool,
) -> Result<(), CliError> {
    let request = match (archive, all) {
        (_, true) => "/?c=close".to_string(),
        (Some(archive), false) => format!("/{}?c=close", encode_archive_id(archive)),
        (None, false) => {
            return Err(CliError::Usage(
                "name an archive to close, or pass --all".to_string(),
            ))
        }
    };

    service
        .open_request(&request)
        .map_err(|error| CliError::Request { request, error })?;
    eprintln!("Closed");
    Ok(())
}
