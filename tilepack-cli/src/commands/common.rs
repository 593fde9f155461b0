//! Helpers shared by the subcommands.

use crate::error::CliError;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::io::Write;
use std::path::PathBuf;
use tilepack::service::{ServiceConfig, TilePackService};

/// Build the service for this invocation.
///
/// The temp directory defaults to the system temp dir when not given.
pub fn build_service(
    root: PathBuf,
    temp_dir: Option<PathBuf>,
) -> Result<TilePackService, CliError> {
    let temp_dir = temp_dir.unwrap_or_else(std::env::temp_dir);
    let config = ServiceConfig::new(root, temp_dir);
    TilePackService::new(config).map_err(CliError::ServiceCreation)
}

/// Percent-encode an archive path so it travels as one request segment.
pub fn encode_archive_id(archive: &str) -> String {
    utf8_percent_encode(archive, NON_ALPHANUMERIC).to_string()
}

/// Serve `request` and deliver the response bytes to `output` or stdout.
pub fn serve_to_output(
    service: &TilePackService,
    request: &str,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let response = service
        .open_request(request)
        .map_err(|error| CliError::Request {
            request: request.to_string(),
            error,
        })?;
    let bytes = std::fs::read(&response).map_err(|error| CliError::FileRead {
        path: response.display().to_string(),
        error,
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &bytes).map_err(|error| CliError::FileWrite {
                path: path.display().to_string(),
                error,
            })?;
            eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|_| stdout.flush())
                .map_err(|error| CliError::FileWrite {
                    path: "<stdout>".to_string(),
                    error,
                })?;
        }
    }
    Ok(())
}
