//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use tilepack::service::RequestError;
use tilepack::spool::SpoolError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid command-line usage
    Usage(String),
    /// Failed to create the service
    ServiceCreation(SpoolError),
    /// A request failed at the dispatcher boundary
    Request {
        request: String,
        error: RequestError,
    },
    /// Failed to read a materialized response file
    FileRead {
        path: String,
        error: std::io::Error,
    },
    /// Failed to write the output file
    FileWrite {
        path: String,
        error: std::io::Error,
    },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Request {
                error: RequestError::NotFound,
                ..
            } => {
                eprintln!();
                eprintln!("Not found can mean any of:");
                eprintln!("  1. The archive does not exist under --root (the path is relative)");
                eprintln!("  2. The tile coordinates are not plain integers or have no row");
                eprintln!("  3. The metadata key is not one of the served keys");
            }
            CliError::Request {
                error: RequestError::InvalidPath,
                ..
            } => {
                eprintln!();
                eprintln!("Request paths take one of these forms:");
                eprintln!("  /{{archive}}/{{zoom}}/{{column}}/{{row}}[.ext]");
                eprintln!("  /{{archive}}/metadata");
                eprintln!("  /{{archive}}/{{metadata-key}}");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Usage(msg) => write!(f, "Invalid usage: {}", msg),
            CliError::ServiceCreation(e) => write!(f, "Failed to create service: {}", e),
            CliError::Request { request, error } => {
                write!(f, "Request '{}' failed: {}", request, error)
            }
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read response file '{}': {}", path, error)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ServiceCreation(e) => Some(e),
            CliError::Request { error, .. } => Some(error),
            CliError::FileRead { error, .. } => Some(error),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}
