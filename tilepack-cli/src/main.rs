//! TilePack CLI - Command-line interface
//!
//! This binary provides a command-line interface to the TilePack library:
//! it serves request paths against a root directory of tile archives and
//! writes the response bytes to stdout or a file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "tilepack")]
#[command(version = tilepack::VERSION)]
#[command(about = "Serve tiles and metadata from SQLite tile archives", long_about = None)]
struct Cli {
    /// Root directory containing tile archives
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Directory for materialized response files (default: system temp dir)
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Log at debug level instead of warnings only
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve one request path and write the response bytes
    Fetch {
        /// Request path, e.g. "/world.mbtiles/3/4/5.png"
        request: String,

        /// Write the response to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Render an archive's metadata
    Metadata {
        /// Archive path relative to the root directory
        archive: String,

        /// Render a flat JSON object instead of text lines
        #[arg(long)]
        json: bool,

        /// Wrap the JSON object in a callback invocation
        #[arg(long)]
        callback: Option<String>,
    },
    /// Issue a close control operation
    Close {
        /// Archive path relative to the root directory
        archive: Option<String>,

        /// Close every open archive instead of one
        #[arg(long)]
        all: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let _guard = match tilepack::logging::init_logging(
        tilepack::logging::default_log_dir(),
        tilepack::logging::default_log_file(),
        default_filter,
    ) {
        Ok(guard) => guard,
        Err(err) => CliError::LoggingInit(err.to_string()).exit(),
    };

    if let Err(err) = run(cli) {
        err.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let service = commands::common::build_service(cli.root, cli.temp_dir)?;

    match cli.command {
        Command::Fetch { request, output } => commands::fetch::run(&service, &request, output),
        Command::Metadata {
            archive,
            json,
            callback,
        } => commands::metadata::run(&service, &archive, json, callback.as_deref()),
        Command::Close { archive, all } => commands::close::run(&service, archive.as_deref(), all),
    }
}
