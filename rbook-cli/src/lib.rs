//! Command-line interface for RBook, the rally book generator.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

mod error;
mod render;

pub use error::CliError;

use render::RenderArgs;

const ARG_RENDER_CONFIG: &str = "config";
const ARG_RENDER_OUTPUT: &str = "output";
const ARG_RENDER_GPX: &str = "gpx";
const ARG_RENDER_DATABASE: &str = "database";
const ENV_RENDER_DATABASE: &str = "RBOOK_CMDS_RENDER_DATABASE";
const DEFAULT_BOOK_CONFIG: &str = "rbook.yml";
const DEFAULT_DOCUMENT: &str = "output.html";

/// Run the RBook CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments are invalid or the book cannot be
/// rendered.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose);
    match cli.command {
        Command::Render(args) => {
            render::run_render(args)?;
        }
    }
    Ok(())
}

/// Send `log` records and tracing events to stderr.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    if let Err(err) = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        log::debug!("logging already initialised: {err}");
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "rbook",
    about = "Generate a printable rally book from a rally database",
    version
)]
struct Cli {
    /// Log progress at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the rally book and optional GPX file.
    Render(RenderArgs),
}

#[cfg(test)]
mod tests;
