//! Error types emitted by the RBook CLI.
//!
//! Keep this error type reasonably small, as CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use rbook_core::ConfigError;
use rbook_data::SqliteRecordSourceError;
use rbook_render::AssembleError;
use thiserror::Error;

/// Errors emitted by the RBook CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Option layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after layering.
    #[error("missing {field} (set --{field}, {env} or the book configuration)")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable carrying the option.
        env: &'static str,
    },
    /// The book configuration file could not be read.
    #[error("failed to read book configuration {path}: {source}")]
    ReadBookConfig {
        /// Configuration file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The book configuration did not parse or validate.
    #[error("invalid book configuration {path}: {source}")]
    ParseBookConfig {
        /// Configuration file path.
        path: Utf8PathBuf,
        /// Parse or validation failure.
        #[source]
        source: Box<ConfigError>,
    },
    /// The rally database could not be opened.
    #[error(transparent)]
    OpenDatabase(#[from] SqliteRecordSourceError),
    /// Writing the rally book failed.
    #[error(transparent)]
    Assemble(#[from] AssembleError),
}
