//! Error taxonomy for document assembly.
//!
//! [`AssembleError`] stops the run. [`StreamError`] abandons one stream and
//! the run moves on to the next section. [`RowError`] drops one record and
//! the stream moves on to the next row.

use std::error::Error as StdError;

use camino::Utf8PathBuf;
use rbook_core::{ComboError, CoordinateError};
use thiserror::Error;

use crate::template::TemplateLoadError;
use crate::waypoints::GpxWriteError;

/// Boxed error from a record source.
pub type SourceError = Box<dyn StdError + Send + Sync + 'static>;

/// Failures that stop the whole run.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// An output file could not be created.
    #[error("failed to create {path}: {source}")]
    CreateOutput {
        /// Output file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Writing the document failed.
    #[error("failed to write the rally book: {0}")]
    Write(#[from] std::io::Error),
    /// A template exists but could not be loaded.
    #[error(transparent)]
    Template(#[from] TemplateLoadError),
    /// The GPX document could not be written.
    #[error(transparent)]
    Gpx(#[from] GpxWriteError),
}

/// Failures that abandon one stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The stream's template file does not exist.
    #[error("stream '{stream}' has no template {path}")]
    MissingTemplate {
        /// Stream identifier.
        stream: String,
        /// Expected template path.
        path: Utf8PathBuf,
    },
    /// The stream's query failed.
    #[error("stream '{stream}' query failed: {source}")]
    Query {
        /// Stream identifier.
        stream: String,
        /// Error reported by the record source.
        #[source]
        source: SourceError,
    },
    /// Bonus descriptions for combination constituents could not be read.
    #[error("stream '{stream}' could not read bonus titles: {source}")]
    Titles {
        /// Stream identifier.
        stream: String,
        /// Error reported by the record source.
        #[source]
        source: SourceError,
    },
}

/// Failures that drop one record.
#[derive(Debug, Error)]
pub enum RowError {
    /// The row did not match the column contract.
    #[error("stream '{stream}' row {index} skipped: {source}")]
    Scan {
        /// Stream identifier.
        stream: String,
        /// Zero-based row position.
        index: usize,
        /// Error reported by the record source.
        #[source]
        source: SourceError,
    },
    /// A combination's score table could not be expanded.
    #[error("stream '{stream}' combination {record} skipped: {source}")]
    Combo {
        /// Stream identifier.
        stream: String,
        /// Combination code.
        record: String,
        /// Expansion failure.
        #[source]
        source: ComboError,
    },
    /// The template failed while rendering the record.
    #[error("stream '{stream}' record {record} failed to render: {source}")]
    Render {
        /// Stream identifier.
        stream: String,
        /// Record identifier.
        record: String,
        /// Error reported by Handlebars.
        #[source]
        source: Box<handlebars::RenderError>,
    },
    /// A bonus's coordinates did not parse; the record renders without a
    /// location and no waypoint is written.
    #[error("stream '{stream}' bonus {record} has unusable coordinates {text:?}: {source}")]
    Coordinates {
        /// Stream identifier.
        stream: String,
        /// Bonus code.
        record: String,
        /// The coordinate text as stored.
        text: String,
        /// Parse failure.
        #[source]
        source: CoordinateError,
    },
}
