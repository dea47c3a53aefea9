//! Rally book rendering for RBook.
//!
//! Responsibilities:
//! - Load Handlebars templates from the project folder.
//! - Walk the configured sections and lay stream records out on pages.
//! - Collect bonus waypoints and write the companion GPX file.
//!
//! Boundaries:
//! - Records come through [`rbook_core::RecordSource`]; this crate never
//!   opens a database.
//!
//! Invariants:
//! - The document is written front to back in one pass.
//! - A failed stream or row is logged and skipped; only output and template
//!   loading failures stop the run.

#![forbid(unsafe_code)]

pub mod assemble;
pub mod document;
pub mod error;
pub mod template;
pub mod waypoints;

pub use assemble::{
    Assembled, AssemblyReport, DocumentAssembler, OutputTargets, StreamReport, render_book,
};
pub use document::{document_head, padding};
pub use error::{AssembleError, RowError, SourceError, StreamError};
pub use template::{TemplateLoadError, TemplateRenderer};
pub use waypoints::{GpxWaypointWriter, GpxWriteError};
