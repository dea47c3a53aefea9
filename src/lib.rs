//! Facade crate for RBook, the rally book generator.
//!
//! This crate re-exports the core domain types and exposes the SQLite record
//! source and the document renderer behind feature flags.

#![forbid(unsafe_code)]

pub use rbook_core::{
    Alerts, BonusRecord, BonusRow, BookConfig, ComboError, ComboRecord, ComboRow, ConfigError,
    CoordinateError, EntrantRecord, EntrantRow, GpxOptions, Paginator, Points, PointsPrefixes,
    RecordSource, Section, StreamConfig, StreamKind, StreamLayout, StreamQuery,
    expand_score_table, parse_coordinates,
};

#[cfg(feature = "store-sqlite")]
pub use rbook_data::{QuerySet, SqliteRecordSource, SqliteRecordSourceError};

#[cfg(feature = "render")]
pub use rbook_render::{
    AssembleError, AssemblyReport, DocumentAssembler, GpxWaypointWriter, OutputTargets,
    TemplateRenderer, render_book,
};
