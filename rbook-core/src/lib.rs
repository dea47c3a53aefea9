//! Core domain logic for RBook, the rally book generator.
//!
//! Responsibilities:
//! - Decode bonus flags, points modes and free-text coordinates.
//! - Expand compact combination score tables.
//! - Count records into a fixed page grid.
//! - Define the book configuration and the record source seam.
//!
//! Boundaries:
//! - No database, template or file access (see `rbook-data`, `rbook-render`
//!   and `rbook-fs`).
//!
//! Invariants:
//! - Decoding is pure; the only state is the per-stream [`Paginator`].
//! - No global mutable state.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod combo;
pub mod config;
pub mod coords;
pub mod flags;
pub mod paginate;
pub mod points;
pub mod record;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use combo::{ComboError, expand_score_table, split_list};
pub use config::{BookConfig, ConfigError, GpxOptions, Section, StreamConfig, StreamKind};
pub use coords::{Axis, CoordinateError, parse_coordinates};
pub use flags::Alerts;
pub use paginate::{LayoutEvent, Paginator, StreamLayout};
pub use points::{Points, PointsPrefixes};
pub use record::{
    BonusRecord, BonusRow, Categories, ComboBonus, ComboRecord, ComboRow, EntrantRecord,
    EntrantRow, RecordContext,
};
pub use source::{RecordSource, Rows, StreamQuery};
