//! Rally database access for RBook.
//!
//! Responsibilities:
//! - Run the bonus, combination and entrant queries against a ScoreMaster
//!   style SQLite database.
//! - Scan rows into the fixed column contracts defined in `rbook-core`.
//!
//! Boundaries:
//! - No decoding or layout rules (those live in `rbook-core`).
//! - The database is opened read-only.

#![forbid(unsafe_code)]

mod queries;
mod sqlite;

pub use queries::{BONUS_SQL, COMBO_SQL, ENTRANT_SQL, QuerySet};
pub use sqlite::{SqliteRecordSource, SqliteRecordSourceError};
