//! Read-only access to the rally database.
//!
//! The [`RecordSource`] trait yields the rows of one stream in the order the
//! stream's ordering clause asks for. Query failures are reported for the whole
//! stream; a row that cannot be read is reported on its own so the caller can
//! skip it and continue.

use std::collections::HashMap;

use crate::config::StreamConfig;
use crate::record::{BonusRow, ComboRow, EntrantRow};

/// Rows of one stream, each of which may have failed to scan.
pub type Rows<T, E> = Vec<Result<T, E>>;

/// Filter and ordering clauses for one stream query.
///
/// The clauses are operator-authored SQL fragments appended to the query text
/// as written. They are not parameters and must come from trusted
/// configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamQuery<'a> {
    /// Appended as `WHERE <clause>` when non-empty.
    pub where_clause: &'a str,
    /// Appended as `ORDER BY <clause>` when non-empty.
    pub order_clause: &'a str,
}

impl<'a> From<&'a StreamConfig> for StreamQuery<'a> {
    fn from(stream: &'a StreamConfig) -> Self {
        Self {
            where_clause: stream.where_clause.trim(),
            order_clause: stream.order_clause.trim(),
        }
    }
}

impl StreamQuery<'_> {
    /// Append the filter and ordering clauses to a base query.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbook_core::StreamQuery;
    ///
    /// let query = StreamQuery { where_clause: "Cat1 = 2", order_clause: "BonusID" };
    /// assert_eq!(
    ///     query.apply("SELECT BonusID FROM bonuses"),
    ///     "SELECT BonusID FROM bonuses WHERE Cat1 = 2 ORDER BY BonusID"
    /// );
    /// ```
    #[must_use]
    pub fn apply(&self, base: &str) -> String {
        let mut sql = base.trim_end().to_owned();
        if !self.where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(self.where_clause);
        }
        if !self.order_clause.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(self.order_clause);
        }
        sql
    }
}

/// Source of bonus, combination and entrant rows.
pub trait RecordSource {
    /// Error raised by queries and row scans.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Bonus rows for a stream.
    ///
    /// # Errors
    /// Returns an error when the query cannot run at all.
    fn bonuses(&self, query: &StreamQuery<'_>) -> Result<Rows<BonusRow, Self::Error>, Self::Error>;

    /// Combination rows for a stream.
    ///
    /// # Errors
    /// Returns an error when the query cannot run at all.
    fn combos(&self, query: &StreamQuery<'_>) -> Result<Rows<ComboRow, Self::Error>, Self::Error>;

    /// Entrant rows for a stream.
    ///
    /// # Errors
    /// Returns an error when the query cannot run at all.
    fn entrants(
        &self,
        query: &StreamQuery<'_>,
    ) -> Result<Rows<EntrantRow, Self::Error>, Self::Error>;

    /// Every bonus code mapped to its description.
    ///
    /// # Errors
    /// Returns an error when the bonus table cannot be read.
    fn bonus_titles(&self) -> Result<HashMap<String, String>, Self::Error>;
}
