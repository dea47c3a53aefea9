//! In-memory `RecordSource` used by unit and behaviour tests.

use std::collections::HashMap;

use thiserror::Error;

use crate::record::{BonusRow, ComboRow, EntrantRow};
use crate::source::{RecordSource, Rows, StreamQuery};

/// Failures the in-memory source can be told to produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemorySourceError {
    /// Every query fails.
    #[error("query failed: {reason}")]
    Query {
        /// Description reported with the failure.
        reason: String,
    },
    /// A single row fails to scan.
    #[error("row could not be read: {reason}")]
    Row {
        /// Description reported with the failure.
        reason: String,
    },
}

/// In-memory `RecordSource`.
///
/// Filter and ordering clauses are ignored; rows come back in insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordSource {
    bonuses: Vec<Result<BonusRow, MemorySourceError>>,
    combos: Vec<Result<ComboRow, MemorySourceError>>,
    entrants: Vec<Result<EntrantRow, MemorySourceError>>,
    failure: Option<String>,
}

impl MemoryRecordSource {
    /// Create a source holding the given bonus rows.
    #[must_use]
    pub fn with_bonuses<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = BonusRow>,
    {
        Self {
            bonuses: rows.into_iter().map(Ok).collect(),
            ..Self::default()
        }
    }

    /// Append a bonus row.
    pub fn push_bonus(&mut self, row: BonusRow) {
        self.bonuses.push(Ok(row));
    }

    /// Append a bonus row that fails to scan.
    pub fn push_broken_bonus(&mut self, reason: &str) {
        self.bonuses.push(Err(MemorySourceError::Row {
            reason: reason.to_owned(),
        }));
    }

    /// Append a combination row.
    pub fn push_combo(&mut self, row: ComboRow) {
        self.combos.push(Ok(row));
    }

    /// Append an entrant row.
    pub fn push_entrant(&mut self, row: EntrantRow) {
        self.entrants.push(Ok(row));
    }

    /// Make every subsequent query fail.
    pub fn fail_queries(&mut self, reason: &str) {
        self.failure = Some(reason.to_owned());
    }

    fn rows<T: Clone>(
        &self,
        rows: &[Result<T, MemorySourceError>],
    ) -> Result<Rows<T, MemorySourceError>, MemorySourceError> {
        self.failure.as_ref().map_or_else(
            || Ok(rows.to_vec()),
            |reason| {
                Err(MemorySourceError::Query {
                    reason: reason.clone(),
                })
            },
        )
    }
}

impl RecordSource for MemoryRecordSource {
    type Error = MemorySourceError;

    fn bonuses(&self, _query: &StreamQuery<'_>) -> Result<Rows<BonusRow, Self::Error>, Self::Error> {
        self.rows(&self.bonuses)
    }

    fn combos(&self, _query: &StreamQuery<'_>) -> Result<Rows<ComboRow, Self::Error>, Self::Error> {
        self.rows(&self.combos)
    }

    fn entrants(
        &self,
        _query: &StreamQuery<'_>,
    ) -> Result<Rows<EntrantRow, Self::Error>, Self::Error> {
        self.rows(&self.entrants)
    }

    fn bonus_titles(&self) -> Result<HashMap<String, String>, Self::Error> {
        Ok(self
            .bonuses
            .iter()
            .flatten()
            .map(|row| (row.id.clone(), row.description.clone()))
            .collect())
    }
}
