//! SQLite-backed record source.

use std::collections::HashMap;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use rbook_core::{
    BonusRow, Categories, ComboRow, EntrantRow, RecordSource, Rows, StreamQuery,
};
use rusqlite::{Connection, OpenFlags, Row};
use thiserror::Error;

use crate::queries::QuerySet;

const TITLES_SQL: &str = "SELECT BonusID, IfNull(BriefDesc,'') FROM bonuses";

/// Errors raised while reading the rally database.
#[derive(Debug, Error)]
pub enum SqliteRecordSourceError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A query could not be prepared or executed.
    #[error("query failed: {source} (SQL: {sql})")]
    Query {
        /// The full query text.
        sql: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A row did not match the column contract.
    #[error("row {index} could not be read: {source}")]
    Row {
        /// Zero-based position of the row in the result set.
        index: usize,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

/// Read-only record source over a rally database.
pub struct SqliteRecordSource {
    connection: Connection,
    path: Utf8PathBuf,
    queries: QuerySet,
}

impl fmt::Debug for SqliteRecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteRecordSource")
            .field("path", &self.path)
            .field("queries", &self.queries)
            .finish_non_exhaustive()
    }
}

impl SqliteRecordSource {
    /// Open the database read-only with the given base queries.
    ///
    /// # Errors
    /// Returns [`SqliteRecordSourceError::OpenDatabase`] when the file is
    /// missing or is not a SQLite database.
    pub fn open(path: &Utf8Path, queries: QuerySet) -> Result<Self, SqliteRecordSourceError> {
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| SqliteRecordSourceError::OpenDatabase {
                path: path.to_owned(),
                source,
            })?;
        // SQLite opens lazily; touching the schema surfaces non-database files now.
        connection
            .query_row("SELECT count(*) FROM sqlite_master", [], |row| {
                row.get::<_, i64>(0)
            })
            .map_err(|source| SqliteRecordSourceError::OpenDatabase {
                path: path.to_owned(),
                source,
            })?;
        Ok(Self {
            connection,
            path: path.to_owned(),
            queries,
        })
    }

    fn fetch<T>(
        &self,
        base: &str,
        query: &StreamQuery<'_>,
        scan: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Rows<T, SqliteRecordSourceError>, SqliteRecordSourceError> {
        let sql = query.apply(base);
        debug!("running {sql}");
        let query_error = |source| SqliteRecordSourceError::Query {
            sql: sql.clone(),
            source,
        };
        let mut statement = self.connection.prepare(&sql).map_err(query_error)?;
        let mut rows = statement.query([]).map_err(query_error)?;

        let mut scanned = Vec::new();
        loop {
            let index = scanned.len();
            match rows.next() {
                Ok(Some(row)) => scanned.push(
                    scan(row).map_err(|source| SqliteRecordSourceError::Row { index, source }),
                ),
                Ok(None) => break,
                Err(source) => {
                    // A failed step leaves the cursor unusable.
                    scanned.push(Err(SqliteRecordSourceError::Row { index, source }));
                    break;
                }
            }
        }
        Ok(scanned)
    }
}

fn categories(row: &Row<'_>, first: usize) -> rusqlite::Result<Categories> {
    let mut values = [0_i64; 9];
    for (offset, value) in values.iter_mut().enumerate() {
        *value = row.get(first + offset)?;
    }
    Ok(Categories(values))
}

fn scan_bonus(row: &Row<'_>) -> rusqlite::Result<BonusRow> {
    Ok(BonusRow {
        id: row.get(0)?,
        description: row.get(1)?,
        points: row.get(2)?,
        flags: row.get(3)?,
        notes: row.get(4)?,
        categories: categories(row, 5)?,
        image: row.get(14)?,
        waffle: row.get(15)?,
        coords: row.get(16)?,
        question: row.get(17)?,
        answer: row.get(18)?,
        ask_points: row.get(19)?,
    })
}

fn scan_combo(row: &Row<'_>) -> rusqlite::Result<ComboRow> {
    Ok(ComboRow {
        id: row.get(0)?,
        description: row.get(1)?,
        score_method: row.get(2)?,
        minimum_ticks: row.get(3)?,
        score_points: row.get(4)?,
        bonus_list: row.get(5)?,
        categories: categories(row, 6)?,
        compulsory: row.get::<_, i64>(15)? != 0,
    })
}

fn scan_entrant(row: &Row<'_>) -> rusqlite::Result<EntrantRow> {
    Ok(EntrantRow {
        id: row.get(0)?,
        rider_name: row.get(1)?,
        pillion_name: row.get(2)?,
        bike: row.get(3)?,
        bike_reg: row.get(4)?,
        odo_kms: row.get(5)?,
        cohort: row.get(6)?,
    })
}

impl RecordSource for SqliteRecordSource {
    type Error = SqliteRecordSourceError;

    fn bonuses(&self, query: &StreamQuery<'_>) -> Result<Rows<BonusRow, Self::Error>, Self::Error> {
        self.fetch(&self.queries.bonus, query, scan_bonus)
    }

    fn combos(&self, query: &StreamQuery<'_>) -> Result<Rows<ComboRow, Self::Error>, Self::Error> {
        self.fetch(&self.queries.combo, query, scan_combo)
    }

    fn entrants(
        &self,
        query: &StreamQuery<'_>,
    ) -> Result<Rows<EntrantRow, Self::Error>, Self::Error> {
        self.fetch(&self.queries.entrant, query, scan_entrant)
    }

    fn bonus_titles(&self) -> Result<HashMap<String, String>, Self::Error> {
        let query_error = |source| SqliteRecordSourceError::Query {
            sql: TITLES_SQL.to_owned(),
            source,
        };
        let mut statement = self.connection.prepare(TITLES_SQL).map_err(query_error)?;
        let titles = statement
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(query_error)?
            .collect::<rusqlite::Result<HashMap<String, String>>>()
            .map_err(query_error)?;
        Ok(titles)
    }
}
