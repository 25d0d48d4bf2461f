//! Lazy, caching evaluation of forward-only table scans.
//!
//! A [`LazyResult`] bridges the engine's forward-only cursor into indexed
//! access: rows are evaluated one at a time on demand, decoded through the
//! configured codecs and memoized, so repeated access to an already-seen
//! position never touches the engine again.
//!
//! Stepping uses a keyset cursor over the live connection (`WHERE rowid >
//! last ORDER BY rowid LIMIT 1`): each advance fetches exactly the next
//! row of the scan in storage order. This is the rendition of "step the
//! prepared statement once" that a forward-only `rusqlite` cursor permits
//! without a self-referential statement/rows pair; visibility semantics
//! are those of the owning connection either way.

use rusqlite::{Connection, OptionalExtension, Row};

use tablemap_core::{Result, TableMapError};

/// Decodes one fetched row (rowid plus projected columns) into an item.
pub(crate) type RowDecoder<T> = Box<dyn Fn(&Row<'_>) -> rusqlite::Result<(i64, T)>>;

enum Source<'conn, T> {
    /// Forward-only keyset scan over the live connection.
    Scan {
        conn: &'conn Connection,
        first_sql: String,
        next_sql: String,
        last_rowid: Option<i64>,
        decode: RowDecoder<T>,
    },
    /// Single pre-supplied row; completed from the start.
    Single,
}

/// Caches rows of a forward-only scan as they are evaluated.
///
/// State machine: not started → streaming → completed. Once completed the
/// cached sequence is immutable and represents the entire result set; rows
/// already cached are never re-decoded. Not safe for concurrent use.
pub struct LazyResult<'conn, T> {
    source: Source<'conn, T>,
    rows: Vec<T>,
    completed: bool,
}

impl<'conn, T: Clone> LazyResult<'conn, T> {
    /// Full-scan constructor used by iteration.
    pub(crate) fn scan(
        conn: &'conn Connection,
        first_sql: String,
        next_sql: String,
        decode: RowDecoder<T>,
    ) -> Self {
        Self {
            source: Source::Scan {
                conn,
                first_sql,
                next_sql,
                last_rowid: None,
                decode,
            },
            rows: Vec::new(),
            completed: false,
        }
    }

    /// Statement-free fast path over one pre-known row, used by `find`.
    pub(crate) fn single(row: T) -> Self {
        Self {
            source: Source::Single,
            rows: vec![row],
            completed: true,
        }
    }

    /// Number of rows evaluated so far.
    pub fn evaluated(&self) -> usize {
        self.rows.len()
    }

    /// True once the underlying scan has been fully consumed.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Whether any row has been fetched or the scan has finished.
    pub fn started(&self) -> bool {
        self.completed
            || match &self.source {
                Source::Scan { last_rowid, .. } => last_rowid.is_some(),
                Source::Single => true,
            }
    }

    /// Evaluates one more row, if any remain.
    ///
    /// A storage failure marks the scan completed (the cursor is dead) and
    /// surfaces the engine diagnostic.
    pub fn advance(&mut self) -> Result<()> {
        if self.completed {
            return Ok(());
        }
        let Source::Scan {
            conn,
            first_sql,
            next_sql,
            last_rowid,
            decode,
        } = &mut self.source
        else {
            self.completed = true;
            return Ok(());
        };

        let fetched = match *last_rowid {
            None => conn
                .query_row(first_sql.as_str(), [], |row| decode(row))
                .optional(),
            Some(rowid) => conn
                .query_row(next_sql.as_str(), [rowid], |row| decode(row))
                .optional(),
        };

        match fetched {
            Ok(Some((rowid, item))) => {
                *last_rowid = Some(rowid);
                self.rows.push(item);
                Ok(())
            }
            Ok(None) => {
                self.completed = true;
                Ok(())
            }
            Err(err) => {
                self.completed = true;
                Err(TableMapError::Storage(format!(
                    "error during scan: {}",
                    err
                )))
            }
        }
    }

    /// Row at `index`, evaluating on demand up to and including it.
    ///
    /// Indexing at or past the size of a completed result is out of range.
    pub fn get(&mut self, index: usize) -> Result<T> {
        while !self.completed && self.rows.len() <= index {
            self.advance()?;
        }
        if index >= self.rows.len() {
            return Err(TableMapError::OutOfRange(format!(
                "row index {} is past the end of the result",
                index
            )));
        }
        Ok(self.rows[index].clone())
    }
}
