//! The map facade: an STL-map-like, codec-typed view over one SQLite table.
//!
//! A [`TableMap`] owns exactly one live connection. Keys and values pass
//! through the configured codec pair on every operation; the backing
//! schema is always two columns, `key` (primary key) and `value`, with
//! affinities derived from the codec storage types.

use std::cell::Cell;
use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use rusqlite::{Connection, OpenFlags};

use tablemap_core::{Config, Logger, Mode, Result, StorageValue, TableMapError};

use crate::iter::{Iter, KeyIter, RowIter, ValueIter};
use crate::lazy::{LazyResult, RowDecoder};
use crate::node::{Node, NodeInsert};

/// Placeholder token substituted by [`TableMap::sql`].
const TABLE_PLACEHOLDER: &str = ":table";

/// Lists all table names present in a database file.
///
/// Does not require an open map instance. Fails if the file does not
/// exist.
pub fn table_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TableMapError::FileMissing(path.to_path_buf()));
    }
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

// Unique name for an ephemeral database under the system temp directory.
fn ephemeral_path() -> PathBuf {
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "tablemap_{}_{}_{}.db",
        std::process::id(),
        stamp,
        seq
    ))
}

// Directory that must exist for the backing file, resolved against the
// current working directory when relative.
fn parent_dir(file: &Path) -> PathBuf {
    let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
    if dir.as_os_str().is_empty() {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    } else if dir.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&dir))
            .unwrap_or(dir)
    } else {
        dir
    }
}

/// Typed map over one SQLite table.
///
/// `K`/`V` are the application key and value types; `SK`/`SV` the storage
/// types fixed by the codec pair (defaulting to the application types for
/// identity codecs). Not thread-safe: one instance per thread, multiple
/// independent instances may share a backing file as separate connections.
pub struct TableMap<K, V, SK = K, SV = V>
where
    K: 'static,
    V: 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    conn: Option<Connection>,
    config: Config<K, V, SK, SV>,
    /// Resolved backing file; differs from the configured filename only
    /// for ephemeral temp databases.
    filename: PathBuf,
    logger: Logger,
    txn_open: Cell<bool>,
    in_temp: bool,
}

impl<K, V, SK, SV> TableMap<K, V, SK, SV>
where
    K: 'static,
    V: 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    /// Opens the map: resolves the backing file, connects and prepares the
    /// table according to the configured mode.
    pub fn open(config: Config<K, V, SK, SV>) -> Result<Self> {
        let logger = Logger::new(config.log_level(), config.log_sink().cloned());
        let (filename, in_temp) = if config.filename().is_empty() {
            (ephemeral_path(), true)
        } else {
            (PathBuf::from(config.filename()), false)
        };

        let mut map = Self {
            conn: None,
            config,
            filename,
            logger,
            txn_open: Cell::new(false),
            in_temp,
        };
        map.connect()?;
        Ok(map)
    }

    /// (Re-)connects to the backing database.
    ///
    /// Validates preconditions eagerly, applies configured pragmas in
    /// insertion order and creates the table when the mode permits.
    /// Permitted again after [`close`](Self::close), re-running the same
    /// sequence.
    pub fn connect(&mut self) -> Result<()> {
        if self.config.mode() == Mode::NewDatabase && !self.in_memory() && self.filename.exists() {
            std::fs::remove_file(&self.filename)?;
        }

        if !self.in_memory() {
            let dir = parent_dir(&self.filename);
            if !dir.exists() {
                return Err(TableMapError::DirectoryMissing(dir));
            }
        }

        self.logger.debug(&format!(
            "tablemap - file: '{}' table: '{}'",
            self.filename.display(),
            self.config.table()
        ));

        let conn = if self.is_read_only() {
            if !self.in_memory() && !self.filename.exists() {
                return Err(TableMapError::FileMissing(self.filename.clone()));
            }
            Connection::open_with_flags(&self.filename, OpenFlags::SQLITE_OPEN_READ_ONLY)?
        } else {
            Connection::open(&self.filename)?
        };

        if self.is_read_only() {
            let tables = table_names(&self.filename)?;
            if !tables.iter().any(|t| t == self.config.table()) {
                return Err(TableMapError::Storage(format!(
                    "refusing to create table '{}' in read-only mode",
                    self.config.table()
                )));
            }
        }

        for pragma in self.config.pragmas() {
            // Pragmas may return rows; drain them.
            let mut stmt = conn.prepare(pragma)?;
            let mut rows = stmt.query([])?;
            while rows.next()?.is_some() {}
        }

        if !self.is_read_only() {
            let create = substitute_table(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {} (key {} PRIMARY KEY, value {})",
                    TABLE_PLACEHOLDER,
                    SK::CLASS,
                    SV::CLASS
                ),
                self.config.table(),
            );
            conn.execute(&create, [])?;
            self.logger
                .debug(&format!("table '{}' ready", self.config.table()));
        }

        self.conn = Some(conn);
        self.txn_open.set(false);

        if self.config.mode() == Mode::WriteDrop {
            self.clear()?;
        }
        Ok(())
    }

    /// Commits pending changes when auto-commit is enabled, closes the
    /// connection and removes an ephemeral temp file. Never removes
    /// user-named or `:memory:` databases. Safe to call more than once.
    pub fn close(&mut self) -> Result<()> {
        if self.conn.is_none() {
            return Ok(());
        }
        if self.config.auto_commit() {
            self.commit()?;
        }
        if let Some(conn) = self.conn.take() {
            conn.close()
                .map_err(|(_, err)| TableMapError::Storage(err.to_string()))?;
        }
        self.txn_open.set(false);
        self.logger.debug("database closed");

        if self.in_temp && self.filename.exists() {
            match std::fs::remove_file(&self.filename) {
                Ok(()) => self.logger.debug(&format!(
                    "database file '{}' removed",
                    self.filename.display()
                )),
                Err(err) => self
                    .logger
                    .warn(&format!("failed to remove temp file: {}", err)),
            }
        }
        Ok(())
    }

    /// Closes the connection, then deletes the backing file outright.
    /// No-op for `:memory:`; forbidden in read-only mode.
    pub fn terminate(&mut self) -> Result<()> {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("terminate"));
        }
        self.close()?;
        if self.in_memory() {
            return Ok(());
        }
        self.logger
            .debug(&format!("deleting {}", self.filename.display()));
        if self.filename.exists() {
            if let Err(err) = std::fs::remove_file(&self.filename) {
                self.logger.error(&format!(
                    "failed to delete {}: {}",
                    self.filename.display(),
                    err
                ));
            }
        }
        Ok(())
    }

    /// Opens an explicit transaction. A tracked no-op when one is already
    /// open.
    pub fn begin_transaction(&self) -> Result<()> {
        if self.txn_open.get() {
            return Ok(());
        }
        self.conn()?.execute("BEGIN TRANSACTION", [])?;
        self.txn_open.set(true);
        Ok(())
    }

    /// Commits the open transaction, if any.
    pub fn commit(&self) -> Result<()> {
        if !self.txn_open.get() {
            return Ok(());
        }
        self.conn()?.execute("COMMIT", [])?;
        self.txn_open.set(false);
        Ok(())
    }

    /// Discards every mutation since the transaction was opened.
    pub fn rollback(&self) -> Result<()> {
        if !self.txn_open.get() {
            return Ok(());
        }
        self.conn()?.execute("ROLLBACK", [])?;
        self.txn_open.set(false);
        Ok(())
    }

    /// Deletes all rows. The deletion is immediately durable: any pending
    /// transaction is committed first and the delete runs outside one.
    pub fn clear(&self) -> Result<()> {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("clear"));
        }
        self.commit()?;
        let sql = self.sql("DELETE FROM :table");
        self.conn()?.execute(&sql, [])?;
        self.commit()?;
        Ok(())
    }

    /// Row count via `COUNT(*)`. A full-table count, not optimized —
    /// acceptable at the intended workload scale.
    pub fn len(&self) -> Result<usize> {
        let sql = self.sql("SELECT COUNT(*) FROM :table");
        let count: i64 = self.conn()?.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Substitutes the `:table` placeholder with the double-quoted
    /// configured table name.
    ///
    /// Used internally for every generated statement and exposed for
    /// advanced callers composing custom queries against the same table.
    /// A table literally named `:table` is quoted like any other name,
    /// not substituted recursively.
    pub fn sql(&self, template: &str) -> String {
        substitute_table(template, self.config.table())
    }

    /// Raw connection for advanced callers; pair with [`sql`](Self::sql).
    pub fn connection(&self) -> Result<&Connection> {
        self.conn()
    }

    pub fn config(&self) -> &Config<K, V, SK, SV> {
        &self.config
    }

    /// Resolved backing file path.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn in_memory(&self) -> bool {
        self.filename.as_os_str() == ":memory:"
    }

    /// Whether the backing file is an ephemeral temp database removed on
    /// close.
    pub fn in_temp(&self) -> bool {
        self.in_temp
    }

    pub fn is_read_only(&self) -> bool {
        self.config.mode() == Mode::ReadOnly
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| TableMapError::Storage("connection is closed".to_string()))
    }

    // Opens the implicit transaction on the first mutating call when
    // auto-commit is off.
    fn begin_implicit(&self) -> Result<()> {
        if !self.config.auto_commit() && !self.txn_open.get() {
            self.begin_transaction()?;
        }
        Ok(())
    }
}

impl<K, V, SK, SV> TableMap<K, V, SK, SV>
where
    K: Clone + fmt::Debug + 'static,
    V: Clone + 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    /// Upserts `value` under `key`.
    pub fn set(&self, key: &K, value: &V) -> Result<()> {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("write to"));
        }
        let conn = self.conn()?;
        self.begin_implicit()?;
        let sql = self.sql("REPLACE INTO :table (key, value) VALUES (?1, ?2)");
        conn.execute(
            &sql,
            rusqlite::params![
                self.encode_key(key).to_sql_value(),
                self.encode_value(value).to_sql_value()
            ],
        )?;
        Ok(())
    }

    /// Value under `key`, raising [`TableMapError::NotFound`] when absent.
    /// See [`try_get`](Self::try_get) for the non-raising counterpart.
    pub fn get(&self, key: &K) -> Result<V> {
        self.try_get(key)?
            .ok_or_else(|| TableMapError::NotFound(format!("{:?}", key)))
    }

    /// Value under `key`, or `None` when absent.
    pub fn try_get(&self, key: &K) -> Result<Option<V>> {
        use rusqlite::OptionalExtension;
        let conn = self.conn()?;
        let sql = self.sql("SELECT value FROM :table WHERE key = ?1");
        let stored = conn
            .query_row(&sql, [self.encode_key(key).to_sql_value()], |row| {
                Ok(SV::from_sql_value(row.get_ref(0)?))
            })
            .optional()?;
        Ok(stored.map(|stored| self.decode_value(&stored)))
    }

    /// Proxy over an existing entry; raises when the key is absent.
    pub fn at(&self, key: &K) -> Result<EntryRef<'_, K, V, SK, SV>> {
        let value = self.get(key)?;
        Ok(EntryRef {
            map: self,
            key: key.clone(),
            value,
        })
    }

    /// Proxy over the entry under `key`, inserting the value type's
    /// default first when the key is absent — the associative-container
    /// index operator rendition.
    pub fn entry(&self, key: &K) -> Result<EntryRef<'_, K, V, SK, SV>>
    where
        V: Default,
    {
        let value = match self.try_get(key)? {
            Some(value) => value,
            None => {
                let value = V::default();
                self.set(key, &value)?;
                value
            }
        };
        Ok(EntryRef {
            map: self,
            key: key.clone(),
            value,
        })
    }

    /// Unconditional delete; succeeds whether or not the key exists.
    pub fn del(&self, key: &K) -> Result<()> {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("delete from"));
        }
        let conn = self.conn()?;
        self.begin_implicit()?;
        let sql = self.sql("DELETE FROM :table WHERE key = ?1");
        conn.execute(&sql, [self.encode_key(key).to_sql_value()])?;
        Ok(())
    }

    /// Existence-counting delete: 1 when the key was present, else 0.
    pub fn erase(&self, key: &K) -> Result<usize> {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("erase from"));
        }
        if !self.contains(key)? {
            return Ok(0);
        }
        self.del(key)?;
        Ok(1)
    }

    /// Full scan deleting each row the predicate holds for; returns the
    /// number removed.
    pub fn erase_if<P>(&self, mut predicate: P) -> Result<usize>
    where
        P: FnMut(&(K, V)) -> bool,
    {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("erase from"));
        }
        let mut erased = 0;
        let mut rows = self.iter()?;
        while let Some(pair) = rows.try_next()? {
            if predicate(&pair) {
                erased += self.erase(&pair.0)?;
            }
        }
        Ok(erased)
    }

    /// Inserts without overwriting: reports `false` and leaves the stored
    /// value untouched when the key already exists.
    pub fn insert(&self, key: K, value: V) -> Result<(RowIter<'_, K, V>, bool)> {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("insert into"));
        }
        if self.try_get(&key)?.is_some() {
            return Ok((self.find(&key)?, false));
        }
        self.set(&key, &value)?;
        Ok((self.find(&key)?, true))
    }

    /// Re-inserts a detached node.
    ///
    /// An empty node is a no-op. On key collision nothing is overwritten:
    /// the node comes back to the caller together with an iterator to the
    /// pre-existing entry.
    pub fn insert_node(&self, node: Node<K, V>) -> Result<NodeInsert<'_, K, V>> {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("insert into"));
        }
        let Some((key, value)) = node.into_pair() else {
            return Ok(NodeInsert {
                position: Iter::end(),
                inserted: false,
                node: Node::default(),
            });
        };
        let (position, inserted) = self.insert(key.clone(), value.clone())?;
        let node = if inserted {
            Node::default()
        } else {
            Node::new(key, value)
        };
        Ok(NodeInsert {
            position,
            inserted,
            node,
        })
    }

    /// Range insert: each pair is inserted unless its key already exists.
    pub fn insert_many<I>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("insert into"));
        }
        for (key, value) in entries {
            if !self.contains(&key)? {
                self.set(&key, &value)?;
            }
        }
        Ok(())
    }

    /// Inserts or overwrites; reports whether a fresh insertion happened.
    pub fn insert_or_assign(&self, key: K, value: V) -> Result<(RowIter<'_, K, V>, bool)> {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("write to"));
        }
        let (position, inserted) = self.try_insert(key.clone(), value.clone())?;
        if inserted {
            return Ok((position, true));
        }
        self.set(&key, &value)?;
        Ok((self.find(&key)?, false))
    }

    /// Inserts unless the key exists; never overwrites.
    pub fn try_insert(&self, key: K, value: V) -> Result<(RowIter<'_, K, V>, bool)> {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("write to"));
        }
        if self.contains(&key)? {
            return Ok((self.find(&key)?, false));
        }
        self.insert(key, value)
    }

    /// Hinted insert. The position hint is accepted and ignored — the
    /// table has no intrinsic ordering to insert relative to, so this
    /// behaves exactly like [`insert`](Self::insert).
    pub fn insert_hint(
        &self,
        _hint: &RowIter<'_, K, V>,
        key: K,
        value: V,
    ) -> Result<RowIter<'_, K, V>> {
        Ok(self.insert(key, value)?.0)
    }

    /// Hinted [`try_insert`](Self::try_insert); the hint is ignored.
    pub fn try_insert_hint(
        &self,
        _hint: &RowIter<'_, K, V>,
        key: K,
        value: V,
    ) -> Result<RowIter<'_, K, V>> {
        Ok(self.try_insert(key, value)?.0)
    }

    /// Single-row iterator positioned at `key`, or the end sentinel when
    /// absent. Never raises for a missing key.
    pub fn find(&self, key: &K) -> Result<RowIter<'_, K, V>> {
        match self.try_get(key)? {
            Some(value) => Iter::new(LazyResult::single((key.clone(), value))),
            None => Ok(Iter::end()),
        }
    }

    /// Pair of iterators bounding the entries matching `key`.
    pub fn equal_range(&self, key: &K) -> Result<(RowIter<'_, K, V>, RowIter<'_, K, V>)> {
        let position = self.find(key)?;
        Ok((position.clone(), position))
    }

    /// Number of entries under `key` (0 or 1). Never raises for a missing
    /// key.
    pub fn count(&self, key: &K) -> Result<usize> {
        let sql = self.sql("SELECT EXISTS(SELECT 1 FROM :table WHERE key = ?1)");
        let exists: i64 =
            self.conn()?
                .query_row(&sql, [self.encode_key(key).to_sql_value()], |row| {
                    row.get(0)
                })?;
        Ok(exists as usize)
    }

    pub fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.count(key)? != 0)
    }

    /// Atomically removes the entry and returns it as a detached node, or
    /// an empty node when absent.
    pub fn extract(&self, key: &K) -> Result<Node<K, V>> {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("extract from"));
        }
        match self.try_get(key)? {
            Some(value) => {
                self.del(key)?;
                Ok(Node::new(key.clone(), value))
            }
            None => Ok(Node::default()),
        }
    }

    /// [`extract`](Self::extract) keyed by an iterator position; an end
    /// position yields an empty node.
    pub fn extract_at(&self, position: &RowIter<'_, K, V>) -> Result<Node<K, V>> {
        if self.is_read_only() {
            return Err(TableMapError::ReadOnly("extract from"));
        }
        match position.get() {
            Some((key, _)) => self.extract(&key),
            None => Ok(Node::default()),
        }
    }

    /// Forward iteration over `(key, value)` pairs in storage (insertion)
    /// order.
    pub fn iter(&self) -> Result<RowIter<'_, K, V>> {
        self.scan_pairs(false)
    }

    /// Reverse iteration over `(key, value)` pairs.
    pub fn iter_rev(&self) -> Result<RowIter<'_, K, V>> {
        self.scan_pairs(true)
    }

    /// Forward iteration over keys only.
    pub fn keys(&self) -> Result<KeyIter<'_, K>> {
        self.scan_keys(false)
    }

    /// Reverse iteration over keys only.
    pub fn keys_rev(&self) -> Result<KeyIter<'_, K>> {
        self.scan_keys(true)
    }

    /// Forward iteration over values only.
    pub fn values(&self) -> Result<ValueIter<'_, V>> {
        self.scan_values(false)
    }

    /// Reverse iteration over values only.
    pub fn values_rev(&self) -> Result<ValueIter<'_, V>> {
        self.scan_values(true)
    }

    fn scan_pairs(&self, reverse: bool) -> Result<RowIter<'_, K, V>> {
        let conn = self.conn()?;
        let (first_sql, next_sql) = self.scan_sql("key, value", reverse);
        let codecs = self.config.codecs().clone();
        let decode: RowDecoder<(K, V)> = Box::new(move |row| {
            let rowid: i64 = row.get(0)?;
            let key = SK::from_sql_value(row.get_ref(1)?);
            let value = SV::from_sql_value(row.get_ref(2)?);
            Ok((rowid, (codecs.key.decode(&key), codecs.value.decode(&value))))
        });
        Iter::new(LazyResult::scan(conn, first_sql, next_sql, decode))
    }

    fn scan_keys(&self, reverse: bool) -> Result<KeyIter<'_, K>> {
        let conn = self.conn()?;
        let (first_sql, next_sql) = self.scan_sql("key", reverse);
        let codec = self.config.codecs().key.clone();
        let decode: RowDecoder<K> = Box::new(move |row| {
            let rowid: i64 = row.get(0)?;
            let key = SK::from_sql_value(row.get_ref(1)?);
            Ok((rowid, codec.decode(&key)))
        });
        Iter::new(LazyResult::scan(conn, first_sql, next_sql, decode))
    }

    fn scan_values(&self, reverse: bool) -> Result<ValueIter<'_, V>> {
        let conn = self.conn()?;
        let (first_sql, next_sql) = self.scan_sql("value", reverse);
        let codec = self.config.codecs().value.clone();
        let decode: RowDecoder<V> = Box::new(move |row| {
            let rowid: i64 = row.get(0)?;
            let value = SV::from_sql_value(row.get_ref(1)?);
            Ok((rowid, codec.decode(&value)))
        });
        Iter::new(LazyResult::scan(conn, first_sql, next_sql, decode))
    }

    // First-step and next-step statements for a keyset scan in storage
    // order over the given column projection.
    fn scan_sql(&self, columns: &str, reverse: bool) -> (String, String) {
        let (cmp, dir) = if reverse { ("<", "DESC") } else { (">", "ASC") };
        let first = self.sql(&format!(
            "SELECT rowid, {} FROM :table ORDER BY rowid {} LIMIT 1",
            columns, dir
        ));
        let next = self.sql(&format!(
            "SELECT rowid, {} FROM :table WHERE rowid {} ?1 ORDER BY rowid {} LIMIT 1",
            columns, cmp, dir
        ));
        (first, next)
    }

    fn encode_key(&self, key: &K) -> SK {
        self.config.codecs().key.encode(key)
    }

    fn encode_value(&self, value: &V) -> SV {
        self.config.codecs().value.encode(value)
    }

    fn decode_value(&self, stored: &SV) -> V {
        self.config.codecs().value.decode(stored)
    }
}

impl<K, V, SK, SV> Drop for TableMap<K, V, SK, SV>
where
    K: 'static,
    V: 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            self.logger
                .error(&format!("closing tablemap on drop failed: {}", err));
        }
    }
}

impl<K, V, SK, SV> fmt::Display for TableMap<K, V, SK, SV>
where
    K: 'static,
    V: 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tablemap({})", self.filename.display())
    }
}

fn substitute_table(template: &str, table: &str) -> String {
    let replacement = format!("\"{}\"", table);
    template.replace(TABLE_PLACEHOLDER, &replacement)
}

/// Mutable proxy bound to one key.
///
/// Reads return the value captured at creation; [`assign`](Self::assign)
/// writes through to the underlying table.
pub struct EntryRef<'m, K, V, SK = K, SV = V>
where
    K: Clone + fmt::Debug + 'static,
    V: Clone + 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    map: &'m TableMap<K, V, SK, SV>,
    key: K,
    value: V,
}

impl<'m, K, V, SK, SV> EntryRef<'m, K, V, SK, SV>
where
    K: Clone + fmt::Debug + 'static,
    V: Clone + 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn get(&self) -> &V {
        &self.value
    }

    /// Writes a new value for the bound key.
    pub fn assign(&mut self, value: V) -> Result<()> {
        self.map.set(&self.key, &value)?;
        self.value = value;
        Ok(())
    }

    pub fn into_value(self) -> V {
        self.value
    }
}

impl<'m, K, V, SK, SV> Deref for EntryRef<'m, K, V, SK, SV>
where
    K: Clone + fmt::Debug + 'static,
    V: Clone + 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    type Target = V;

    fn deref(&self) -> &V {
        &self.value
    }
}

impl<'m, K, V, SK, SV> PartialEq<V> for EntryRef<'m, K, V, SK, SV>
where
    K: Clone + fmt::Debug + 'static,
    V: Clone + PartialEq + 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    fn eq(&self, other: &V) -> bool {
        self.value == *other
    }
}

impl<'m, K, V, SK, SV> fmt::Debug for EntryRef<'m, K, V, SK, SV>
where
    K: Clone + fmt::Debug + 'static,
    V: Clone + fmt::Debug + 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryRef")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}
