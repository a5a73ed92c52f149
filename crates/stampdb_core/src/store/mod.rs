//! The stamp store.
//!
//! [`StampStore`] owns one SQLite connection and exposes CRUD, search and
//! schema lifecycle on top of the row codec.

mod setup;
mod sql;
mod stats;

pub use stats::{StoreStats, StoreStatsSnapshot};

use crate::aggregate::{aggregate, CollectionStats, GroupBy};
use crate::codec::RowCodec;
use crate::collection::StampCollection;
use crate::config::{JournalMode, StoreConfig};
use crate::error::{CoreError, CoreResult};
use crate::query::{Criteria, Filter};
use crate::schema::Encodings;
use crate::stamp::{Stamp, StampId, StoredStamp};
use parking_lot::Mutex;
use stampdb_codec::CodecError;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persistent store of stamps.
///
/// A store owns a single connection behind a mutex, so every call is a
/// self-contained unit of work and calls never interleave mid-write. The
/// schema is created or completed on open.
///
/// # Example
///
/// ```
/// use stampdb_core::{Criteria, Stamp, StampStore};
///
/// let store = StampStore::open_in_memory()?;
/// let id = store.create(&Stamp::new("C3", "Columbus"))?;
/// assert_eq!(store.read(id)?.catalog_number, "C3");
///
/// let hits = store.search(&Criteria::new().contains("description", "colum"))?;
/// assert_eq!(hits.len(), 1);
/// # Ok::<(), stampdb_core::CoreError>(())
/// ```
pub struct StampStore {
    /// The connection. `None` once closed.
    conn: Mutex<Option<Connection>>,
    /// Configuration the store was opened with.
    config: StoreConfig,
    /// Database file. `None` for in-memory stores.
    path: Option<PathBuf>,
    /// How the table's money columns hold their values.
    encodings: Encodings,
    /// Operation counters.
    stats: StoreStats,
}

impl StampStore {
    /// Opens (or creates) a store at `path` with default configuration.
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Opens a store at `path`.
    ///
    /// # Errors
    ///
    /// Returns `MissingDatabase` if the file does not exist and the
    /// configuration forbids creating it (read-only stores never create).
    /// Returns `Storage` if SQLite cannot open the file or set up the table.
    pub fn open_with_config(path: impl AsRef<Path>, config: StoreConfig) -> CoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() && (config.read_only || !config.create_if_missing) {
            return Err(CoreError::MissingDatabase {
                path: path.to_path_buf(),
            });
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };
        let conn = Connection::open_with_flags(path, flags)?;
        debug!(path = %path.display(), read_only = config.read_only, "opened database");
        Self::init(conn, config, Some(path.to_path_buf()))
    }

    /// Opens a fresh in-memory store. Useful for tests.
    pub fn open_in_memory() -> CoreResult<Self> {
        let config = StoreConfig::default().journal_mode(JournalMode::Memory);
        Self::init(Connection::open_in_memory()?, config, None)
    }

    fn init(mut conn: Connection, config: StoreConfig, path: Option<PathBuf>) -> CoreResult<Self> {
        setup::configure(&conn, &config, path.is_none())?;
        if !config.read_only {
            setup::ensure_schema(&mut conn)?;
        }
        let encodings = setup::decimal_encodings(&conn)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            config,
            path,
            encodings,
            stats: StoreStats::new(),
        })
    }

    /// The database file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The configuration the store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns true once [`StampStore::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.conn.lock().is_none()
    }

    /// Runs `f` on the open connection, counting failures.
    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> CoreResult<T>) -> CoreResult<T> {
        let mut guard = self.conn.lock();
        let conn = guard.as_mut().ok_or(CoreError::Closed)?;
        f(conn).inspect_err(|_| self.stats.record_error())
    }

    /// Like [`Self::with_conn`], but for writes: refuses read-only stores
    /// and logs failures.
    fn write<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Connection) -> CoreResult<T>,
    ) -> CoreResult<T> {
        if self.config.read_only {
            self.stats.record_error();
            return Err(CoreError::ReadOnly);
        }
        self.with_conn(f).inspect_err(|e| {
            if !e.is_not_found() {
                warn!(op, error = %e, "write failed");
            }
        })
    }

    fn validated(&self, stamp: &Stamp) -> CoreResult<()> {
        stamp.validate().inspect_err(|_| self.stats.record_error())
    }

    /// Persists a new stamp and returns its identifier.
    ///
    /// Identifiers are never reused, even after the highest one is deleted.
    pub fn create(&self, stamp: &Stamp) -> CoreResult<StampId> {
        self.validated(stamp)?;
        let row = stamp.to_row_with(&self.encodings)?;
        let id = self.write("create", |conn| {
            conn.prepare_cached(&sql::insert_sql())?
                .execute(params_from_iter(sql::row_params(&row)))?;
            Ok(StampId::new(conn.last_insert_rowid()))
        })?;
        self.stats.record_create(1);
        debug!(%id, catalog_number = %stamp.catalog_number, "created stamp");
        Ok(id)
    }

    /// Persists several stamps in one transaction. Either all are stored or
    /// none are.
    pub fn create_many<'a, I>(&self, stamps: I) -> CoreResult<Vec<StampId>>
    where
        I: IntoIterator<Item = &'a Stamp>,
    {
        let rows = stamps
            .into_iter()
            .map(|stamp| {
                self.validated(stamp)?;
                Ok(stamp.to_row_with(&self.encodings)?)
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let ids = self.write("create_many", |conn| {
            let tx = conn.transaction()?;
            let mut ids = Vec::with_capacity(rows.len());
            {
                let mut stmt = tx.prepare_cached(&sql::insert_sql())?;
                for row in &rows {
                    stmt.execute(params_from_iter(sql::row_params(row)))?;
                    ids.push(StampId::new(tx.last_insert_rowid()));
                }
            }
            tx.commit()?;
            Ok(ids)
        })?;
        self.stats.record_create(ids.len() as u64);
        debug!(count = ids.len(), "created stamps");
        Ok(ids)
    }

    /// Reads a stamp.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no stamp has this identifier.
    pub fn read(&self, id: StampId) -> CoreResult<Stamp> {
        self.get(id)?.ok_or_else(|| {
            self.stats.record_error();
            CoreError::NotFound { id }
        })
    }

    /// Reads a stamp, returning `None` if it does not exist.
    pub fn get(&self, id: StampId) -> CoreResult<Option<Stamp>> {
        let found = self.with_conn(|conn| {
            let mut rows = sql::query_stamps(
                conn,
                &self.encodings,
                &sql::select_one_sql(),
                [id.as_i64()],
            )?;
            Ok(rows.pop().map(|stored| stored.stamp))
        })?;
        self.stats.record_read();
        debug!(%id, found = found.is_some(), "read stamp");
        Ok(found)
    }

    /// Returns true if a stamp with this identifier exists.
    pub fn exists(&self, id: StampId) -> CoreResult<bool> {
        self.with_conn(|conn| {
            Ok(conn.query_row(&sql::exists_sql(), [id.as_i64()], |row| row.get(0))?)
        })
    }

    /// Number of stored stamps.
    pub fn count(&self) -> CoreResult<u64> {
        let n: i64 =
            self.with_conn(|conn| Ok(conn.query_row(&sql::count_sql(), [], |row| row.get(0))?))?;
        row_count(n)
    }

    /// Replaces every field of the stamp at `id`.
    ///
    /// This is a full replace: fields left at their defaults in `stamp`
    /// are stored as defaults. Never creates a row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no stamp has this identifier.
    pub fn update(&self, id: StampId, stamp: &Stamp) -> CoreResult<()> {
        self.validated(stamp)?;
        let row = stamp.to_row_with(&self.encodings)?;
        self.write("update", |conn| {
            let mut params = sql::row_params(&row);
            params.push(rusqlite::types::Value::Integer(id.as_i64()));
            let changed = conn
                .prepare_cached(&sql::update_sql())?
                .execute(params_from_iter(params))?;
            if changed == 0 {
                return Err(CoreError::NotFound { id });
            }
            Ok(())
        })?;
        self.stats.record_update();
        debug!(%id, "updated stamp");
        Ok(())
    }

    /// Deletes the stamp at `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no stamp has this identifier, including when it
    /// was already deleted.
    pub fn delete(&self, id: StampId) -> CoreResult<()> {
        self.write("delete", |conn| {
            let changed = conn
                .prepare_cached(&sql::delete_sql())?
                .execute([id.as_i64()])?;
            if changed == 0 {
                return Err(CoreError::NotFound { id });
            }
            Ok(())
        })?;
        self.stats.record_delete();
        debug!(%id, "deleted stamp");
        Ok(())
    }

    /// Every stamp, ordered by identifier.
    pub fn list_all(&self) -> CoreResult<Vec<StoredStamp>> {
        let all = self.with_conn(|conn| {
            sql::query_stamps(conn, &self.encodings, &sql::select_sql(""), [])
        })?;
        self.stats.record_scan();
        debug!(count = all.len(), "listed stamps");
        Ok(all)
    }

    /// Every stamp as an in-memory collection, in identifier order.
    pub fn load_collection(&self) -> CoreResult<StampCollection> {
        Ok(self
            .list_all()?
            .into_iter()
            .map(|stored| stored.stamp)
            .collect())
    }

    /// Stamps matching every predicate, ordered by identifier.
    ///
    /// Empty criteria match everything.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCriteria` for an unknown field, a predicate the
    /// field does not support, a value of the wrong kind or a malformed
    /// range. Nothing is executed in that case.
    pub fn search(&self, criteria: &Criteria) -> CoreResult<Vec<StoredStamp>> {
        let filter = Filter::compile_with(criteria, &self.encodings)
            .inspect_err(|_| self.stats.record_error())?;
        let sql = sql::select_sql(&filter.where_clause());
        let hits = self.with_conn(|conn| {
            let params = filter.params().iter().map(sql::to_sql);
            sql::query_stamps(conn, &self.encodings, &sql, params_from_iter(params))
        })?;
        self.stats.record_search();
        debug!(predicates = criteria.len(), hits = hits.len(), "searched stamps");
        Ok(hits)
    }

    /// Aggregates the stamps matching `criteria`.
    pub fn statistics(
        &self,
        criteria: &Criteria,
        group_by: Option<GroupBy>,
    ) -> CoreResult<CollectionStats> {
        let records = self.search(criteria)?;
        aggregate(&records, group_by).inspect_err(|e| warn!(error = %e, "statistics failed"))
    }

    /// Operation counters.
    pub fn stats(&self) -> StoreStatsSnapshot {
        self.stats.snapshot()
    }

    /// Closes the connection. Later calls fail with `Closed`; closing twice
    /// is a no-op.
    pub fn close(&self) -> CoreResult<()> {
        let conn = self.conn.lock().take();
        if let Some(conn) = conn {
            conn.close().map_err(|(_, e)| CoreError::Storage(e))?;
            debug!("closed store");
        }
        Ok(())
    }
}

/// Checks a `COUNT(*)` result.
fn row_count(n: i64) -> CoreResult<u64> {
    u64::try_from(n).map_err(|_| {
        CoreError::Codec(CodecError::OutOfRange {
            column: "COUNT(*)".to_string(),
            value: n,
        })
    })
}

impl std::fmt::Debug for StampStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StampStore")
            .field("path", &self.path)
            .field("config", &self.config)
            .field("encodings", &self.encodings)
            .field("closed", &self.is_closed())
            .finish()
    }
}
