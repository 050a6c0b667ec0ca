//! `SQLite`-backed remediation store.

use super::connection::{acquire_lock, configure_connection};
use super::sql::{clear_field_sql, delete_row_sql, select_payloads_sql};
use crate::models::{RowId, TargetTable};
use crate::storage::RemediationStore;
use crate::{Error, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, params};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::instrument;

/// Remediation store over a `SQLite` database.
///
/// The schema is owned by whoever writes the tables; this store never
/// creates or alters tables.
///
/// # Concurrency Model
///
/// Uses a `Mutex<Connection>` because `rusqlite::Connection` is not `Sync`.
/// Every delete or update runs in its own transaction and is committed
/// before the next row is touched.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the database cannot be opened.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let conn = Connection::open(&db_path).map_err(|e| Error::database("open_sqlite", e))?;
        configure_connection(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        })
    }

    /// Opens an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the database cannot be opened.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| Error::database("open_sqlite_in_memory", e))?;
        configure_connection(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Runs a batch of SQL statements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        let conn = acquire_lock(&self.conn);
        conn.execute_batch(sql)
            .map_err(|e| Error::database("execute_batch", e))
    }

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if `SQLite` refuses to close.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, e)| Error::database("close", e))
    }

    /// Runs one single-row statement inside its own committed transaction.
    fn execute_committed(&self, operation: &str, sql: &str, id: RowId) -> Result<usize> {
        let mut conn = acquire_lock(&self.conn);
        let tx = conn
            .transaction()
            .map_err(|e| Error::database(operation, e))?;
        let changed = tx
            .execute(sql, params![id.get()])
            .map_err(|e| Error::database(operation, e))?;
        tx.commit().map_err(|e| Error::database(operation, e))?;
        Ok(changed)
    }
}

/// Decodes a payload cell; text and blob columns are both accepted.
fn payload_text(value: ValueRef<'_>) -> Option<Cow<'_, str>> {
    match value {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(String::from_utf8_lossy(bytes)),
        ValueRef::Null | ValueRef::Integer(_) | ValueRef::Real(_) => None,
    }
}

impl RemediationStore for SqliteStore {
    #[instrument(skip(self, visit), fields(table = %target.table))]
    fn for_each_payload(
        &self,
        target: &TargetTable,
        visit: &mut dyn FnMut(RowId, Option<&str>),
    ) -> Result<u64> {
        let conn = acquire_lock(&self.conn);
        let mut stmt = conn
            .prepare(&select_payloads_sql(target))
            .map_err(|e| Error::database("prepare_scan", e))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| Error::database("query_scan", e))?;

        let mut visited = 0u64;
        while let Some(row) = rows.next().map_err(|e| Error::database("read_row", e))? {
            let id: i64 = row.get(0).map_err(|e| Error::database("read_row_id", e))?;
            let payload = row
                .get_ref(1)
                .map_err(|e| Error::database("read_row_payload", e))?;
            visit(RowId::new(id), payload_text(payload).as_deref());
            visited += 1;
        }

        Ok(visited)
    }

    #[instrument(skip(self), fields(table = %target.table))]
    fn delete_row(&self, target: &TargetTable, id: RowId) -> Result<()> {
        let changed = self.execute_committed("delete_row", &delete_row_sql(target), id)?;
        if changed == 0 {
            tracing::debug!(%id, "Row already gone");
        }
        Ok(())
    }

    #[instrument(skip(self), fields(table = %target.table))]
    fn clear_field(&self, target: &TargetTable, column: &str, id: RowId) -> Result<()> {
        self.execute_committed("clear_field", &clear_field_sql(target, column), id)?;
        Ok(())
    }
}
