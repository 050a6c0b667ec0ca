//! Connection handling for the `SQLite` store.

use crate::Result;
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};

/// Busy timeout applied to every connection, in milliseconds.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// Acquires the connection lock, recovering from poison.
///
/// A panic while the lock was held leaves the connection itself usable:
/// every statement either committed or was rolled back when its
/// transaction dropped.
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("SQLite mutex was poisoned, recovering");
            metrics::counter!("wordsweep_sqlite_mutex_poison_recovery_total").increment(1);
            poisoned.into_inner()
        },
    }
}

/// Configures a connection for a long-running daemon sharing the database
/// with other writers.
///
/// - **WAL mode**: readers of other processes are not blocked by our deletes
/// - **NORMAL synchronous**: each per-row commit stays cheap
/// - **`busy_timeout`**: waits for competing writers instead of failing
///
/// # Errors
///
/// Never fails today; pragma results are ignored because in-memory
/// databases reject WAL.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    let _ = conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS);

    Ok(())
}
