//! `SQLite` implementation of the remediation store.
//!
//! - [`connection`]: lock acquisition and connection pragmas
//! - [`sql`]: statement construction with quoted identifiers
//! - [`store`]: the [`SqliteStore`] itself

mod connection;
mod sql;
mod store;

pub use connection::{BUSY_TIMEOUT_MS, acquire_lock, configure_connection};
pub use sql::{clear_field_sql, delete_row_sql, quote_ident, select_payloads_sql};
pub use store::SqliteStore;
