//! Storage layer for remediation targets.
//!
//! The daemon receives an already-configured store and only ever issues
//! full-table reads, single-row deletes, and single-row field clears.

// Allow significant_drop_tightening - the connection guard is held for the
// duration of each statement anyway.
#![allow(clippy::significant_drop_tightening)]

#[cfg(test)]
pub(crate) mod memory;
pub mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::RemediationStore;
