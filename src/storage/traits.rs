//! Store trait for remediation targets.

use crate::Result;
use crate::models::{RowId, TargetTable};

/// A relational store holding the tables that are kept clean.
///
/// Mutating methods commit on their own before returning: a failure part
/// way through a batch leaves every earlier row mutation applied.
/// Mutations are idempotent, so replaying a partially applied batch is
/// harmless.
pub trait RemediationStore: Send + Sync {
    /// Streams `(row id, payload)` for every row of `target`.
    ///
    /// A `NULL` payload is passed as `None`. Returns the number of rows
    /// visited.
    fn for_each_payload(
        &self,
        target: &TargetTable,
        visit: &mut dyn FnMut(RowId, Option<&str>),
    ) -> Result<u64>;

    /// Deletes one row by primary key and commits.
    ///
    /// Deleting a row that no longer exists is not an error.
    fn delete_row(&self, target: &TargetTable, id: RowId) -> Result<()>;

    /// Sets `column` of one row to the empty string and commits.
    fn clear_field(&self, target: &TargetTable, column: &str, id: RowId) -> Result<()>;
}
