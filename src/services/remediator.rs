//! Row remediation: delete or redact, one commit per row.
//!
//! Rows are never batched into one transaction. If the store fails part
//! way, every row handled before the failure stays remediated and the error
//! ends the pass; re-running with the same ids is harmless.

use crate::Result;
use crate::models::{RemediationAction, RowId, TargetTable};
use crate::storage::RemediationStore;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Applies a target's remediation action to matching rows.
pub struct Remediator<'s, S: RemediationStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: RemediationStore + ?Sized> Remediator<'s, S> {
    /// Creates a remediator over `store`.
    #[must_use]
    pub const fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Applies `target.action` to every id, returning the number processed.
    ///
    /// # Errors
    ///
    /// Returns the first store error; earlier rows stay committed.
    pub fn remediate(&self, target: &TargetTable, ids: &[RowId]) -> Result<usize> {
        match &target.action {
            RemediationAction::Delete => self.delete_rows(target, ids),
            RemediationAction::Redact { column } => self.redact_rows(target, ids, column),
        }
    }

    /// Deletes each row, committing after every delete.
    ///
    /// The count is the number of ids processed, including ids whose row was
    /// already gone.
    ///
    /// # Errors
    ///
    /// Returns the first store error; earlier deletes stay committed.
    #[instrument(skip(self, ids), fields(table = %target.table, rows = ids.len()))]
    pub fn delete_rows(&self, target: &TargetTable, ids: &[RowId]) -> Result<usize> {
        let count = Self::for_each_distinct(ids, |id| self.store.delete_row(target, id))?;

        info!("{count} row(s) deleted in table '{}'", target.table);
        metrics::counter!("wordsweep_rows_deleted_total", "table" => target.table.clone())
            .increment(count as u64);
        Ok(count)
    }

    /// Clears `column` on each row, committing after every update.
    ///
    /// # Errors
    ///
    /// Returns the first store error; earlier updates stay committed.
    #[instrument(skip(self, ids), fields(table = %target.table, rows = ids.len()))]
    pub fn redact_rows(&self, target: &TargetTable, ids: &[RowId], column: &str) -> Result<usize> {
        let count =
            Self::for_each_distinct(ids, |id| self.store.clear_field(target, column, id))?;

        info!("{count} row(s) updated in table '{}'", target.table);
        metrics::counter!("wordsweep_rows_redacted_total", "table" => target.table.clone())
            .increment(count as u64);
        Ok(count)
    }

    /// Runs `apply` once per distinct id, in order.
    fn for_each_distinct(
        ids: &[RowId],
        mut apply: impl FnMut(RowId) -> Result<()>,
    ) -> Result<usize> {
        let mut seen = HashSet::with_capacity(ids.len());
        let mut count = 0;
        for &id in ids {
            if !seen.insert(id) {
                debug!(%id, "Skipping repeated row id");
                continue;
            }
            apply(id)?;
            count += 1;
        }
        Ok(count)
    }
}
