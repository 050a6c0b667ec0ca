//! Read-only table scans.

use super::matcher::WordMatcher;
use crate::Result;
use crate::models::{RowId, TargetTable, WordSet};
use crate::storage::RemediationStore;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Rows of one table that matched a word set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Distinct ids of matching rows, in scan order.
    pub matched: Vec<RowId>,
    /// Number of rows read.
    pub scanned: u64,
}

/// Collects the ids of rows whose payload contains a word.
///
/// Never mutates the store. Rows are streamed, so memory use depends on the
/// number of matches rather than on the table size.
pub struct Scanner<'s, S: RemediationStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: RemediationStore + ?Sized> Scanner<'s, S> {
    /// Creates a scanner over `store`.
    #[must_use]
    pub const fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Scans `target` for rows matching any word in `words`.
    ///
    /// # Errors
    ///
    /// Returns an error if the word set cannot be compiled or the query fails.
    pub fn scan(&self, target: &TargetTable, words: &WordSet) -> Result<Vec<RowId>> {
        let matcher = WordMatcher::new(words)?;
        Ok(self.scan_with(target, &matcher)?.matched)
    }

    /// Scans `target` with an already compiled matcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[instrument(skip(self, matcher), fields(table = %target.table, column = %target.payload_column))]
    pub fn scan_with(&self, target: &TargetTable, matcher: &WordMatcher<'_>) -> Result<ScanOutcome> {
        if matcher.is_empty() {
            return Ok(ScanOutcome::default());
        }

        let mut matched = Vec::new();
        let mut seen = HashSet::new();
        let scanned = self.store.for_each_payload(target, &mut |id, payload| {
            let Some(payload) = payload else {
                return;
            };
            if let Some(word) = matcher.find(payload) {
                if seen.insert(id) {
                    debug!(%id, %word, "Row matched");
                    matched.push(id);
                }
            }
        })?;

        metrics::counter!("wordsweep_rows_scanned_total", "table" => target.table.clone())
            .increment(scanned);

        Ok(ScanOutcome { matched, scanned })
    }
}
