//! One scan-then-remediate pass over every target table.

use super::matcher::WordMatcher;
use super::remediator::Remediator;
use super::scanner::Scanner;
use crate::Result;
use crate::models::{RemediationAction, TargetTable, WordDiff, WordSet};
use crate::storage::RemediationStore;
use crate::watch::WordListHandler;
use std::path::Path;
use tracing::{info, instrument};

/// Outcome of a sweep on one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    /// Table name.
    pub table: String,
    /// Action applied to matches.
    pub action: RemediationAction,
    /// Rows read.
    pub scanned: u64,
    /// Rows that matched.
    pub matched: usize,
    /// Rows deleted or redacted (zero in dry-run mode).
    pub affected: usize,
}

/// Outcome of a sweep across all targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Per-table results, in target order.
    pub targets: Vec<TargetReport>,
}

impl SweepReport {
    /// Total matching rows.
    #[must_use]
    pub fn total_matched(&self) -> usize {
        self.targets.iter().map(|t| t.matched).sum()
    }

    /// Total rows deleted or redacted.
    #[must_use]
    pub fn total_affected(&self) -> usize {
        self.targets.iter().map(|t| t.affected).sum()
    }

    /// Returns the report for `table`.
    #[must_use]
    pub fn target(&self, table: &str) -> Option<&TargetReport> {
        self.targets.iter().find(|t| t.table == table)
    }
}

/// Runs scans and remediation for a word set over the configured targets.
///
/// Scanning a table completes before any of its rows are mutated, and
/// tables are processed one after another.
pub struct SweepService<'s, S: RemediationStore + ?Sized> {
    store: &'s S,
    targets: Vec<TargetTable>,
    dry_run: bool,
}

impl<'s, S: RemediationStore + ?Sized> SweepService<'s, S> {
    /// Creates a sweep service over `targets`.
    #[must_use]
    pub const fn new(store: &'s S, targets: Vec<TargetTable>) -> Self {
        Self {
            store,
            targets,
            dry_run: false,
        }
    }

    /// Reports matches without mutating any row.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The configured targets.
    #[must_use]
    pub fn targets(&self) -> &[TargetTable] {
        &self.targets
    }

    /// Sweeps every target for rows matching `words`.
    ///
    /// # Errors
    ///
    /// Returns the first scan or remediation error. Rows remediated before
    /// the error stay remediated; later targets are not visited.
    #[instrument(skip(self, words), fields(words = words.len(), dry_run = self.dry_run))]
    pub fn sweep(&self, words: &WordSet) -> Result<SweepReport> {
        let mut report = SweepReport::default();
        if words.is_empty() {
            return Ok(report);
        }

        let matcher = WordMatcher::new(words)?;
        let scanner = Scanner::new(self.store);
        let remediator = Remediator::new(self.store);

        for target in &self.targets {
            let outcome = scanner.scan_with(target, &matcher)?;
            let affected = if outcome.matched.is_empty() {
                0
            } else if self.dry_run {
                info!(
                    "{} row(s) would be {} in table '{}'",
                    outcome.matched.len(),
                    target.action.verb(),
                    target.table
                );
                0
            } else {
                remediator.remediate(target, &outcome.matched)?
            };

            report.targets.push(TargetReport {
                table: target.table.clone(),
                action: target.action.clone(),
                scanned: outcome.scanned,
                matched: outcome.matched.len(),
                affected,
            });
        }

        Ok(report)
    }
}

impl<S: RemediationStore + ?Sized> WordListHandler for SweepService<'_, S> {
    fn on_new_words(&mut self, source: &Path, diff: &WordDiff) -> Result<()> {
        if diff.is_empty() {
            return Ok(());
        }

        let report = self.sweep(diff.words())?;
        info!(
            source = %source.display(),
            words = diff.len(),
            matched = report.total_matched(),
            affected = report.total_affected(),
            "Sweep complete"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::Word;
    use crate::storage::memory::MemoryStore;

    fn set(words: &[&str]) -> WordSet {
        words.iter().filter_map(|w| Word::parse(w)).collect()
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::with_rows(
            "t_contract_call",
            &[(1, Some("this contains secret info")), (2, Some("harmless"))],
        );
        store.insert("t_tx_out", &[(10, Some("secret transfer")), (11, Some("plain"))]);
        store
    }

    fn targets() -> Vec<TargetTable> {
        vec![TargetTable::contract_call(), TargetTable::tx_out()]
    }

    #[test]
    fn test_sweep_deletes_and_redacts() {
        let store = seeded_store();
        let report = SweepService::new(&store, targets())
            .sweep(&set(&["secret"]))
            .unwrap();

        assert_eq!(report.target("t_contract_call").unwrap().affected, 1);
        assert_eq!(report.target("t_tx_out").unwrap().affected, 1);
        assert_eq!(report.total_affected(), 2);

        assert_eq!(store.ids("t_contract_call"), vec![2]);
        assert_eq!(store.ids("t_tx_out"), vec![10, 11]);
        assert_eq!(store.field("t_tx_out", 10).as_deref(), Some(""));
    }

    #[test]
    fn test_dry_run_mutates_nothing() {
        let store = seeded_store();
        let report = SweepService::new(&store, targets())
            .with_dry_run(true)
            .sweep(&set(&["secret"]))
            .unwrap();

        assert_eq!(report.total_matched(), 2);
        assert_eq!(report.total_affected(), 0);
        assert!(store.mutations.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_words_do_nothing() {
        let store = seeded_store();
        let report = SweepService::new(&store, targets())
            .sweep(&WordSet::new())
            .unwrap();
        assert!(report.targets.is_empty());
    }

    #[test]
    fn test_handler_ignores_empty_diff() {
        let store = seeded_store();
        let mut service = SweepService::new(&store, targets());
        service
            .on_new_words(Path::new("words.txt"), &WordDiff::default())
            .unwrap();
        assert!(store.mutations.lock().unwrap().is_empty());

        service
            .on_new_words(Path::new("words.txt"), &WordDiff::initial(set(&["harmless"])))
            .unwrap();
        assert_eq!(store.ids("t_contract_call"), vec![1]);
    }
}
