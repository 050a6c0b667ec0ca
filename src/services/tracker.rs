//! Per-file word set tracking.
//!
//! A tracker owns the current word set of exactly one list. Reloading reads
//! a complete candidate set first and only then swaps it in, so a read that
//! fails part way leaves the previous set authoritative.

use crate::models::{Word, WordDiff, WordSet};
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Reads a word list: one word per line, trailing whitespace stripped,
/// blank lines skipped, duplicates collapsed.
///
/// # Errors
///
/// Returns [`Error::FileUnavailable`] if the file cannot be opened, a read
/// fails, or the content is not valid UTF-8.
pub fn read_word_list(path: impl AsRef<Path>) -> Result<WordSet> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::file_unavailable(path, e))?;

    let mut words = WordSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| Error::file_unavailable(path, e))?;
        if let Some(word) = Word::parse(&line) {
            words.insert(word);
        }
    }

    Ok(words)
}

/// Tracks the word set of one word list file.
#[derive(Debug, Clone)]
pub struct WordSetTracker {
    path: PathBuf,
    words: WordSet,
}

impl WordSetTracker {
    /// Reads `path` and starts tracking its words.
    ///
    /// Every word is new relative to the empty prior state; see
    /// [`Self::initial_diff`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileUnavailable`] if the list cannot be read.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn initialize(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let words = read_word_list(path)?;
        debug!(words = words.len(), "Word list loaded");
        Ok(Self {
            path: path.to_path_buf(),
            words,
        })
    }

    /// Creates a tracker from an already known word set.
    #[must_use]
    pub fn from_words(path: impl Into<PathBuf>, words: WordSet) -> Self {
        Self {
            path: path.into(),
            words,
        }
    }

    /// Re-reads the file and returns the words that were not tracked before.
    ///
    /// After success the tracked set equals the file's current content
    /// exactly, so words removed from the file are no longer tracked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileUnavailable`] if the list cannot be read; the
    /// tracked set is left untouched.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn reload(&mut self) -> Result<WordDiff> {
        let candidate = read_word_list(&self.path)?;
        Ok(self.replace(candidate))
    }

    /// Replaces the tracked set with `candidate`, returning what was added.
    pub fn replace(&mut self, candidate: WordSet) -> WordDiff {
        let diff = WordDiff::between(&self.words, &candidate);
        debug!(
            previous = self.words.len(),
            current = candidate.len(),
            added = diff.len(),
            "Word set replaced"
        );
        self.words = candidate;
        diff
    }

    /// The diff for a first observation: the whole current set.
    #[must_use]
    pub fn initial_diff(&self) -> WordDiff {
        WordDiff::initial(self.words.clone())
    }

    /// The tracked file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The tracked words.
    #[must_use]
    pub const fn words(&self) -> &WordSet {
        &self.words
    }
}
