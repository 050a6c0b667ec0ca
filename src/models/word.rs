//! Words, word sets and reload diffs.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

/// A single entry from a sensitive word list.
///
/// Words are compared byte-for-byte after trailing whitespace (including the
/// line terminator) has been stripped. A word is never empty: blank lines
/// are rejected by [`Word::parse`], so an empty needle can never match every
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(String);

impl Word {
    /// Parses one line of a word list.
    ///
    /// Returns `None` for lines that are empty once trailing whitespace is
    /// removed. Leading whitespace is kept as part of the word.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the word as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if every character of the word is ASCII.
    ///
    /// ASCII words match on word boundaries, everything else matches as a
    /// plain substring.
    #[must_use]
    pub fn is_ascii(&self) -> bool {
        self.0.is_ascii()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Word {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The tracked words of one list. Iteration order is unspecified.
pub type WordSet = HashSet<Word>;

/// Result of matching a payload: the word that matched, if any.
///
/// When several words match, which one is reported is unspecified.
pub type MatchResult<'a> = Option<&'a Word>;

/// Words present after a reload that were absent before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordDiff {
    added: WordSet,
}

impl WordDiff {
    /// Computes `current - previous`.
    #[must_use]
    pub fn between(previous: &WordSet, current: &WordSet) -> Self {
        Self {
            added: current.difference(previous).cloned().collect(),
        }
    }

    /// A diff where every word is new, used the first time a list is seen.
    #[must_use]
    pub const fn initial(words: WordSet) -> Self {
        Self { added: words }
    }

    /// Returns true if no word was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }

    /// Number of added words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.added.len()
    }

    /// Returns true if `word` was added.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.added.contains(word)
    }

    /// Borrows the added words.
    #[must_use]
    pub const fn words(&self) -> &WordSet {
        &self.added
    }

    /// Consumes the diff, yielding the added words.
    #[must_use]
    pub fn into_words(self) -> WordSet {
        self.added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> WordSet {
        words.iter().filter_map(|w| Word::parse(w)).collect()
    }

    #[test]
    fn test_parse_strips_trailing_whitespace() {
        assert_eq!(Word::parse("secret\n").map(|w| w.0), Some("secret".to_string()));
        assert_eq!(Word::parse("secret \r\n").map(|w| w.0), Some("secret".to_string()));
        assert_eq!(Word::parse("two words\t").map(|w| w.0), Some("two words".to_string()));
    }

    #[test]
    fn test_parse_keeps_leading_whitespace() {
        assert_eq!(Word::parse("  lead").map(|w| w.0), Some("  lead".to_string()));
    }

    #[test]
    fn test_parse_rejects_blank_lines() {
        assert!(Word::parse("").is_none());
        assert!(Word::parse("\n").is_none());
        assert!(Word::parse("   \t\r\n").is_none());
    }

    #[test]
    fn test_is_ascii() {
        assert!(Word::parse("token").is_some_and(|w| w.is_ascii()));
        assert!(Word::parse("密").is_some_and(|w| !w.is_ascii()));
        assert!(Word::parse("café").is_some_and(|w| !w.is_ascii()));
    }

    #[test]
    fn test_set_lookup_by_str() {
        let words = set(&["a", "b"]);
        assert!(words.contains("a"));
        assert!(!words.contains("c"));
    }

    #[test]
    fn test_diff_between() {
        let diff = WordDiff::between(&set(&["a", "b"]), &set(&["a", "b", "c"]));
        assert_eq!(diff.len(), 1);
        assert!(diff.contains("c"));

        let shrunk = WordDiff::between(&set(&["a", "b"]), &set(&["a"]));
        assert!(shrunk.is_empty());
    }

    #[test]
    fn test_initial_diff_is_whole_set() {
        let words = set(&["x", "y"]);
        let diff = WordDiff::initial(words.clone());
        assert_eq!(diff.words(), &words);
        assert_eq!(diff.into_words(), words);
    }
}
