//! Sensitive word matching.
//!
//! Two rules, chosen per word:
//!
//! - ASCII words match only on ASCII word boundaries, anywhere in the
//!   payload: `ban` matches `"a ban here"` but not `"banana"`.
//! - Words containing any non-ASCII character match as a plain substring.
//!   Scripts such as CJK have no inter-word spacing, so `密` matches
//!   `"绝密文件"`.
//!
//! [`find_match`] applies the rules word by word and is meant for one-off
//! checks. [`WordMatcher`] compiles a word set into a single pattern once and
//! is what table scans use.

use crate::models::{MatchResult, Word, WordSet};
use crate::{Error, Result};
use regex::{Regex, RegexBuilder};

/// Compiled pattern size limit. Word lists can be long.
const PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Returns a word from `words` that occurs in `payload`, if any.
///
/// Words are tried in the set's iteration order and the first hit is
/// returned, so when several words match which one is reported is
/// unspecified. Empty words never match.
#[must_use]
pub fn find_match<'w>(payload: &str, words: &'w WordSet) -> MatchResult<'w> {
    words.iter().find(|word| word_matches(payload, word))
}

/// Returns true if `word` occurs in `payload` under its matching rule.
#[must_use]
pub fn word_matches(payload: &str, word: &Word) -> bool {
    let needle = word.as_str();
    if needle.is_empty() {
        return false;
    }
    if word.is_ascii() {
        contains_at_word_boundary(payload, needle)
    } else {
        payload.contains(needle)
    }
}

/// `\bneedle\b` with ASCII word characters, tried at every start offset.
fn contains_at_word_boundary(payload: &str, needle: &str) -> bool {
    let mut from = 0;
    while let Some(offset) = payload[from..].find(needle) {
        let start = from + offset;
        if is_boundary(payload, start) && is_boundary(payload, start + needle.len()) {
            return true;
        }
        // Overlapping occurrences are still candidates
        from = start + payload[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

const fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn is_boundary(haystack: &str, pos: usize) -> bool {
    let bytes = haystack.as_bytes();
    let before = pos
        .checked_sub(1)
        .and_then(|i| bytes.get(i))
        .is_some_and(|&b| is_word_byte(b));
    let after = bytes.get(pos).is_some_and(|&b| is_word_byte(b));
    before != after
}

/// A word set compiled into one regular expression.
///
/// Matches exactly what [`find_match`] matches, but scans a payload once
/// regardless of how many words are in the set.
#[derive(Debug)]
pub struct WordMatcher<'w> {
    words: &'w WordSet,
    pattern: Option<Regex>,
}

impl<'w> WordMatcher<'w> {
    /// Compiles `words`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the combined pattern exceeds the
    /// compiled size limit.
    pub fn new(words: &'w WordSet) -> Result<Self> {
        let mut bounded: Vec<String> = Vec::new();
        let mut substrings: Vec<String> = Vec::new();
        for word in words {
            let escaped = regex::escape(word.as_str());
            if word.is_ascii() {
                bounded.push(escaped);
            } else {
                substrings.push(escaped);
            }
        }

        let mut branches = Vec::with_capacity(2);
        if !bounded.is_empty() {
            branches.push(format!(r"(?-u:\b)(?:{})(?-u:\b)", bounded.join("|")));
        }
        if !substrings.is_empty() {
            branches.push(format!("(?:{})", substrings.join("|")));
        }

        let pattern = if branches.is_empty() {
            None
        } else {
            let regex = RegexBuilder::new(&branches.join("|"))
                .size_limit(PATTERN_SIZE_LIMIT)
                .build()
                .map_err(|e| Error::OperationFailed {
                    operation: "compile_word_matcher".to_string(),
                    cause: e.to_string(),
                })?;
            Some(regex)
        };

        Ok(Self { words, pattern })
    }

    /// Returns a word that occurs in `payload`, if any.
    #[must_use]
    pub fn find(&self, payload: &str) -> MatchResult<'w> {
        let pattern = self.pattern.as_ref()?;
        let found = pattern.find(payload)?;
        self.words.get(found.as_str())
    }

    /// Returns true if any word occurs in `payload`.
    #[must_use]
    pub fn is_match(&self, payload: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(payload))
    }

    /// Number of words compiled into the matcher.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the matcher can never match.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }
}
