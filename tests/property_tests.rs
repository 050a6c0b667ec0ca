//! Property-based tests for word matching and word list diffs.
//!
//! Uses proptest to verify invariants across random inputs:
//! - `find_match` agrees with a brute-force boundary check
//! - The compiled `WordMatcher` agrees with `find_match`
//! - Diffs only ever contain new words
//! - Reloading an unchanged file yields an empty diff

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use std::collections::HashSet;
use wordsweep::models::{Word, WordDiff, WordSet};
use wordsweep::services::{WordMatcher, WordSetTracker, find_match};

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Tries every offset of `payload` and checks both boundaries by hand.
fn reference_matches(payload: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    if !word.is_ascii() {
        return payload.contains(word);
    }

    let haystack = payload.as_bytes();
    let needle = word.as_bytes();
    if needle.len() > haystack.len() {
        return false;
    }
    let first = is_word_byte(needle[0]);
    let last = is_word_byte(needle[needle.len() - 1]);

    (0..=haystack.len() - needle.len()).any(|start| {
        let end = start + needle.len();
        if &haystack[start..end] != needle {
            return false;
        }
        let before = start > 0 && is_word_byte(haystack[start - 1]);
        let after = end < haystack.len() && is_word_byte(haystack[end]);
        before != first && after != last
    })
}

fn word_set(lines: &[String]) -> WordSet {
    lines.iter().filter_map(|line| Word::parse(line)).collect()
}

/// A small alphabet so words and payloads collide often.
const ALPHABET: &str = "[ab_ +.密文-]";

fn payload_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex(&format!("{ALPHABET}{{0,16}}")).unwrap()
}

fn words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::string::string_regex(&format!("{ALPHABET}{{0,4}}")).unwrap(),
        0..6,
    )
}

proptest! {
    /// Property: `find_match` finds a word iff some word satisfies its rule.
    #[test]
    fn prop_find_match_agrees_with_reference(
        payload in payload_strategy(),
        lines in words_strategy(),
    ) {
        let words = word_set(&lines);
        let expected = words.iter().any(|w| reference_matches(&payload, w.as_str()));
        let found = find_match(&payload, &words);

        prop_assert_eq!(found.is_some(), expected);
        if let Some(word) = found {
            prop_assert!(reference_matches(&payload, word.as_str()));
        }
    }

    /// Property: the compiled matcher matches exactly what `find_match` matches.
    #[test]
    fn prop_compiled_matcher_agrees(
        payload in payload_strategy(),
        lines in words_strategy(),
    ) {
        let words = word_set(&lines);
        let matcher = WordMatcher::new(&words).unwrap();

        prop_assert_eq!(matcher.is_match(&payload), find_match(&payload, &words).is_some());
        if let Some(word) = matcher.find(&payload) {
            prop_assert!(words.contains(word));
            prop_assert!(reference_matches(&payload, word.as_str()));
        }
    }

    /// Property: a word equal to the whole payload always matches.
    #[test]
    fn prop_exact_payload_matches(word in "[a-z0-9_]{1,12}|[密文]{1,4}") {
        let words = word_set(&[word.clone()]);
        prop_assert!(find_match(&word, &words).is_some());
    }

    /// Property: parsed words are never empty and never end in whitespace.
    #[test]
    fn prop_parsed_words_are_trimmed(line in "[a-z \\t\\r\\n]{0,10}") {
        if let Some(word) = Word::parse(&line) {
            prop_assert!(!word.as_str().is_empty());
            prop_assert!(!word.as_str().ends_with(char::is_whitespace));
        } else {
            prop_assert!(line.trim_end().is_empty());
        }
    }

    /// Property: a diff holds exactly the words that are new.
    #[test]
    fn prop_diff_is_current_minus_previous(
        previous in prop::collection::vec("[a-e]{1,2}", 0..8),
        current in prop::collection::vec("[a-e]{1,2}", 0..8),
    ) {
        let previous = word_set(&previous);
        let current = word_set(&current);
        let diff = WordDiff::between(&previous, &current);

        for word in diff.words() {
            prop_assert!(current.contains(word));
            prop_assert!(!previous.contains(word));
        }
        for word in &current {
            prop_assert!(previous.contains(word) || diff.words().contains(word));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: reloading twice without a change yields an empty diff, and
    /// the tracked set equals the file's lines.
    #[test]
    fn prop_reload_is_idempotent(lines in prop::collection::vec("[a-z]{0,5}", 0..10)) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "seed\n").unwrap();

        let mut tracker = WordSetTracker::initialize(&path).unwrap();
        std::fs::write(&path, lines.join("\n")).unwrap();

        let first = tracker.reload().unwrap();
        let second = tracker.reload().unwrap();
        prop_assert!(second.is_empty());

        let expected: HashSet<&str> =
            lines.iter().map(String::as_str).filter(|l| !l.is_empty()).collect();
        let tracked: HashSet<&str> = tracker.words().iter().map(Word::as_str).collect();
        prop_assert_eq!(&tracked, &expected);
        prop_assert!(!first.contains("seed"));
    }
}
