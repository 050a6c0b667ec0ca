//! Data models for wordsweep.

mod target;
mod word;

pub use target::{RemediationAction, RowId, TargetKind, TargetTable};
pub use word::{MatchResult, Word, WordDiff, WordSet};
