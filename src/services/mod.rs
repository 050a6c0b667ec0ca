//! Business logic services.
//!
//! Leaves first: [`ContentHasher`] and [`WordMatcher`] are pure,
//! [`WordSetTracker`] owns one file's word set, [`Scanner`] and
//! [`Remediator`] talk to the store, and [`SweepService`] ties a scan and
//! its remediation into one pass.

mod hasher;
mod matcher;
mod remediator;
mod scanner;
mod sweep;
mod tracker;

pub use hasher::{BLOCK_SIZE, ContentHasher, FileDigest};
pub use matcher::{WordMatcher, find_match, word_matches};
pub use remediator::Remediator;
pub use scanner::{ScanOutcome, Scanner};
pub use sweep::{SweepReport, SweepService, TargetReport};
pub use tracker::{WordSetTracker, read_word_list};
