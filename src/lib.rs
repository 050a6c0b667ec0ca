//! # Wordsweep
//!
//! Keeps a relational store free of rows whose text payload contains a
//! word from one or more watched sensitive word lists.
//!
//! The daemon polls its word lists, works out which words are new since the
//! last successful read, scans the configured tables for rows matching only
//! those new words, and deletes or redacts the matching rows one commit at a
//! time.
//!
//! ## Pipeline
//!
//! - [`services::ContentHasher`] tells real edits apart from timestamp churn
//! - [`services::WordSetTracker`] produces the [`models::WordDiff`] of a reload
//! - [`services::WordMatcher`] decides whether a payload contains a word
//! - [`services::Scanner`] collects matching row ids for a target table
//! - [`services::Remediator`] deletes or redacts those rows
//! - [`watch::FileWatchLoop`] drives all of the above
//!
//! ## Example
//!
//! ```rust,ignore
//! use wordsweep::services::{SweepService, WordSetTracker};
//! use wordsweep::storage::SqliteStore;
//!
//! let store = SqliteStore::open("moderation.db")?;
//! let sweep = SweepService::new(&store, config.targets.clone());
//! let tracker = WordSetTracker::initialize("banned.txt")?;
//! let report = sweep.sweep(tracker.words())?;
//! println!("{} row(s) affected", report.total_affected());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
pub mod watch;

pub use config::{SweepConfig, TargetsConfig, WatchConfig};
pub use models::{
    MatchResult, RemediationAction, RowId, TargetKind, TargetTable, Word, WordDiff, WordSet,
};
pub use services::{
    ContentHasher, FileDigest, Remediator, Scanner, SweepReport, SweepService, WordMatcher,
    WordSetTracker, find_match,
};
pub use storage::{RemediationStore, SqliteStore};
pub use watch::{FileWatchLoop, WatchEvent, WatchRegistry, WatchSource, WordListHandler};

/// Error type for wordsweep operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `FileUnavailable` | A word list is missing, unreadable, or fails mid-read |
/// | `InvalidInput` | Bad configuration values or CLI arguments |
/// | `Database` | A query, execute, or commit against the store fails |
/// | `OperationFailed` | Logging/metrics init, config parsing, pattern compilation |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A word list file could not be read.
    ///
    /// Recoverable while polling (the file is dropped or retried), fatal
    /// when the single required file is missing at startup.
    #[error("file unavailable: {}: {cause}", path.display())]
    FileUnavailable {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        cause: std::io::Error,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A database operation failed.
    ///
    /// Rows committed before the failure stay committed.
    #[error("database operation '{operation}' failed: {cause}")]
    Database {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds a [`Error::FileUnavailable`] for `path`.
    pub fn file_unavailable(path: impl AsRef<Path>, cause: std::io::Error) -> Self {
        Self::FileUnavailable {
            path: path.as_ref().to_path_buf(),
            cause,
        }
    }

    /// Builds a [`Error::Database`] from a `rusqlite` error.
    #[allow(clippy::needless_pass_by_value)]
    pub fn database(operation: &str, cause: rusqlite::Error) -> Self {
        Self::Database {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Returns true if this is a file error caused by the file not existing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FileUnavailable { cause, .. } if cause.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Result type alias for wordsweep operations.
pub type Result<T> = std::result::Result<T, Error>;
