//! Polling watch loop over one or more word lists.
//!
//! Each tracked file moves through `untracked -> tracked -> removed`:
//!
//! | Observation | Effect |
//! |-------------|--------|
//! | New file matching the source | full word set handed to the handler |
//! | mtime unchanged | nothing |
//! | mtime changed, digest unchanged | mtime recorded, no reload |
//! | mtime and digest changed | reload, only the new words handed on |
//! | File gone | dropped; re-added in full if it comes back |
//!
//! Read failures other than not-found leave the previous state in place and
//! are retried on the next poll. Handler errors end the loop.

mod registry;
mod source;

pub use registry::{WatchRegistry, WatchedFile};
pub use source::WatchSource;

use crate::models::WordDiff;
use crate::services::{ContentHasher, FileDigest, WordSetTracker};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, info, instrument, warn};

/// Longest uninterrupted sleep while waiting for the next poll.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Receives the words that became dangerous for one word list.
pub trait WordListHandler {
    /// Called with the full set when a file is first tracked, and with the
    /// diff after each content change. Never called with an empty diff.
    ///
    /// # Errors
    ///
    /// An error stops the watch loop.
    fn on_new_words(&mut self, source: &Path, diff: &WordDiff) -> Result<()>;
}

/// One tracking transition observed by the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A file started being tracked.
    Added {
        /// The word list.
        path: PathBuf,
        /// Number of words loaded.
        words: usize,
    },
    /// A tracked file disappeared.
    Removed {
        /// The word list.
        path: PathBuf,
    },
    /// A tracked file's content changed.
    Updated {
        /// The word list.
        path: PathBuf,
        /// Words present now that were absent before.
        new_words: WordDiff,
    },
    /// The mtime changed but the content did not.
    Touched {
        /// The word list.
        path: PathBuf,
    },
}

/// Result of checking one tracked file, computed before acting on it.
enum Check {
    Unchanged,
    Gone,
    Touched(SystemTime),
    Changed(SystemTime, FileDigest),
}

/// Single-threaded poller that owns all tracking state.
pub struct FileWatchLoop<H: WordListHandler> {
    source: WatchSource,
    handler: H,
    registry: WatchRegistry,
    poll_interval: Duration,
}

impl<H: WordListHandler> FileWatchLoop<H> {
    /// Creates a loop with nothing tracked yet.
    #[must_use]
    pub fn new(source: WatchSource, handler: H, poll_interval: Duration) -> Self {
        Self {
            source,
            handler,
            registry: WatchRegistry::new(),
            poll_interval,
        }
    }

    /// Tracking state.
    #[must_use]
    pub const fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    /// Borrows the handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Consumes the loop, returning the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Performs the initial check: tracks every word list present now and
    /// hands each full word set to the handler.
    ///
    /// # Errors
    ///
    /// In single-file mode a missing or unreadable file is fatal. In
    /// directory mode an unlistable directory is fatal and unreadable files
    /// are skipped. Handler errors always propagate.
    #[instrument(skip(self), fields(source = %self.source.root().display()))]
    pub fn start(&mut self) -> Result<Vec<WatchEvent>> {
        info!("Performing initial check");

        let mut events = Vec::new();
        match &self.source {
            WatchSource::File(path) => {
                let path = path.clone();
                events.push(self.track(&path)?);
            },
            WatchSource::Directory { .. } => {
                for path in self.source.list_candidates()? {
                    match self.track(&path) {
                        Ok(event) => events.push(event),
                        Err(e @ Error::FileUnavailable { .. }) => {
                            warn!(path = %path.display(), error = %e, "Skipping unreadable word list");
                        },
                        Err(e) => return Err(e),
                    }
                }
            },
        }

        self.record_tracked();
        info!(files = self.registry.len(), "Initial check complete, polling for word list updates");
        Ok(events)
    }

    /// Runs one poll cycle: checks tracked files, then looks for new ones.
    ///
    /// # Errors
    ///
    /// Returns handler errors. File errors are logged and retried.
    pub fn poll_once(&mut self) -> Result<Vec<WatchEvent>> {
        let mut events = Vec::new();

        for path in self.registry.paths() {
            if let Some(event) = self.check_tracked(&path)? {
                events.push(event);
            }
        }

        let candidates = match self.source.list_candidates() {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Failed to list word lists");
                Vec::new()
            },
        };
        for path in candidates {
            if self.registry.contains(&path) {
                continue;
            }
            match self.track(&path) {
                Ok(event) => events.push(event),
                Err(e @ Error::FileUnavailable { .. }) => {
                    warn!(path = %path.display(), error = %e, "Word list not readable yet");
                },
                Err(e) => return Err(e),
            }
        }

        self.record_tracked();
        Ok(events)
    }

    /// Polls until `shutdown` is set, sleeping `poll_interval` between
    /// cycles.
    ///
    /// # Errors
    ///
    /// Returns the first handler error.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<()> {
        while !shutdown.load(Ordering::SeqCst) {
            self.poll_once()?;
            self.sleep_until_next_poll(shutdown);
        }
        info!("Watch loop stopped");
        Ok(())
    }

    /// Loads `path`, hands its full word set on, then tracks it.
    fn track(&mut self, path: &Path) -> Result<WatchEvent> {
        let modified = modified_time(path)?;
        let digest = ContentHasher::digest_file(path)?;
        let tracker = WordSetTracker::initialize(path)?;
        let words = tracker.words().len();

        let diff = tracker.initial_diff();
        if !diff.is_empty() {
            self.handler.on_new_words(path, &diff)?;
        }

        self.registry.insert(
            path.to_path_buf(),
            WatchedFile {
                tracker,
                modified,
                digest,
            },
        );
        info!("File added: {}", path.display());
        Ok(WatchEvent::Added {
            path: path.to_path_buf(),
            words,
        })
    }

    /// Checks one tracked file and acts on what changed.
    fn check_tracked(&mut self, path: &Path) -> Result<Option<WatchEvent>> {
        match self.inspect(path) {
            Check::Unchanged => Ok(None),
            Check::Gone => {
                self.drop_file(path);
                Ok(Some(WatchEvent::Removed {
                    path: path.to_path_buf(),
                }))
            },
            Check::Touched(modified) => {
                if let Some(file) = self.registry.get_mut(path) {
                    file.modified = modified;
                }
                debug!(path = %path.display(), "Modification time changed, content unchanged");
                Ok(Some(WatchEvent::Touched {
                    path: path.to_path_buf(),
                }))
            },
            Check::Changed(modified, digest) => self.reload(path, modified, digest),
        }
    }

    /// Reloads a file whose content changed and hands on the new words.
    fn reload(
        &mut self,
        path: &Path,
        modified: SystemTime,
        digest: FileDigest,
    ) -> Result<Option<WatchEvent>> {
        let Some(file) = self.registry.get_mut(path) else {
            return Ok(None);
        };

        let diff = match file.tracker.reload() {
            Ok(diff) => diff,
            Err(e) if e.is_not_found() => {
                self.drop_file(path);
                return Ok(Some(WatchEvent::Removed {
                    path: path.to_path_buf(),
                }));
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Reload failed, keeping previous word set");
                return Ok(None);
            },
        };
        file.modified = modified;
        file.digest = digest;

        info!("Sensitive word list updated: {}", path.display());
        metrics::counter!("wordsweep_word_list_reloads_total").increment(1);

        if !diff.is_empty() {
            self.handler.on_new_words(path, &diff)?;
        }
        Ok(Some(WatchEvent::Updated {
            path: path.to_path_buf(),
            new_words: diff,
        }))
    }

    /// Compares a tracked file's mtime and digest with the recorded ones.
    fn inspect(&self, path: &Path) -> Check {
        let Some(file) = self.registry.get(path) else {
            return Check::Unchanged;
        };

        let modified = match modified_time(path) {
            Ok(modified) => modified,
            Err(e) if e.is_not_found() => return Check::Gone,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to stat word list");
                return Check::Unchanged;
            },
        };
        if modified == file.modified {
            return Check::Unchanged;
        }

        match ContentHasher::digest_file(path) {
            Ok(digest) if digest == file.digest => Check::Touched(modified),
            Ok(digest) => Check::Changed(modified, digest),
            Err(e) if e.is_not_found() => Check::Gone,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to hash word list");
                Check::Unchanged
            },
        }
    }

    fn drop_file(&mut self, path: &Path) {
        if self.registry.remove(path).is_some() {
            info!("File removed: {}", path.display());
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn record_tracked(&self) {
        metrics::gauge!("wordsweep_files_tracked").set(self.registry.len() as f64);
    }

    fn sleep_until_next_poll(&self, shutdown: &AtomicBool) {
        let deadline = Instant::now() + self.poll_interval;
        loop {
            if shutdown.load(Ordering::SeqCst) {
                return;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return;
            }
            std::thread::sleep(remaining.min(SLEEP_SLICE));
        }
    }
}

fn modified_time(path: &Path) -> Result<SystemTime> {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| Error::file_unavailable(path, e))
}
