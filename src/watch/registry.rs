//! Per-file tracking state, owned by the watch loop.

use crate::services::{FileDigest, WordSetTracker};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A tracked word list.
#[derive(Debug)]
pub struct WatchedFile {
    /// Current word set of the file.
    pub tracker: WordSetTracker,
    /// Modification time seen at the last successful check.
    pub modified: SystemTime,
    /// Digest of the content the tracker was loaded from.
    pub digest: FileDigest,
}

/// Map of tracked word lists keyed by path.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    files: BTreeMap<PathBuf, WatchedFile>,
}

impl WatchRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `path`, replacing any previous state.
    pub fn insert(&mut self, path: PathBuf, file: WatchedFile) {
        self.files.insert(path, file);
    }

    /// Stops tracking `path`.
    pub fn remove(&mut self, path: &Path) -> Option<WatchedFile> {
        self.files.remove(path)
    }

    /// Returns true if `path` is tracked.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Borrows the state of `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&WatchedFile> {
        self.files.get(path)
    }

    /// Mutably borrows the state of `path`.
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut WatchedFile> {
        self.files.get_mut(path)
    }

    /// Tracked paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.keys().cloned().collect()
    }

    /// Number of tracked files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WordSet;
    use crate::services::ContentHasher;

    fn watched(path: &str) -> WatchedFile {
        WatchedFile {
            tracker: WordSetTracker::from_words(path, WordSet::new()),
            modified: SystemTime::UNIX_EPOCH,
            digest: ContentHasher::digest_bytes(b""),
        }
    }

    #[test]
    fn test_insert_and_remove() {
        let mut registry = WatchRegistry::new();
        assert!(registry.is_empty());

        registry.insert(PathBuf::from("b.txt"), watched("b.txt"));
        registry.insert(PathBuf::from("a.txt"), watched("a.txt"));
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.paths(),
            vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]
        );

        assert!(registry.remove(Path::new("a.txt")).is_some());
        assert!(!registry.contains(Path::new("a.txt")));
        assert!(registry.remove(Path::new("a.txt")).is_none());
    }

    #[test]
    fn test_get_mut_updates_state() {
        let mut registry = WatchRegistry::new();
        registry.insert(PathBuf::from("a.txt"), watched("a.txt"));

        let later = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(60);
        if let Some(file) = registry.get_mut(Path::new("a.txt")) {
            file.modified = later;
        }
        assert_eq!(
            registry.get(Path::new("a.txt")).map(|f| f.modified),
            Some(later)
        );
    }
}
