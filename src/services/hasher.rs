//! Streaming content digests for word list files.
//!
//! A changed modification time alone does not mean a word list changed
//! (`touch`, editors re-saving identical content). The digest is compared
//! before any reload so that only real edits trigger a rescan.

use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read block size. Memory use is bounded by this, not by the file size.
pub const BLOCK_SIZE: usize = 64 * 1024;

/// SHA256 digest of a file's full byte content.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileDigest([u8; 32]);

impl FileDigest {
    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the lowercase hex encoding (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileDigest({})", self.to_hex())
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Content hasher for change detection.
///
/// Unlike a normalizing hasher, every byte counts: a whitespace-only edit
/// produces a different digest.
///
/// # Example
///
/// ```rust
/// use wordsweep::services::ContentHasher;
///
/// let a = ContentHasher::digest_bytes(b"secret\n");
/// let b = ContentHasher::digest_bytes(b"secret\n");
/// assert_eq!(a, b);
/// assert_eq!(a.to_hex().len(), 64);
/// ```
pub struct ContentHasher;

impl ContentHasher {
    /// Digests the file at `path`, streaming it in [`BLOCK_SIZE`] blocks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileUnavailable`] if the file cannot be opened or a
    /// read fails part way. No partial digest is ever returned.
    pub fn digest_file(path: impl AsRef<Path>) -> Result<FileDigest> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::file_unavailable(path, e))?;
        Self::digest_reader(file).map_err(|e| Error::file_unavailable(path, e))
    }

    /// Digests everything `reader` yields.
    ///
    /// # Errors
    ///
    /// Propagates the first non-interrupt read error.
    pub fn digest_reader<R: Read>(mut reader: R) -> io::Result<FileDigest> {
        let mut hasher = Sha256::new();
        let mut block = vec![0u8; BLOCK_SIZE];

        loop {
            match reader.read(&mut block) {
                Ok(0) => break,
                Ok(n) => hasher.update(&block[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
                Err(e) => return Err(e),
            }
        }

        Ok(Self::finish(hasher))
    }

    /// Digests an in-memory buffer.
    #[must_use]
    pub fn digest_bytes(bytes: &[u8]) -> FileDigest {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self::finish(hasher)
    }

    fn finish(hasher: Sha256) -> FileDigest {
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        FileDigest(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Reader that fails after yielding some bytes.
    struct FailingReader {
        yielded: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.yielded {
                Err(io::Error::other("disk went away"))
            } else {
                self.yielded = true;
                buf[0] = b'x';
                Ok(1)
            }
        }
    }

    #[test]
    fn test_same_content_same_digest() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "secret\ntoken\n").unwrap();
        std::fs::write(&b, "secret\ntoken\n").unwrap();

        assert_eq!(
            ContentHasher::digest_file(&a).unwrap(),
            ContentHasher::digest_file(&b).unwrap()
        );
    }

    #[test]
    fn test_single_byte_difference_changes_digest() {
        let a = ContentHasher::digest_bytes(b"secret\n");
        let b = ContentHasher::digest_bytes(b"secret \n");
        assert_ne!(a, b);
    }

    #[test]
    fn test_file_matches_in_memory_digest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("绝密\nban\n".as_bytes()).unwrap();
        file.flush().unwrap();

        assert_eq!(
            ContentHasher::digest_file(file.path()).unwrap(),
            ContentHasher::digest_bytes("绝密\nban\n".as_bytes())
        );
    }

    #[test]
    fn test_large_file_spans_blocks() {
        let content = vec![b'a'; BLOCK_SIZE * 3 + 17];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&content).unwrap();
        file.flush().unwrap();

        assert_eq!(
            ContentHasher::digest_file(file.path()).unwrap(),
            ContentHasher::digest_bytes(&content)
        );
    }

    #[test]
    fn test_empty_content_digest() {
        // SHA256 of the empty string
        assert_eq!(
            ContentHasher::digest_bytes(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentHasher::digest_file(dir.path().join("nope.txt")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_failed_read_returns_no_digest() {
        let result = ContentHasher::digest_reader(FailingReader { yielded: false });
        assert!(result.is_err());
    }
}
