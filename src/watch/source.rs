//! Where word lists come from.

use crate::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// A single word list, or every matching file in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSource {
    /// One required file. Missing at startup is fatal.
    File(PathBuf),
    /// Regular files in `dir` whose extension is `extension`.
    Directory {
        /// Directory that is listed on every poll.
        dir: PathBuf,
        /// Extension without the leading dot.
        extension: String,
    },
}

impl WatchSource {
    /// Directory mode if `path` is a directory, single-file mode otherwise.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>, extension: &str) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::Directory {
                dir: path,
                extension: extension.trim_start_matches('.').to_string(),
            }
        } else {
            Self::File(path)
        }
    }

    /// Returns true in single-file mode.
    #[must_use]
    pub const fn is_single_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// The configured file or directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        match self {
            Self::File(path) => path,
            Self::Directory { dir, .. } => dir,
        }
    }

    /// Word list files currently present, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileUnavailable`] if the directory cannot be listed.
    pub fn list_candidates(&self) -> Result<Vec<PathBuf>> {
        match self {
            Self::File(path) => Ok(if path.is_file() {
                vec![path.clone()]
            } else {
                Vec::new()
            }),
            Self::Directory { dir, extension } => {
                let entries =
                    std::fs::read_dir(dir).map_err(|e| Error::file_unavailable(dir, e))?;
                let mut files: Vec<PathBuf> = entries
                    .filter_map(std::result::Result::ok)
                    .map(|entry| entry.path())
                    .filter(|path| path.is_file() && has_extension(path, extension))
                    .collect();
                files.sort();
                Ok(files)
            },
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(OsStr::to_str) == Some(extension)
}
