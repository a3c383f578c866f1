//! Walks the generated folder to build the tracked-file list.
//!
//! Any entry whose name starts with a dot is skipped together with everything
//! below it, which keeps `.git` (and any other hidden bookkeeping) out of the
//! list. Only regular files are tracked; symlinks are not followed.

use crate::error::GenError;
use crate::utils::paths::relative_slash;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span};
use walkdir::{DirEntry, WalkDir};

/// A file present in the generated folder and its source counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Path relative to both roots, forward slashes
    pub relative: String,
    /// Absolute path under the source folder
    pub source: PathBuf,
    /// Absolute path under the generated folder
    pub generated: PathBuf,
}

/// Scanner pairing generated files with source files
pub struct TrackedScanner<'a> {
    /// Generated folder root (walked)
    generated_root: &'a Path,
    /// Source folder root (checked for counterparts)
    source_root: &'a Path,
}

impl<'a> TrackedScanner<'a> {
    /// Create a scanner for the given folder pair
    #[must_use]
    pub const fn new(generated_root: &'a Path, source_root: &'a Path) -> Self {
        Self {
            generated_root,
            source_root,
        }
    }

    /// Collect every tracked file, sorted by path.
    ///
    /// The whole tree is checked before anything is returned, so a caller
    /// never starts copying when a counterpart is missing.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::SourceFileMissing`] for the first file (in sorted
    /// order) that has no regular-file counterpart in the source folder, or
    /// an error if the generated folder cannot be traversed.
    pub fn scan(&self) -> Result<Vec<TrackedFile>> {
        let span = span!(Level::DEBUG, "scan_tracked", root = %self.generated_root.display());
        let _guard = span.enter();

        let mut tracked = Vec::new();

        for entry in WalkDir::new(self.generated_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = entry.with_context(|| {
                format!(
                    "Failed to read directory entry in {}",
                    self.generated_root.display()
                )
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(relative) = relative_slash(entry.path(), self.generated_root) else {
                continue;
            };
            let source = self.source_root.join(&relative);

            if !source.is_file() {
                return Err(GenError::SourceFileMissing {
                    relative,
                    source_file: source,
                }
                .into());
            }

            tracked.push(TrackedFile {
                relative,
                source,
                generated: entry.path().to_path_buf(),
            });
        }

        debug!(count = tracked.len(), "Scanned tracked files");
        Ok(tracked)
    }
}

/// Entry name starts with `.`
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
