//! Fatal error taxonomy.
//!
//! Precondition failures are typed so `main` can map them to the fixed exit
//! code; everything else travels as a plain `anyhow::Error` and exits with 1.

use crate::FATAL_EXIT_CODE;
use crate::git::errors::GitError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a run before (or instead of) touching the branch.
#[derive(Debug, Error)]
pub enum GenError {
    /// The derived source folder is not a directory.
    #[error("'{}' (real branch) doesn't exist.", .0.display())]
    SourceFolderMissing(PathBuf),

    /// A file tracked in the generated folder has no counterpart in the source.
    #[error("'{}' not present (tracked as '{relative}')", .source_file.display())]
    SourceFileMissing {
        /// Path relative to the generated folder root, forward slashes.
        relative: String,
        /// Absolute path that was expected in the source folder.
        source_file: PathBuf,
    },

    /// The working directory is not inside a git work tree.
    #[error("Couldn't determine stage: '{}' is not inside a git work tree", .0.display())]
    StageUnresolved(PathBuf),

    /// No `git` executable on the search path.
    #[error("git executable not found on PATH: {0}")]
    GitNotFound(String),

    /// A git invocation failed while running in strict mode.
    #[error("{0}")]
    GitFailed(GitError),

    /// Resetting to the empty-commit tag failed, so committing would stack history.
    #[error("Could not reset '{}' to tag '{tag}'; refusing to commit on top of existing history", .path.display())]
    ResetFailed {
        /// Generated folder.
        path: PathBuf,
        /// Empty-commit tag that could not be reset to.
        tag: String,
    },

    /// The snapshot commit failed after the reset, leaving HEAD on the empty commit.
    #[error("Could not commit the updated files in '{}'; the branch was left at the empty commit and nothing was pushed", .0.display())]
    CommitFailed(PathBuf),
}

impl GenError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::SourceFolderMissing(_)
            | Self::SourceFileMissing { .. }
            | Self::StageUnresolved(_)
            | Self::GitNotFound(_) => FATAL_EXIT_CODE,
            Self::GitFailed(_) | Self::ResetFailed { .. } | Self::CommitFailed(_) => 1,
        }
    }
}

/// Exit code for any error coming out of a run.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<GenError>()
        .map_or(1, GenError::exit_code)
}
