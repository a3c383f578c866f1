//! Update stage: refresh the generated folder and replace its commit.
//!
//! ## Invariants
//!
//! - Nothing is copied or staged unless every tracked file has a source
//!   counterpart.
//! - The branch holds at most one commit on top of the empty-commit tag: a
//!   change resets to the tag (keeping the work tree) and commits once.
//! - No change means no commit; running twice in a row is a no-op.

use super::{StageOutcome, StagePaths};
use crate::Settings;
use crate::error::GenError;
use crate::git::Git;
use crate::output;
use crate::prompt::Confirm;
use crate::tracking::{ChangeSet, TrackedFile, TrackedScanner};
use crate::utils::paths::ensure_parent_dirs;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{Level, debug, info, span};

/// Message of the single substantive commit.
const UPDATE_COMMIT_MESSAGE: &str = "updated files";

/// Paths per `git add` invocation, to stay clear of command-line length limits.
const ADD_BATCH: usize = 64;

/// Refreshes an existing generated folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStage {
    paths: StagePaths,
}

impl UpdateStage {
    /// Stage for the given folder pair.
    #[must_use]
    pub const fn new(paths: StagePaths) -> Self {
        Self { paths }
    }

    /// Folder pair.
    #[must_use]
    pub const fn paths(&self) -> &StagePaths {
        &self.paths
    }

    /// Copy, compare, recommit and optionally force-push.
    ///
    /// # Errors
    ///
    /// - [`GenError::SourceFileMissing`] before anything is copied
    /// - [`GenError::ResetFailed`] if the reset to the empty-commit tag fails
    /// - [`GenError::CommitFailed`] if the snapshot commit fails; nothing is pushed
    /// - an error if a file cannot be copied, or (strict mode) a git call fails
    pub fn run(
        &self,
        git: &Git,
        settings: &Settings,
        confirm: &mut dyn Confirm,
    ) -> Result<StageOutcome> {
        let generated = self.paths.generated.as_path();

        let tracked = TrackedScanner::new(generated, &self.paths.source).scan()?;
        info!(count = tracked.len(), "Tracked files");

        copy_from_source(&tracked)?;
        stage_files(git, generated, &tracked)?;

        let status = git.run("status --porcelain", Some(generated))?;
        let changes = ChangeSet::parse(&status.stdout)
            .relevant_to(tracked.iter().map(|t| t.relative.as_str()));

        if changes.is_empty() {
            output::report("No changed files");
            return Ok(StageOutcome::Unchanged);
        }
        debug!(changes = changes.len(), "Changes detected");

        self.reset_to_empty_commit(git, settings)?;
        stage_files(git, generated, &tracked)?;

        let changed = changes.updated();
        let removed = changes.removed();
        for path in &changed {
            output::action("Updating", path);
        }
        for path in &removed {
            output::action("Removing", path);
        }

        // Every tracked file gone: the snapshot is the empty tree.
        let mut commit_args = vec!["commit", "--message", UPDATE_COMMIT_MESSAGE];
        if tracked.is_empty() {
            commit_args.push("--allow-empty");
        }
        let commit = git.run_args(&commit_args, Some(generated))?;
        if !commit.success {
            return Err(GenError::CommitFailed(self.paths.generated.clone()).into());
        }
        output::report(&git.stdout("status", Some(generated))?);

        let mut pushed = false;
        if confirm.confirm("Push (force) changes to remote?")? {
            git.run("push --force", Some(generated))?;
            pushed = true;
        }

        Ok(StageOutcome::Committed {
            changed,
            removed,
            pushed,
        })
    }

    /// Move the branch back to the empty commit, keeping the work tree.
    ///
    /// Checked even in lenient mode: committing after a failed reset would
    /// stack a second commit on the previous snapshot.
    fn reset_to_empty_commit(&self, git: &Git, settings: &Settings) -> Result<()> {
        let generated = self.paths.generated.as_path();
        let reset = git.run_args(
            &["reset", "--mixed", settings.empty_commit_tag.as_str()],
            Some(generated),
        )?;

        if !reset.success {
            return Err(GenError::ResetFailed {
                path: self.paths.generated.clone(),
                tag: settings.empty_commit_tag.clone(),
            }
            .into());
        }
        Ok(())
    }
}

/// Overwrite every tracked file with the current source bytes.
fn copy_from_source(tracked: &[TrackedFile]) -> Result<()> {
    let span = span!(Level::DEBUG, "copy_from_source", files = tracked.len());
    let _guard = span.enter();

    for file in tracked {
        ensure_parent_dirs(&file.generated)?;
        let bytes = fs::copy(&file.source, &file.generated).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                file.source.display(),
                file.generated.display()
            )
        })?;
        debug!(path = %file.relative, bytes, "Copied");
    }
    Ok(())
}

/// `git add` every tracked path. Names are taken literally, so `:` prefixes
/// and glob characters are never read as pathspec magic.
fn stage_files(git: &Git, generated: &Path, tracked: &[TrackedFile]) -> Result<()> {
    for batch in tracked.chunks(ADD_BATCH) {
        let mut args = vec!["--literal-pathspecs", "add", "--"];
        args.extend(batch.iter().map(|t| t.relative.as_str()));
        git.run_args(&args, Some(generated))?;
    }
    Ok(())
}
