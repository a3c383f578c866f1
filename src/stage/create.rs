//! Create stage: set up the generated folder.
//!
//! The folder is initialized fresh rather than cloned, so it never inherits
//! an `origin` pointing back at the source repository. It ends up holding one
//! empty commit on an orphan branch named after the folder, tagged so every
//! later update can reset to exactly that point. Copying the files to publish
//! is left to the user.

use super::{StageOutcome, StagePaths};
use crate::Settings;
use crate::git::Git;
use crate::output;
use crate::prompt::Confirm;
use crate::utils::paths::to_slash;
use anyhow::Result;
use tracing::{debug, info};

/// Message of the empty root commit and its tag.
const EMPTY_COMMIT_MESSAGE: &str = "empty commit";

/// Initializes a missing generated folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStage {
    paths: StagePaths,
}

impl CreateStage {
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

    /// Initialize the generated folder and optionally wire up its remote.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be spawned, or in strict mode if any
    /// git invocation fails.
    pub fn run(
        &self,
        git: &Git,
        settings: &Settings,
        confirm: &mut dyn Confirm,
    ) -> Result<StageOutcome> {
        let generated = self.paths.generated.as_path();
        let branch = self.paths.generated_branch();
        let generated_str = to_slash(generated);

        git.run_args(&["init", generated_str.as_str()], None)?;
        git.run_args(&["checkout", "--orphan", branch.as_str()], Some(generated))?;
        git.run_args(
            &["commit", "--allow-empty", "--message", EMPTY_COMMIT_MESSAGE],
            Some(generated),
        )?;
        git.run_args(
            &[
                "tag",
                settings.empty_commit_tag.as_str(),
                "--message",
                EMPTY_COMMIT_MESSAGE,
            ],
            Some(generated),
        )?;

        let remotes = git.run("remote -v", Some(&self.paths.source))?;
        let urls = distinct_remote_urls(&remotes.stdout);
        debug!(?urls, "Source remotes");

        let mut remote = None;
        let mut pushed = false;

        if let [url] = urls.as_slice() {
            git.run_args(&["remote", "add", "origin", url.as_str()], Some(generated))?;
            remote = Some(url.clone());

            if confirm.confirm("Do initial push to set upstream?")? {
                git.run_args(
                    &["push", "--set-upstream", "origin", branch.as_str()],
                    Some(generated),
                )?;
                pushed = true;
            }
        } else {
            output::warning(&format!(
                "Can't set up remote for '{branch}': found {} distinct remote URLs in the source repository, set it up manually",
                urls.len()
            ));
        }

        output::report(&format!(
            "Now copy files, maintaining sub-folders, from\n{}\nto\n{}",
            to_slash(&self.paths.source),
            generated_str
        ));

        info!(branch = %branch, remote = ?remote, pushed, "Generated folder created");
        Ok(StageOutcome::Created { remote, pushed })
    }
}

/// Distinct URLs from `git remote -v` output, in first-seen order.
///
/// Each remote is listed twice (fetch and push); the URL is the second
/// whitespace-separated field.
#[must_use]
pub fn distinct_remote_urls(remote_v: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for url in remote_v
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
    {
        if !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    }
    urls
}
