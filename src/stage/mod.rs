//! # Stages
//!
//! A run of genbranch is exactly one of two stages, picked from what exists
//! on disk:
//!
//! - [`create::CreateStage`] when the generated folder does not exist yet:
//!   initialize it as a repository holding one empty, tagged commit on an
//!   orphan branch.
//! - [`update::UpdateStage`] when it does: refresh every tracked file from the
//!   source and, if anything changed, replace the branch's single commit.
//!
//! [`resolve`] decides which one applies; [`execute`] is the whole
//! interactive sequence the binary runs.

use crate::Settings;
use crate::git::Git;
use crate::output;
use crate::prompt::Confirm;
use crate::utils::paths::to_slash;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{Level, info, span};

/// Initial setup of the generated folder
pub mod create;

/// Folder pair resolution
pub mod resolve;

/// Refresh and recommit of the generated folder
pub mod update;

pub use create::CreateStage;
pub use resolve::{derive_paths, resolve, select};
pub use update::UpdateStage;

/// The source folder and its generated sibling, both absolute with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePaths {
    /// The real project folder
    pub source: PathBuf,
    /// The companion folder holding the publishable snapshot
    pub generated: PathBuf,
}

impl StagePaths {
    /// Branch name used for the generated folder's orphan branch.
    #[must_use]
    pub fn generated_branch(&self) -> String {
        folder_name(&self.generated)
    }
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// What a stage run ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The user declined to continue; nothing was touched.
    Cancelled,
    /// The generated folder was initialized.
    Created {
        /// Remote URL copied from the source repository, if exactly one was found
        remote: Option<String>,
        /// Whether the initial upstream push was run
        pushed: bool,
    },
    /// Tracked files already matched the committed snapshot.
    Unchanged,
    /// The branch's single commit was replaced.
    Committed {
        /// Tracked paths whose content changed
        changed: Vec<String>,
        /// Previously committed paths no longer present
        removed: Vec<String>,
        /// Whether the force push was run
        pushed: bool,
    },
}

/// The stage selected for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Generated folder missing
    Create(CreateStage),
    /// Generated folder present
    Update(UpdateStage),
}

impl Stage {
    /// Folder pair this stage works on.
    #[must_use]
    pub const fn paths(&self) -> &StagePaths {
        match self {
            Self::Create(stage) => stage.paths(),
            Self::Update(stage) => stage.paths(),
        }
    }

    /// One-line description shown before asking to continue.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Create(_) => "Create the branch for generated files",
            Self::Update(_) => "Update the branch for generated files",
        }
    }

    /// Run the stage.
    ///
    /// # Errors
    ///
    /// Propagates the stage's fatal errors; see [`CreateStage::run`] and
    /// [`UpdateStage::run`].
    pub fn run(
        &self,
        git: &Git,
        settings: &Settings,
        confirm: &mut dyn Confirm,
    ) -> Result<StageOutcome> {
        match self {
            Self::Create(stage) => stage.run(git, settings, confirm),
            Self::Update(stage) => stage.run(git, settings, confirm),
        }
    }
}

/// Resolve the stage from `start` (or the current directory), show it, ask
/// to continue and run it.
///
/// # Errors
///
/// Returns the resolver's fatal errors, the stage's errors, or an error if
/// the confirmation cannot be read.
pub fn execute(
    git: &Git,
    settings: &Settings,
    start: Option<&Path>,
    confirm: &mut dyn Confirm,
) -> Result<StageOutcome> {
    let stage = resolve(git, settings, start)?;
    let paths = stage.paths();

    output::report(&format!("Real branch: {}", to_slash(&paths.source)));
    output::report(&format!("Generated branch: {}", to_slash(&paths.generated)));
    output::report(&format!("At stage:\n  {}", stage.description()));

    if !confirm.confirm("Continue?")? {
        return Ok(StageOutcome::Cancelled);
    }

    let span = span!(Level::INFO, "stage", kind = stage.description());
    let _guard = span.enter();

    let outcome = stage.run(git, settings, confirm)?;
    info!(?outcome, "Stage finished");
    Ok(outcome)
}
