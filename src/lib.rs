#![warn(missing_docs)]
#![allow(clippy::arithmetic_side_effects)] // Simple counters cannot overflow
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # Genbranch - History-less Publishing of Generated Files
//!
//! Genbranch keeps a project's generated (often large, binary) output files in a
//! sibling folder that holds a separate git repository with a single orphan
//! branch. Every update replaces the branch's one substantive commit instead of
//! stacking new ones on top, so a publishing target only ever receives the
//! latest snapshot and the repository never bloats with historical binary diffs.
//!
//! ## Layout on disk
//!
//! ```text
//! projects/
//! ├── myThing/        <- source folder (the real project)
//! │   └── out/site.bin
//! └── myThing_gen/    <- generated folder (orphan branch `myThing_gen`)
//!     └── out/site.bin
//! ```
//!
//! ## Workflow
//!
//! 1. **Create**: run from inside `myThing`. The `_gen` sibling is initialized
//!    with one empty commit tagged `gen_empty_commit`, optionally wired to the
//!    source repository's only remote.
//! 2. Copy the files you want to publish into `myThing_gen`, keeping sub-paths.
//! 3. **Update**: run again (from either folder). Every tracked file is
//!    refreshed from the source; if anything changed the branch is reset to the
//!    empty commit and recommitted, then optionally force-pushed.
//!
//! ## Architecture
//!
//! - [`git`]: command runner for the external `git` executable
//! - [`stage`]: stage resolution plus the create and update stages
//! - [`tracking`]: tracked-file walk and `git status` parsing
//! - [`prompt`]: injectable yes/no confirmation
//! - [`output`]: console styling and verbosity
//! - [`error`]: fatal error taxonomy and exit codes
//! - [`utils`]: path helpers
//!
//! ## Example Usage
//!
//! ```no_run
//! use genbranch::git::Git;
//! use genbranch::prompt::AssumeYes;
//! use genbranch::{Settings, stage};
//!
//! # fn main() -> anyhow::Result<()> {
//! let settings = Settings::default();
//! let git = Git::locate(settings.strict)?;
//!
//! let stage = stage::resolve(&git, &settings, None)?;
//! stage.run(&git, &settings, &mut AssumeYes)?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Fatal error taxonomy and exit codes.
pub mod error;

/// External git command runner.
pub mod git;

/// Output formatting and verbosity control.
pub mod output;

/// Interactive yes/no confirmation.
pub mod prompt;

/// Stage resolution and the create/update stages.
pub mod stage;

/// Tracked-file discovery and change-status parsing.
pub mod tracking;

/// Utility functions and helpers.
pub mod utils;

pub use error::GenError;

/// Current version of the genbranch binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Suffix that turns a source folder name into its generated folder name.
pub const DEFAULT_SUFFIX: &str = "_gen";

/// Tag naming the empty root commit every update resets to.
pub const DEFAULT_EMPTY_COMMIT_TAG: &str = "gen_empty_commit";

/// Process exit code for fatal precondition failures.
pub const FATAL_EXIT_CODE: i32 = 10;

/// Settings injected into every stage.
///
/// Built once at startup from the command line; nothing is read from a
/// configuration file or the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Suffix appended to the source folder name to get the generated folder.
    pub suffix: String,

    /// Tag name of the empty commit anchoring every reset.
    pub empty_commit_tag: String,

    /// Treat failing git invocations as fatal instead of carrying on.
    pub strict: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            empty_commit_tag: DEFAULT_EMPTY_COMMIT_TAG.to_string(),
            strict: false,
        }
    }
}
