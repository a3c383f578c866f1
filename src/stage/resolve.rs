//! Working out which folder is which.
//!
//! genbranch can be started from anywhere inside either folder. The top of
//! the current git work tree decides: a name ending in the suffix is the
//! generated folder, anything else is the source.

use super::{CreateStage, Stage, StagePaths, UpdateStage};
use crate::Settings;
use crate::error::GenError;
use crate::git::Git;
use crate::utils::paths::{make_absolute, normalize, to_slash};
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Derive the folder pair from a work-tree top level.
///
/// Symmetric: the source folder and its generated sibling both derive the
/// same pair. Pure string manipulation; nothing is checked on disk.
#[must_use]
pub fn derive_paths(toplevel: &Path, suffix: &str) -> StagePaths {
    let slashed = to_slash(toplevel);
    let top = slashed
        .strip_suffix('/')
        .filter(|t| !t.is_empty())
        .unwrap_or(slashed.as_str());

    match top.strip_suffix(suffix).filter(|_| !suffix.is_empty()) {
        Some(source) => StagePaths {
            source: PathBuf::from(source),
            generated: PathBuf::from(top),
        },
        None => StagePaths {
            source: PathBuf::from(top),
            generated: PathBuf::from(format!("{top}{suffix}")),
        },
    }
}

/// Pick the stage for a resolved pair: create iff the generated folder is absent.
#[must_use]
pub fn select(paths: StagePaths) -> Stage {
    if paths.generated.is_dir() {
        Stage::Update(UpdateStage::new(paths))
    } else {
        Stage::Create(CreateStage::new(paths))
    }
}

/// Resolve the stage for a run started in `start` (current directory if `None`).
///
/// # Errors
///
/// - [`GenError::StageUnresolved`] if `start` is not inside a git work tree
/// - [`GenError::SourceFolderMissing`] if the derived source folder is not a directory
pub fn resolve(git: &Git, settings: &Settings, start: Option<&Path>) -> Result<Stage> {
    if settings.suffix.is_empty() {
        bail!("The generated-folder suffix must not be empty");
    }

    let toplevel = git.probe("rev-parse --show-toplevel", start)?;
    if !toplevel.success || toplevel.stdout.trim().is_empty() {
        let at = match start {
            Some(path) => make_absolute(path)?,
            None => make_absolute(Path::new("."))?,
        };
        return Err(GenError::StageUnresolved(at).into());
    }

    let derived = derive_paths(Path::new(toplevel.stdout.trim()), &settings.suffix);
    debug!(source = %derived.source.display(), generated = %derived.generated.display(), "Derived folder pair");

    if !derived.source.is_dir() {
        return Err(GenError::SourceFolderMissing(derived.source).into());
    }

    let paths = StagePaths {
        source: normalize(&derived.source)?,
        generated: normalize(&derived.generated)?,
    };

    Ok(select(paths))
}
