use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Ensures parent directories exist for a given path
///
/// # Errors
///
/// Returns an error if the parent directories cannot be created
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create parent directories for {}", path.display())
        })?;
    }
    Ok(())
}

/// Makes a path absolute, resolving relative paths from current directory
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined
pub fn make_absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Failed to read current directory")?;
        Ok(current_dir.join(path))
    }
}

/// Lexically removes `.` and resolves `..` components without touching the
/// filesystem, so it also works for folders that do not exist yet.
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Renders a path with `/` separators regardless of platform.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Absolute, cleaned, forward-slash form of `path`.
///
/// # Errors
///
/// Returns an error if `path` is relative and the current directory cannot be read.
pub fn normalize(path: &Path) -> Result<PathBuf> {
    let absolute = make_absolute(path)?;
    Ok(PathBuf::from(to_slash(&clean(&absolute))))
}

/// `path` relative to `base`, forward slashes; `None` if `base` is not a prefix.
#[must_use]
pub fn relative_slash(path: &Path, base: &Path) -> Option<String> {
    path.strip_prefix(base).ok().map(to_slash)
}
