//! # Git Command Runner
//!
//! Every repository operation genbranch performs is delegated to the external
//! `git` executable. This module is the single place that spawns it.
//!
//! ## Behaviour
//!
//! - Commands are given as a shell-like string (`"commit --allow-empty
//!   --message 'empty commit'"`) tokenized with `shell-words`, or as an
//!   already split argument list when paths may contain spaces.
//! - An optional repository folder is passed as `git -C <folder>`.
//! - The full command line is echoed with a `GIT:` prefix before it runs.
//! - stdout is captured and returned with trailing whitespace trimmed.
//! - git's stdin is closed so it can never consume a confirmation answer.
//!
//! ## Failure policy
//!
//! In the default lenient mode a non-zero exit is logged as a warning and the
//! captured output is handed back; callers treat empty output as "nothing
//! there" (no remotes, no changes). In strict mode the same failure becomes a
//! [`GenError::GitFailed`] carrying a categorized [`errors::GitError`].

use crate::error::GenError;
use crate::output;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{Level, debug, span, warn};

/// Git error categorization and handling
pub mod errors;

use errors::GitError;

/// Captured result of one git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// stdout with trailing whitespace trimmed
    pub stdout: String,
    /// stderr, untrimmed
    pub stderr: String,
    /// Whether git exited with status 0
    pub success: bool,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

/// Runner for the external git executable.
#[derive(Debug, Clone)]
pub struct Git {
    /// Resolved path of the git binary
    program: PathBuf,
    /// Fail on non-zero exit instead of warning
    strict: bool,
    /// Extra environment passed to every invocation
    envs: Vec<(OsString, OsString)>,
}

impl Git {
    /// Locate `git` on the search path.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::GitNotFound`] if no git executable can be found.
    pub fn locate(strict: bool) -> Result<Self> {
        let program = which::which("git").map_err(|e| GenError::GitNotFound(e.to_string()))?;
        debug!(program = %program.display(), strict, "Located git");
        Ok(Self::with_program(program, strict))
    }

    /// Use an explicit git binary.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>, strict: bool) -> Self {
        Self {
            program: program.into(),
            strict,
            envs: Vec::new(),
        }
    }

    /// Add an environment variable to every invocation.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Run a shell-like command string, optionally inside `repo`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be tokenized, git cannot be
    /// spawned, or (strict mode only) git exits unsuccessfully.
    pub fn run(&self, cmd: &str, repo: Option<&Path>) -> Result<GitOutput> {
        let args = shell_words::split(cmd)
            .with_context(|| format!("Failed to parse git command: {cmd}"))?;
        self.run_args(&args, repo)
    }

    /// Run with an already split argument list, optionally inside `repo`.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be spawned or (strict mode only) git
    /// exits unsuccessfully.
    pub fn run_args<S: AsRef<str>>(&self, args: &[S], repo: Option<&Path>) -> Result<GitOutput> {
        self.invoke(args, repo, self.strict)
    }

    /// Run a query whose failure is an answer in itself (e.g. "not a
    /// repository"); never fails on a non-zero exit, even in strict mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be tokenized or git cannot be spawned.
    pub fn probe(&self, cmd: &str, repo: Option<&Path>) -> Result<GitOutput> {
        let args = shell_words::split(cmd)
            .with_context(|| format!("Failed to parse git command: {cmd}"))?;
        self.invoke(&args, repo, false)
    }

    fn invoke<S: AsRef<str>>(
        &self,
        args: &[S],
        repo: Option<&Path>,
        strict: bool,
    ) -> Result<GitOutput> {
        let mut full: Vec<String> = Vec::with_capacity(args.len() + 2);
        if let Some(repo) = repo {
            full.push("-C".to_string());
            full.push(repo.to_string_lossy().into_owned());
        }
        full.extend(args.iter().map(|a| a.as_ref().to_string()));

        let shown = format!("git {}", shell_words::join(&full));
        let span = span!(Level::DEBUG, "git", command = %shown);
        let _guard = span.enter();

        output::command("GIT:", &shown);

        let result = Command::new(&self.program)
            .args(&full)
            .envs(self.envs.iter().cloned())
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute {shown}"))?;

        let output = GitOutput {
            stdout: String::from_utf8_lossy(&result.stdout).trim_end().to_string(),
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            success: result.status.success(),
            code: result.status.code(),
        };

        if output.success {
            debug!(bytes = output.stdout.len(), "git succeeded");
        } else {
            let error = GitError::from_stderr(&shown, &output.stderr, output.code);
            if strict {
                return Err(GenError::GitFailed(error).into());
            }
            warn!(
                code = ?output.code,
                kind = error.error_type(),
                detail = %error.detail,
                "git failed, continuing"
            );
        }

        Ok(output)
    }

    /// Convenience wrapper returning only trimmed stdout.
    ///
    /// # Errors
    ///
    /// Same as [`Git::run`].
    pub fn stdout(&self, cmd: &str, repo: Option<&Path>) -> Result<String> {
        Ok(self.run(cmd, repo)?.stdout)
    }
}
