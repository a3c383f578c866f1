use std::fmt;

/// Broad category of a failed git invocation, derived from its stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitErrorKind {
    /// DNS, connection timeout, unreachable host
    Network,
    /// SSH keys, passwords, tokens
    Authentication,
    /// Committer identity not configured
    Identity,
    /// Command was run outside a repository
    NotARepository,
    /// Branch, tag, remote or path does not exist
    NotFound,
    /// Rejected push
    Conflict,
    /// Filesystem permission problems
    Permission,
    /// Malformed ref or revision
    InvalidRef,
    /// Anything else
    Unknown,
}

/// A failed git invocation with a categorized, user-facing explanation.
#[derive(Debug, Clone)]
pub struct GitError {
    /// Command line that failed, e.g. `git -C /x push --force`
    pub command: String,
    /// Category derived from stderr
    pub kind: GitErrorKind,
    /// First meaningful stderr lines
    pub detail: String,
    /// Exit code, if the process was not killed by a signal
    pub code: Option<i32>,
}

impl GitError {
    /// Categorize a failure from the command's stderr.
    #[must_use]
    pub fn from_stderr(command: &str, stderr: &str, code: Option<i32>) -> Self {
        Self {
            command: command.to_string(),
            kind: categorize(stderr),
            detail: extract_meaningful_message(stderr),
            code,
        }
    }

    /// Actionable hints for the category.
    #[must_use]
    pub const fn suggestions(&self) -> &'static [&'static str] {
        match self.kind {
            GitErrorKind::Network => &[
                "Check your internet connection",
                "Verify the remote URL with 'git remote -v'",
                "Try again in a few moments",
            ],
            GitErrorKind::Authentication => &[
                "Verify your SSH key is configured (ssh-add -l)",
                "Ensure your token/password hasn't expired",
                "For HTTPS, you may need to set up a credential helper",
            ],
            GitErrorKind::Identity => &[
                "Set an identity: git config --global user.name \"Your Name\"",
                "and: git config --global user.email you@example.com",
            ],
            GitErrorKind::NotARepository => &[
                "Run genbranch from inside the project or its generated folder",
            ],
            GitErrorKind::NotFound => &[
                "Check that the branch, tag or remote exists",
                "The empty-commit tag is created by the create stage; re-create the generated folder if it is missing",
            ],
            GitErrorKind::Conflict => &[
                "The generated branch is rewritten on every update; it must be pushed with --force",
                "Check that the remote allows force pushes to this branch",
            ],
            GitErrorKind::Permission => &[
                "Check file and directory permissions",
                "Check if another process has the repository locked (.git/index.lock)",
            ],
            GitErrorKind::InvalidRef => &[
                "Check the branch/tag name for invalid characters",
            ],
            GitErrorKind::Unknown => &[],
        }
    }

    /// Full message with suggestions, suitable for printing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        let mut message = format!("{}: {} - {}", self.command, self.error_type(), self.detail);
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            message.push_str("\n\nSuggestions:");
            for hint in suggestions {
                message.push_str("\n - ");
                message.push_str(hint);
            }
        }
        message
    }

    /// Short description of the error type.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self.kind {
            GitErrorKind::Network => "Network error",
            GitErrorKind::Authentication => "Authentication failed",
            GitErrorKind::Identity => "Identity unknown",
            GitErrorKind::NotARepository => "Not a repository",
            GitErrorKind::NotFound => "Not found",
            GitErrorKind::Conflict => "Rejected",
            GitErrorKind::Permission => "Permission denied",
            GitErrorKind::InvalidRef => "Invalid reference",
            GitErrorKind::Unknown => "Failed",
        }
    }
}

impl fmt::Display for GitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for GitError {}

/// Map stderr text onto a category. Order matters: the more specific
/// patterns must be checked before the generic ones they contain.
fn categorize(stderr: &str) -> GitErrorKind {
    let lower = stderr.to_lowercase();
    let any = |patterns: &[&str]| patterns.iter().any(|p| lower.contains(p));

    if any(&[
        "could not resolve host",
        "connection timed out",
        "network is unreachable",
        "failed to connect",
        "connection refused",
    ]) {
        GitErrorKind::Network
    } else if any(&[
        "please tell me who you are",
        "unable to auto-detect email address",
        "empty ident name",
    ]) {
        GitErrorKind::Identity
    } else if any(&["not a git repository"]) {
        GitErrorKind::NotARepository
    } else if any(&[
        "authentication failed",
        "publickey",
        "access denied",
        "invalid credentials",
        "could not read username",
    ]) {
        GitErrorKind::Authentication
    } else if any(&[
        "non-fast-forward",
        "rejected",
        "failed to push some refs",
    ]) {
        GitErrorKind::Conflict
    } else if any(&[
        "permission denied",
        "unable to create",
        "read-only",
        "index.lock",
    ]) {
        GitErrorKind::Permission
    } else if any(&[
        "invalid ref",
        "not a valid",
        "bad revision",
        "ambiguous argument",
    ]) {
        GitErrorKind::InvalidRef
    } else if any(&[
        "does not exist",
        "not found",
        "did not match any",
        "no such",
    ]) {
        GitErrorKind::NotFound
    } else {
        GitErrorKind::Unknown
    }
}

/// First three non-empty stderr lines joined; git puts the key info up front.
fn extract_meaningful_message(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(3)
        .collect();

    if lines.is_empty() {
        return "no error details available".to_string();
    }

    lines.join(" | ")
}
