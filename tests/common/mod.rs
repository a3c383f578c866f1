#![allow(dead_code)]

use anyhow::Result;
use genbranch::Settings;
use genbranch::git::Git;
use genbranch::prompt::Scripted;
use genbranch::stage::{self, StageOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment pinning git's identity and isolating it from the host config.
pub const GIT_ENV: &[(&str, &str)] = &[
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
    ("GIT_AUTHOR_NAME", "Genbranch Test"),
    ("GIT_AUTHOR_EMAIL", "test@genbranch.invalid"),
    ("GIT_COMMITTER_NAME", "Genbranch Test"),
    ("GIT_COMMITTER_EMAIL", "test@genbranch.invalid"),
];

/// Lenient git runner with the test environment applied
pub fn test_git() -> Git {
    GIT_ENV.iter().fold(
        Git::locate(false).expect("git must be installed to run tests"),
        |git, (k, v)| git.env(*k, *v),
    )
}

/// A source project `site` (a git work tree) and the path of its `site_gen` sibling
pub struct Workspace {
    pub temp_dir: TempDir,
    pub source: PathBuf,
    pub generated: PathBuf,
    pub git: Git,
    pub settings: Settings,
}

impl Workspace {
    /// Create a workspace with an initialized source repository
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().canonicalize()?;
        let source = root.join("site");
        let generated = root.join("site_gen");
        fs::create_dir_all(&source)?;

        let git = test_git();
        let out = git.run("init", Some(&source))?;
        anyhow::ensure!(out.success, "git init failed: {}", out.stderr);

        Ok(Self {
            temp_dir,
            source,
            generated,
            git,
            settings: Settings::default(),
        })
    }

    /// Root holding both folders
    pub fn root(&self) -> PathBuf {
        self.source.parent().unwrap().to_path_buf()
    }

    /// Create a bare repository and register it as a remote of the source
    pub fn add_bare_remote(&self, name: &str) -> Result<PathBuf> {
        let bare = self.root().join(format!("{name}.git"));
        let bare_str = bare.to_string_lossy().into_owned();
        let out = self.git.run_args(&["init", "--bare", bare_str.as_str()], None)?;
        anyhow::ensure!(out.success, "git init --bare failed: {}", out.stderr);

        let out = self
            .git
            .run_args(&["remote", "add", name, bare_str.as_str()], Some(&self.source))?;
        anyhow::ensure!(out.success, "git remote add failed: {}", out.stderr);
        Ok(bare)
    }

    /// Run the whole stage sequence from `start` with scripted answers
    pub fn execute_from(&self, start: &Path, answers: &[bool]) -> Result<(StageOutcome, Scripted)> {
        let mut confirm = Scripted::new(answers.iter().copied());
        let outcome = stage::execute(&self.git, &self.settings, Some(start), &mut confirm)?;
        Ok((outcome, confirm))
    }

    /// Run from the source folder
    pub fn execute(&self, answers: &[bool]) -> Result<(StageOutcome, Scripted)> {
        self.execute_from(&self.source, answers)
    }

    /// Run the create stage, answering yes to continue and no to pushing
    pub fn create(&self) -> Result<()> {
        let (outcome, _) = self.execute(&[true, false])?;
        anyhow::ensure!(
            matches!(outcome, StageOutcome::Created { .. }),
            "expected create stage, got {outcome:?}"
        );
        Ok(())
    }

    /// Write a file under the source folder
    pub fn write_source(&self, relative: &str, content: &[u8]) -> Result<()> {
        write_file(&self.source, relative, content)
    }

    /// Write a file under the generated folder (the manual copy step)
    pub fn write_generated(&self, relative: &str, content: &[u8]) -> Result<()> {
        write_file(&self.generated, relative, content)
    }

    /// Publish `relative`: write it to the source and copy it across
    pub fn publish(&self, relative: &str, content: &[u8]) -> Result<()> {
        self.write_source(relative, content)?;
        self.write_generated(relative, content)
    }

    /// Trimmed stdout of a git command in the generated folder
    pub fn gen_git(&self, cmd: &str) -> String {
        self.git
            .run(cmd, Some(&self.generated))
            .map(|o| o.stdout)
            .unwrap_or_default()
    }

    /// Total commits reachable from HEAD in the generated folder
    pub fn commit_count(&self) -> usize {
        self.gen_git("rev-list --count HEAD").parse().unwrap_or(0)
    }

    /// Commits between the empty-commit tag and HEAD
    pub fn commits_above_marker(&self) -> usize {
        self.gen_git(&format!(
            "rev-list --count {}..HEAD",
            self.settings.empty_commit_tag
        ))
        .parse()
        .unwrap_or(usize::MAX)
    }

    /// Files in the HEAD commit of the generated folder
    pub fn committed_files(&self) -> Vec<String> {
        self.gen_git("ls-tree -r --name-only HEAD")
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Content of `relative` as committed at HEAD
    pub fn committed_content(&self, relative: &str) -> String {
        self.gen_git(&format!("show HEAD:{relative}"))
    }
}

fn write_file(root: &Path, relative: &str, content: &[u8]) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
