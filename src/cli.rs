//! Command-line interface definitions for genbranch.
//!
//! Field-level documentation doubles as `--help` text, so the structs are
//! documented the way clap renders them.

#![allow(missing_docs)]

use crate::{DEFAULT_EMPTY_COMMIT_TAG, DEFAULT_SUFFIX, Settings};
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for genbranch.
#[derive(Parser, Debug)]
#[command(
    name = "genbranch",
    version = crate::VERSION,
    about = "Publish generated files from a history-less sibling branch",
    long_about = "Keeps generated (often large, binary) files in a sibling folder \
                  '<project><suffix>' holding an orphan branch with a single commit, \
                  so publishing them never bloats the repository with old versions.\n\n\
                  The first run creates the sibling folder; copy the files to publish \
                  into it, then run again to commit (and optionally force-push) them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run as if started in <DIR>
    #[arg(short = 'C', value_name = "DIR", global = true)]
    pub directory: Option<PathBuf>,

    /// Suffix turning the project folder name into the generated folder name
    #[arg(long, default_value = DEFAULT_SUFFIX, value_parser = NonEmptyStringValueParser::new())]
    pub suffix: String,

    /// Tag marking the empty commit every update resets to
    #[arg(long, default_value = DEFAULT_EMPTY_COMMIT_TAG, value_parser = NonEmptyStringValueParser::new())]
    pub tag: String,

    /// Abort on the first failing git command instead of carrying on
    #[arg(long)]
    pub strict: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Auxiliary commands; without one, genbranch runs the create or update stage.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Settings injected into the stages.
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            suffix: self.suffix.clone(),
            empty_commit_tag: self.tag.clone(),
            strict: self.strict,
        }
    }
}
