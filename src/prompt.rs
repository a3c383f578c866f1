//! Yes/no confirmation before irreversible steps.
//!
//! Stages never read the console directly; they ask a [`Confirm`]
//! implementation, so the binary can use the terminal while tests and
//! `--yes` runs supply answers up front.

use crate::output;
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock};

/// Source of yes/no answers.
pub trait Confirm {
    /// Ask `question`; `Ok(true)` means go ahead.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Interprets a typed answer: only `y` or `Y`, surrounding blanks ignored, is yes.
#[must_use]
pub fn parse_answer(line: &str) -> bool {
    matches!(line.trim(), "y" | "Y")
}

/// Reads answers line by line from a buffered reader (stdin by default).
pub struct ConsolePrompt<R> {
    /// Where answers are read from
    input: R,
}

impl ConsolePrompt<StdinLock<'static>> {
    /// Prompt on the process's stdin.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> ConsolePrompt<R> {
    /// Prompt reading from `input`.
    pub const fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> Confirm for ConsolePrompt<R> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        output::question(&format!("{question} (y/n)"));

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read confirmation")?;

        // EOF counts as "no"
        if read == 0 {
            println!();
            return Ok(false);
        }
        Ok(parse_answer(&line))
    }
}

/// Answers yes to everything (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        output::verbose(&format!("{question} (y/n) y [--yes]"));
        Ok(true)
    }
}

/// Replays a fixed list of answers and records the questions asked.
///
/// Once the list runs out every further question is answered no.
#[derive(Debug, Default, Clone)]
pub struct Scripted {
    answers: VecDeque<bool>,
    /// Questions in the order they were asked
    pub asked: Vec<String>,
}

impl Scripted {
    /// Script the given answers.
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirm for Scripted {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}
