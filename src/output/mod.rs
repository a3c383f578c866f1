//! Console output for genbranch.
//!
//! Routine progress (echoed git commands, verbose notes) goes to stderr in
//! dimmed colors; the report a user acts on (stage header, changed files,
//! instructions) goes to stdout. A process-wide verbosity level gates both.

use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};

/// Verbosity level for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Only warnings, errors and prompts.
    Quiet = 0,
    /// Default: report lines and echoed git commands.
    Normal = 1,
    /// Additionally show debug diagnostics.
    Verbose = 2,
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Verbosity from the `--quiet`/`--verbose` flags; quiet wins.
#[must_use]
pub const fn verbosity_from_flags(quiet: bool, verbose: bool) -> Verbosity {
    if quiet {
        Verbosity::Quiet
    } else if verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

fn is_quiet() -> bool {
    get_verbosity() == Verbosity::Quiet
}

/// Prints a report line to stdout (respects quiet mode).
pub fn report(message: &str) {
    if is_quiet() {
        return;
    }
    println!("{message}");
}

/// Prints an error message in bold red (always shown).
pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// Prints a warning message in bold yellow (always shown).
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

/// Prints a verbose debug message (only in verbose mode).
pub fn verbose(message: &str) {
    if get_verbosity() != Verbosity::Verbose {
        return;
    }
    eprintln!("{}", message.dimmed());
}

/// Prints a git-style action line: bold verb, plain message, on stdout.
pub fn action(verb: &str, message: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", verb.bold(), message);
}

/// Echoes an external command about to run, dimmed, on stderr.
pub fn command(prefix: &str, command_line: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("{} {}", prefix.dimmed().bold(), command_line.dimmed());
}

/// Prints a question without a newline; prompts are shown even when quiet.
pub fn question(message: &str) {
    use std::io::Write;

    print!("{} ", message.bold());
    let _ = std::io::stdout().flush();
}
