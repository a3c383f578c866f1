//! What the generated folder tracks, and what git says changed.
//!
//! - [`scanner::TrackedScanner`] walks the generated folder and pairs every
//!   regular file with its same-relative-path counterpart in the source.
//! - [`status::ChangeSet`] parses `git status --porcelain` and narrows it to
//!   the entries that matter for the tracked files.
//!
//! # Usage
//!
//! ```no_run
//! use genbranch::tracking::scanner::TrackedScanner;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let scanner = TrackedScanner::new(Path::new("/work/site_gen"), Path::new("/work/site"));
//! for file in scanner.scan()? {
//!     println!("{}", file.relative);
//! }
//! # Ok(())
//! # }
//! ```

/// Generated-folder walk and source counterpart check
pub mod scanner;

/// `git status --porcelain` parsing
pub mod status;

pub use scanner::{TrackedFile, TrackedScanner};
pub use status::{ChangeSet, StatusEntry};
