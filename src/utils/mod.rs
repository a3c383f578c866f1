//! Utility functions and helpers.
//!
//! - [`paths`]: absolute, forward-slash path normalization

/// Path manipulation and resolution utilities
pub mod paths;
