//! Formatted terminal output for the dashboard.

pub mod format;

pub use format::*;
