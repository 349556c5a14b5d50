//! Command-line interface for `testable-report`.

pub mod args;
pub mod commands;
