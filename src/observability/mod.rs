//! Diagnostics for the reporter process.

pub mod logging;

pub use logging::{LogFormat, init_logging};
