//! Diagnostic logging for the reporter itself.
//!
//! Diagnostics go through `tracing` to stderr so they never mix with the
//! result stream, which may be stdout in console mode. Verbosity comes from
//! `-v` flags unless `TESTABLE_LOG_LEVEL` is set.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the diagnostic filter.
pub const LOG_LEVEL_VAR: &str = "TESTABLE_LOG_LEVEL";

/// Filter directives indexed by `-v` count.
const DIRECTIVES: [&str; 4] = ["warn", "info", "debug", "trace"];

/// Diagnostic output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Plain text, colored when stderr is a terminal.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Returns the filter directive for a `-v` count, saturating at `trace`.
#[must_use]
pub fn directive_for(verbosity: u8) -> &'static str {
    DIRECTIVES[usize::from(verbosity).min(DIRECTIVES.len() - 1)]
}

/// Installs the stderr subscriber. Later calls are no-ops.
///
/// Color follows the terminal and the `NO_COLOR` convention.
pub fn init_logging(format: LogFormat, verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_VAR)
        .unwrap_or_else(|_| EnvFilter::new(directive_for(verbosity)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Human => builder.with_ansi(wants_color()).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if installed.is_err() {
        tracing::debug!("diagnostic subscriber already installed");
    }
}

fn wants_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_directive() {
        assert_eq!(directive_for(0), "warn");
        assert_eq!(directive_for(2), "debug");
        assert_eq!(directive_for(9), "trace");
    }

    #[test]
    fn second_init_is_ignored() {
        init_logging(LogFormat::Json, 1);
        init_logging(LogFormat::Human, 0);
    }
}
