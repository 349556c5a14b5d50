//! CLI command dispatch and handlers.
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod csv;
pub mod log;
pub mod metric;
pub mod name;

use crate::cli::args::{Cli, Commands};
use crate::error::ReportError;
use crate::reporter::Reporter;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), ReportError> {
    let reporter = Reporter::new(cli.reporter.into_config());
    tracing::debug!(mode = ?reporter.sink().mode(), "reporter ready");

    match cli.command {
        Commands::Log(args) => log::run(&reporter, &args),
        Commands::Metric(args) => metric::run(&reporter, args),
        Commands::Name(args) => {
            name::run(&reporter, &args);
            Ok(())
        }
        Commands::Csv(args) => csv::run(&reporter, &args),
    }
}
