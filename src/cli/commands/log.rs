//! `log` command.

use crate::cli::args::LogArgs;
use crate::error::ReportError;
use crate::reporter::Reporter;

/// Writes one log record.
///
/// # Errors
///
/// Returns an error if the record cannot be written.
pub fn run(reporter: &Reporter, args: &LogArgs) -> Result<(), ReportError> {
    reporter.log(args.level, args.message.join(" "))
}
