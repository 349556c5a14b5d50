//! `csv` command.

use crate::cli::args::CsvArgs;
use crate::error::ReportError;
use crate::reporter::Reporter;

/// Prints one row of a data file as a JSON object.
///
/// Prints nothing when the requested row does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be found or parsed.
pub fn run(reporter: &Reporter, args: &CsvArgs) -> Result<(), ReportError> {
    let reader = reporter.read_csv(&args.path)?;

    let row = match (args.row, args.random) {
        (Some(index), _) => reader.get(index),
        (None, true) => reader.random(),
        (None, false) => reader.next(),
    };

    match row {
        Some(row) => println!("{}", row.to_json()),
        None => tracing::warn!(path = %reader.path().display(), "no matching row"),
    }
    Ok(())
}
