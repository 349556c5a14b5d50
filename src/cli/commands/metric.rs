//! `metric` command.

use crate::cli::args::MetricArgs;
use crate::error::ReportError;
use crate::events::{Metric, MetricKind};
use crate::reporter::Reporter;

/// Builds the metric described by the arguments.
#[must_use]
pub fn build(args: MetricArgs) -> Metric {
    let metric = match args.kind {
        MetricKind::Counter => Metric::counter(args.name),
        MetricKind::Timing => Metric::timing(args.name),
        MetricKind::Histogram => Metric::histogram(args.name),
    }
    .with_val(args.val);

    let metric = match args.units {
        Some(units) => metric.with_units(units),
        None => metric,
    };
    match args.key {
        Some(key) => metric.with_key(key),
        None => metric,
    }
}

/// Reports one metric.
///
/// # Errors
///
/// Returns an error if the record cannot be written.
pub fn run(reporter: &Reporter, args: MetricArgs) -> Result<(), ReportError> {
    reporter.report_metric(&build(args))
}
