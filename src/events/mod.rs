//! Result-stream events.
//!
//! Every event is a typed payload wrapped in an [`Envelope`] and written as
//! one JSON line.

pub mod envelope;
pub mod log;
pub mod metric;

pub use envelope::Envelope;
pub use log::{LogEntry, LogLevel, LogMessage, ParseLevelError};
pub use metric::{Metric, MetricKind, ParseKindError, ReportableMetric};
