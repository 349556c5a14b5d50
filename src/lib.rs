//! `testable-reporter` - result-stream reporting for test scripts
//!
//! A running test reports custom metrics, log lines and test-step
//! assertions through a [`Reporter`]. Under the hosted platform each event
//! is appended as one JSON line to the configured result file; standalone
//! runs print the same records to the console.
//!
//! ```no_run
//! use testable_reporter::{LogLevel, Metric, Reporter};
//!
//! let reporter = Reporter::from_env();
//! reporter.report_metric(&Metric::counter("Orders").with_val(1).with_units("orders"))?;
//! reporter.log(LogLevel::Info, "order placed")?;
//!
//! let mut test = reporter.start_test("checkout")?;
//! test.start_step("add to cart")?;
//! test.start_step("pay")?;
//! test.finish()?;
//! # Ok::<(), testable_reporter::ReportError>(())
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod dataset;
pub mod error;
pub mod events;
pub mod observability;
pub mod reporter;
pub mod sink;
pub mod test_steps;

pub use config::ReporterConfig;
pub use context::ExecutionContext;
pub use dataset::{CsvReader, CsvRow};
pub use error::{ReportError, Result};
pub use events::{Envelope, LogLevel, LogMessage, Metric, MetricKind, ReportableMetric};
pub use reporter::Reporter;
pub use sink::{Sink, SinkMode};
pub use test_steps::{Assertion, StepState, TestEnd, TestHandle};
