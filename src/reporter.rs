//! Reporting facade.
//!
//! [`Reporter`] is the entry point test code talks to. It turns metrics, log
//! messages and test steps into envelopes and hands them to its [`Sink`].
//! The reporter is built explicitly from a [`ReporterConfig`] and passed by
//! reference. Embedders that want one process-wide instance call
//! [`Reporter::install`] once at startup and [`Reporter::global`] after.

use std::path::Path;
use std::sync::OnceLock;

use serde::Serialize;

use crate::config::ReporterConfig;
use crate::context::ExecutionContext;
use crate::dataset::CsvReader;
use crate::error::{ReportError, Result};
use crate::events::envelope::LOG;
use crate::events::{Envelope, LogEntry, LogLevel, LogMessage, ReportableMetric};
use crate::sink::Sink;
use crate::test_steps::TestHandle;

static GLOBAL: OnceLock<Reporter> = OnceLock::new();

/// Emits metrics, logs and test steps to the result stream.
#[derive(Debug)]
pub struct Reporter {
    config: ReporterConfig,
    context: ExecutionContext,
    sink: Sink,
}

impl Reporter {
    /// Builds a reporter, opening the sink for the configured result file.
    #[must_use]
    pub fn new(config: ReporterConfig) -> Self {
        let sink = Sink::open(config.result_file.as_deref());
        Self::with_sink(config, sink)
    }

    /// Builds a reporter from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ReporterConfig::from_env())
    }

    /// Builds a reporter over an existing sink.
    #[must_use]
    pub fn with_sink(config: ReporterConfig, sink: Sink) -> Self {
        let context = ExecutionContext::resolve(&config);
        Self {
            config,
            context,
            sink,
        }
    }

    /// Installs the process-wide reporter.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::AlreadyInstalled`] on every call after the
    /// first; the existing reporter is left untouched and `config` is
    /// ignored.
    pub fn install(config: ReporterConfig) -> Result<&'static Self> {
        let mut installed = false;
        let reporter = GLOBAL.get_or_init(|| {
            installed = true;
            Self::new(config)
        });
        if installed {
            tracing::debug!(mode = ?reporter.sink.mode(), "installed global reporter");
            Ok(reporter)
        } else {
            Err(ReportError::AlreadyInstalled)
        }
    }

    /// Returns the process-wide reporter, if one was installed.
    #[must_use]
    pub fn global() -> Option<&'static Self> {
        GLOBAL.get()
    }

    /// Configuration the reporter was built from.
    #[must_use]
    pub const fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Naming context of this worker.
    #[must_use]
    pub const fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// The output sink.
    #[must_use]
    pub const fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Prefixes `base` with this worker's region, client index and iteration.
    #[must_use]
    pub fn namespaced_name(&self, base: &str) -> String {
        self.context.namespaced_name(base)
    }

    /// Writes one record with an arbitrary type tag.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialize`] if `data` is not representable as
    /// JSON, or [`ReportError::Write`] if the result stream rejects it.
    pub fn emit<T: Serialize>(&self, event_type: &str, data: &T) -> Result<()> {
        self.sink.write(&Envelope::new(event_type, data))
    }

    /// Reports a custom metric under its kind tag.
    ///
    /// # Errors
    ///
    /// See [`emit`](Self::emit).
    pub fn report_metric<M: ReportableMetric>(&self, metric: &M) -> Result<()> {
        self.emit(metric.kind(), metric)
    }

    /// Logs a message, or an error with its cause chain, at `level`.
    ///
    /// ```no_run
    /// use testable_reporter::{LogLevel, LogMessage, Reporter};
    ///
    /// let reporter = Reporter::from_env();
    /// reporter.log(LogLevel::Info, "logged in")?;
    ///
    /// let err = std::io::Error::other("connection reset");
    /// reporter.log(LogLevel::Error, LogMessage::from_error(&err))?;
    /// # Ok::<(), testable_reporter::ReportError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// See [`emit`](Self::emit).
    pub fn log(&self, level: LogLevel, message: impl Into<LogMessage>) -> Result<()> {
        self.emit(LOG, &LogEntry::now(level, message.into()))
    }

    /// Starts recording the steps of a test.
    ///
    /// The name is namespaced with [`namespaced_name`](Self::namespaced_name).
    /// Every call returns an independent handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the `TestStart` record cannot be written.
    pub fn start_test(&self, name: &str) -> Result<TestHandle<'_>> {
        TestHandle::start(self, self.namespaced_name(name))
    }

    /// Loads a CSV data file.
    ///
    /// Relative paths are looked up in the working directory, then in the
    /// configured resource directories. Sequential reads start at this
    /// worker's global client index.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ResourceNotFound`] if the file cannot be
    /// located and [`ReportError::Csv`] if it is malformed.
    pub fn read_csv(&self, path: impl AsRef<Path>) -> Result<CsvReader> {
        let start = self
            .context
            .global_client_index
            .as_deref()
            .and_then(|idx| idx.parse().ok())
            .unwrap_or(0);
        CsvReader::open(path.as_ref(), &self.config.resource_dirs, start)
    }
}
