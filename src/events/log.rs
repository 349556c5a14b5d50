//! Log record payload.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a log record.
///
/// The platform only keeps `Trace` records while smoke testing a scenario,
/// and a `Fatal` record stops the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    /// Fine-grained tracing, smoke test mode only.
    Trace,
    /// Debugging detail.
    Debug,
    /// Normal progress.
    Info,
    /// Something unexpected but recoverable.
    Warn,
    /// A failure in the test.
    Error,
    /// A failure that stops the run.
    Fatal,
}

impl LogLevel {
    /// All levels from least to most severe.
    pub const ALL: [Self; 6] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
    ];

    /// Returns the serialized name of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "Trace",
            Self::Debug => "Debug",
            Self::Info => "Info",
            Self::Warn => "Warn",
            Self::Error => "Error",
            Self::Fatal => "Fatal",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not recognized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown log level '{0}' (expected trace, debug, info, warn, error or fatal)")]
pub struct ParseLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .or_else(|| s.eq_ignore_ascii_case("warning").then_some(Self::Warn))
            .ok_or_else(|| ParseLevelError(s.to_owned()))
    }
}

/// Text of a log record.
///
/// Built either from plain text or from an error value. Errors are rendered
/// immediately, including every `source()` in the chain, so the error itself
/// is never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage(String);

impl LogMessage {
    /// Renders an error and its chain of causes.
    ///
    /// The first line is the error itself; each cause follows on its own
    /// line prefixed with `Caused by: `.
    #[must_use]
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut rendered = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            rendered.push_str("\nCaused by: ");
            rendered.push_str(&cause.to_string());
            source = cause.source();
        }
        Self(rendered)
    }

    /// Returns the message text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the message, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for LogMessage {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for LogMessage {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for LogMessage {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload of a `Log` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Severity.
    pub level: LogLevel,
    /// Message text or rendered error chain.
    pub message: String,
    /// Wall-clock time of the call, in milliseconds since the Unix epoch.
    pub timestamp_millis: i64,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn now(level: LogLevel, message: LogMessage) -> Self {
        Self {
            level,
            message: message.into_string(),
            timestamp_millis: Utc::now().timestamp_millis(),
        }
    }
}
