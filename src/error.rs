//! Error types for the reporter.
//!
//! Configuration absence is never an error, and a sink that fails to open
//! degrades to console mode instead of failing. What remains here are the
//! failures a caller can actually observe.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for the `testable-report` command.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Payload could not be serialized
    pub const SERIALIZE_ERROR: i32 = 2;

    /// I/O error (result stream write failed)
    pub const IO_ERROR: i32 = 3;

    /// Data file missing or malformed
    pub const DATA_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Reporting Errors
// ============================================================================

/// Errors surfaced by the reporting pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The event payload is not representable as JSON.
    ///
    /// This points at a defect in the payload type, not a runtime
    /// condition, so the call fails and nothing is written.
    #[error("failed to serialize {event_type} event: {source}")]
    Serialize {
        /// Envelope type tag of the rejected event
        event_type: String,
        /// Underlying serializer error
        #[source]
        source: serde_json::Error,
    },

    /// Appending to the result stream failed mid-run.
    #[error("failed to write to result stream: {0}")]
    Write(#[source] std::io::Error),

    /// A data file could not be located.
    #[error("resource not found: {path}")]
    ResourceNotFound {
        /// Path as given by the caller
        path: PathBuf,
    },

    /// A data file was found but could not be parsed.
    #[error("invalid CSV in {path}: {source}")]
    Csv {
        /// Resolved path of the file
        path: PathBuf,
        /// Underlying parser error
        #[source]
        source: csv::Error,
    },

    /// A process-wide reporter was already installed.
    #[error("a global reporter is already installed")]
    AlreadyInstalled,
}

impl ReportError {
    /// Returns the exit code the command-line tool uses for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Serialize { .. } => ExitCode::SERIALIZE_ERROR,
            Self::Write(_) => ExitCode::IO_ERROR,
            Self::ResourceNotFound { .. } | Self::Csv { .. } => ExitCode::DATA_ERROR,
            Self::AlreadyInstalled => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for reporting operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Tests
// ============================================================================
