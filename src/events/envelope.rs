//! The `{type, data}` wrapper every reported event is serialized into.

use serde::Serialize;

use crate::error::{ReportError, Result};

/// Type tag of log records.
pub const LOG: &str = "Log";
/// Type tag emitted when a test handle is created.
pub const TEST_START: &str = "TestStart";
/// Type tag of a finished test step.
pub const ASSERTION: &str = "Assertion";
/// Type tag emitted when a test handle is finished.
pub const TEST_END: &str = "TestEnd";

/// A single result-stream record.
///
/// Built fresh for each event, serialized once and dropped. The payload is
/// borrowed so reporting never clones caller data.
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: Serialize> {
    /// Event kind the consuming platform dispatches on.
    #[serde(rename = "type")]
    pub event_type: &'a str,
    /// Event payload.
    pub data: &'a T,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    /// Wraps `data` under the given type tag.
    #[must_use]
    pub const fn new(event_type: &'a str, data: &'a T) -> Self {
        Self { event_type, data }
    }

    /// Serializes the envelope as a single JSON line without terminator.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialize`] when the payload cannot be
    /// represented as JSON.
    pub fn to_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| ReportError::Serialize {
            event_type: self.event_type.to_owned(),
            source,
        })
    }
}
