//! Custom metric payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Anything that can be reported as a custom metric.
///
/// The kind tag becomes the envelope type and the value itself becomes the
/// envelope data.
pub trait ReportableMetric: Serialize {
    /// Type tag of the metric, e.g. `"Counter"`.
    fn kind(&self) -> &str;
}

/// Aggregation the platform applies to a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Summed across all reports.
    Counter,
    /// A duration, aggregated into percentiles.
    Timing,
    /// Counts per bucket key.
    Histogram,
}

impl MetricKind {
    /// Returns the type tag used in the result stream.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Counter => "Counter",
            Self::Timing => "Timing",
            Self::Histogram => "Histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a metric kind name is not recognized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown metric kind '{0}' (expected counter, timing or histogram)")]
pub struct ParseKindError(String);

impl FromStr for MetricKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Counter, Self::Timing, Self::Histogram]
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseKindError(s.to_owned()))
    }
}

/// A custom metric.
///
/// ```
/// use testable_reporter::Metric;
///
/// let metric = Metric::counter("My Request Counter")
///     .with_val(1)
///     .with_units("requests");
/// assert_eq!(metric.val, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Aggregation kind.
    #[serde(rename = "type")]
    pub kind: MetricKind,
    /// Metric name as shown in the results.
    pub name: String,
    /// Histogram bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Reported value.
    pub val: i64,
    /// Units the value is measured in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl Metric {
    fn new(kind: MetricKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            key: None,
            val: 0,
            units: None,
        }
    }

    /// Starts a counter metric.
    #[must_use]
    pub fn counter(name: impl Into<String>) -> Self {
        Self::new(MetricKind::Counter, name)
    }

    /// Starts a timing metric.
    #[must_use]
    pub fn timing(name: impl Into<String>) -> Self {
        Self::new(MetricKind::Timing, name)
    }

    /// Starts a histogram metric.
    #[must_use]
    pub fn histogram(name: impl Into<String>) -> Self {
        Self::new(MetricKind::Histogram, name)
    }

    /// Sets the value.
    #[must_use]
    pub const fn with_val(mut self, val: i64) -> Self {
        self.val = val;
        self
    }

    /// Sets the units.
    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Sets the histogram bucket.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl ReportableMetric for Metric {
    fn kind(&self) -> &str {
        self.kind.as_str()
    }
}
