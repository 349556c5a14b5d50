//! Test-step tracking.
//!
//! A [`TestHandle`] records an ordered series of named steps for one test,
//! each with an outcome and a duration. Every finished step is reported as
//! an `Assertion` record. Handles are independent: each one owns its steps
//! and only shares the reporter's sink.

use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::LogMessage;
use crate::events::envelope::{ASSERTION, TEST_END, TEST_START};
use crate::reporter::Reporter;

/// Outcome of a finished step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepState {
    /// The step completed.
    Passed,
    /// The step failed.
    Failed,
}

/// Payload of a `TestStart` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStart {
    /// Test name, namespaced for distributed runs.
    pub suite: String,
    /// Start time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Payload of an `Assertion` record: one finished step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    /// Test the step belongs to.
    pub suite: String,
    /// Step name.
    pub name: String,
    /// Outcome.
    pub state: StepState,
    /// Step duration in milliseconds.
    pub duration: u64,
    /// Failure description, for failed steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Payload of a `TestEnd` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEnd {
    /// Test name.
    pub suite: String,
    /// Number of passed steps.
    pub passed: usize,
    /// Number of failed steps.
    pub failed: usize,
    /// Total test duration in milliseconds.
    pub duration: u64,
}

#[derive(Debug)]
struct OpenStep {
    name: String,
    started: Instant,
}

/// Handle for recording the steps of one test.
#[derive(Debug)]
pub struct TestHandle<'r> {
    reporter: &'r Reporter,
    suite: String,
    started: Instant,
    open: Option<OpenStep>,
    steps: Vec<Assertion>,
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

impl<'r> TestHandle<'r> {
    /// Creates the handle and reports `TestStart`.
    pub(crate) fn start(reporter: &'r Reporter, suite: String) -> Result<Self> {
        reporter.emit(
            TEST_START,
            &TestStart {
                suite: suite.clone(),
                timestamp: Utc::now().timestamp_millis(),
            },
        )?;

        Ok(Self {
            reporter,
            suite,
            started: Instant::now(),
            open: None,
            steps: Vec::new(),
        })
    }

    /// Returns the (namespaced) test name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.suite
    }

    /// Returns the steps finished so far, in order.
    #[must_use]
    pub fn steps(&self) -> &[Assertion] {
        &self.steps
    }

    /// Returns the name of the step in progress, if any.
    #[must_use]
    pub fn current_step(&self) -> Option<&str> {
        self.open.as_ref().map(|step| step.name.as_str())
    }

    /// Begins a new step. A step still in progress is finished as passed.
    ///
    /// # Errors
    ///
    /// Returns an error if reporting the previous step fails.
    pub fn start_step(&mut self, name: impl Into<String>) -> Result<()> {
        self.finish_step()?;
        self.open = Some(OpenStep {
            name: name.into(),
            started: Instant::now(),
        });
        Ok(())
    }

    /// Finishes the step in progress as passed. No-op without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the assertion record cannot be written.
    pub fn finish_step(&mut self) -> Result<()> {
        match self.open.take() {
            Some(step) => self.record(step.name, step.started, StepState::Passed, None),
            None => Ok(()),
        }
    }

    /// Finishes the step in progress as failed.
    ///
    /// Without a step in progress the failure is recorded against the test
    /// itself, with zero duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the assertion record cannot be written.
    pub fn fail_step(&mut self, message: impl Into<LogMessage>) -> Result<()> {
        let (name, started) = match self.open.take() {
            Some(step) => (step.name, step.started),
            None => (self.suite.clone(), Instant::now()),
        };
        self.record(
            name,
            started,
            StepState::Failed,
            Some(message.into().into_string()),
        )
    }

    /// Finishes any step in progress and reports `TestEnd`.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be written.
    pub fn finish(mut self) -> Result<TestEnd> {
        self.finish_step()?;

        let failed = self
            .steps
            .iter()
            .filter(|step| step.state == StepState::Failed)
            .count();
        let summary = TestEnd {
            suite: self.suite,
            passed: self.steps.len() - failed,
            failed,
            duration: millis(self.started.elapsed()),
        };
        self.reporter.emit(TEST_END, &summary)?;
        Ok(summary)
    }

    fn record(
        &mut self,
        name: String,
        started: Instant,
        state: StepState,
        error_message: Option<String>,
    ) -> Result<()> {
        let assertion = Assertion {
            suite: self.suite.clone(),
            name,
            state,
            duration: millis(started.elapsed()),
            error_message,
        };
        self.reporter.emit(ASSERTION, &assertion)?;
        self.steps.push(assertion);
        Ok(())
    }
}
