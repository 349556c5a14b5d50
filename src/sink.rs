//! Output sink for the result stream.
//!
//! The sink owns the single writer that result records go to. In file mode
//! that is an append-only handle on the configured result file; in console
//! mode it is standard output and each record is prefixed with its type.
//! Every record is serialized first, then written and flushed while holding
//! the writer lock, so concurrent callers never interleave bytes.
//!
//! The first failed write closes the sink: a write that fails midway may
//! leave a partial record in the stream, and any later record appended to
//! it would be unparseable.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::error::{ReportError, Result};
use crate::events::Envelope;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Where records end up. Decided once when the sink is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkMode {
    /// Appending JSON lines to the result file at this path.
    File(PathBuf),
    /// Printing `[<type>] <record>` lines to standard output.
    Console,
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Synchronous, unbuffered record writer.
pub struct Sink {
    mode: SinkMode,
    writer: Mutex<Box<dyn Write + Send>>,
    records: AtomicU64,
    failed: AtomicBool,
}

// Box<dyn Write> is not Debug.
impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("mode", &self.mode)
            .field("records", &self.records.load(Ordering::Relaxed))
            .field("failed", &self.is_failed())
            .finish_non_exhaustive()
    }
}

impl Sink {
    /// Opens the sink for an optional result file.
    ///
    /// With a path, the file is opened for append and created if missing.
    /// If that fails the problem is reported once on stderr and the sink
    /// stays in console mode for good; there is no retry. Without a path
    /// the sink starts in console mode.
    #[must_use]
    pub fn open(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("no result file configured, reporting to console");
            return Self::console();
        };

        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                tracing::debug!(path = %path.display(), "appending results to file");
                Self::with_writer(SinkMode::File(path.to_path_buf()), Box::new(file))
            }
            Err(err) => {
                eprintln!(
                    "warning: cannot open result file {}: {err}; reporting to console instead",
                    path.display()
                );
                Self::console()
            }
        }
    }

    /// Creates a console-mode sink writing to stdout.
    #[must_use]
    pub fn console() -> Self {
        Self::with_writer(SinkMode::Console, Box::new(std::io::stdout()))
    }

    /// Creates a sink in the given mode over an arbitrary writer.
    #[must_use]
    pub fn with_writer(mode: SinkMode, writer: Box<dyn Write + Send>) -> Self {
        Self {
            mode,
            writer: Mutex::new(writer),
            records: AtomicU64::new(0),
            failed: AtomicBool::new(false),
        }
    }

    /// Returns the active mode.
    #[must_use]
    pub const fn mode(&self) -> &SinkMode {
        &self.mode
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> u64 {
        self.records.load(Ordering::Relaxed)
    }

    /// Returns `true` once a write has failed. A failed sink rejects every
    /// later record.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    /// Writes one record and flushes it.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialize`] if the payload is not
    /// representable as JSON (nothing is written), or
    /// [`ReportError::Write`] if the underlying write or flush fails, or
    /// if an earlier write failed.
    pub fn write<T: Serialize>(&self, envelope: &Envelope<'_, T>) -> Result<()> {
        let record = envelope.to_line()?;
        let mut line = match self.mode {
            SinkMode::File(_) => record,
            SinkMode::Console => format!("[{}] {record}", envelope.event_type),
        };
        line.push('\n');

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_failed() {
            return Err(ReportError::Write(std::io::Error::other(
                "result stream closed after an earlier write failure",
            )));
        }
        let outcome = match writer.write_all(line.as_bytes()) {
            Ok(()) => writer.flush(),
            Err(err) => Err(err),
        };
        if let Err(err) = outcome {
            self.failed.store(true, Ordering::Release);
            tracing::error!(error = %err, "result stream write failed, closing sink");
            return Err(ReportError::Write(err));
        }
        drop(writer);

        self.records.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::events::envelope::LOG;

    /// In-memory writer for capturing sink output in tests.
    #[derive(Clone, Default)]
    struct TestWriter(Arc<Mutex<Vec<u8>>>);

    impl TestWriter {
        fn contents(&self) -> String {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Writer whose every write fails.
    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device unplugged"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Accepts a few bytes, fails once, then accepts everything.
    struct ShortWriter {
        inner: TestWriter,
        budget: usize,
        failed_once: bool,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.failed_once {
                return self.inner.write(buf);
            }
            if self.budget == 0 {
                self.failed_once = true;
                return Err(std::io::Error::other("no space left on device"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            self.inner.write(&buf[..n])
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn file_sink(tw: &TestWriter) -> Sink {
        Sink::with_writer(SinkMode::File(PathBuf::from("mem")), Box::new(tw.clone()))
    }

    #[test]
    fn file_mode_writes_bare_json_lines() {
        let tw = TestWriter::default();
        let sink = file_sink(&tw);
        sink.write(&Envelope::new(LOG, &"first")).unwrap();
        sink.write(&Envelope::new(LOG, &"second")).unwrap();

        let output = tw.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed["type"], "Log");
        assert_eq!(parsed["data"], "second");
        assert!(output.ends_with('\n'));
        assert_eq!(sink.records_written(), 2);
    }

    #[test]
    fn console_mode_prefixes_type() {
        let tw = TestWriter::default();
        let sink = Sink::with_writer(SinkMode::Console, Box::new(tw.clone()));
        sink.write(&Envelope::new("Counter", &serde_json::json!({"val": 1})))
            .unwrap();

        let output = tw.contents();
        let rest = output.strip_prefix("[Counter] ").expect("missing type prefix");
        let parsed: serde_json::Value = serde_json::from_str(rest.trim_end()).unwrap();
        assert_eq!(parsed["type"], "Counter");
        assert_eq!(parsed["data"]["val"], 1);
    }

    #[test]
    fn serialize_failure_writes_nothing() {
        let tw = TestWriter::default();
        let sink = file_sink(&tw);
        let mut bad = HashMap::new();
        bad.insert(vec![1_u8], 1_u8);

        let err = sink.write(&Envelope::new("Bad", &bad)).unwrap_err();
        assert!(matches!(err, ReportError::Serialize { .. }));
        assert!(tw.contents().is_empty());
        assert_eq!(sink.records_written(), 0);
    }

    #[test]
    fn write_failure_is_propagated() {
        let sink = Sink::with_writer(SinkMode::File(PathBuf::from("mem")), Box::new(BrokenWriter));
        let err = sink.write(&Envelope::new(LOG, &"lost")).unwrap_err();
        assert!(matches!(err, ReportError::Write(_)));
    }

    #[test]
    fn partial_write_closes_sink() {
        let tw = TestWriter::default();
        let writer = ShortWriter {
            inner: tw.clone(),
            budget: 10,
            failed_once: false,
        };
        let sink = Sink::with_writer(SinkMode::File(PathBuf::from("mem")), Box::new(writer));

        let first = sink.write(&Envelope::new(LOG, &"first"));
        assert!(matches!(first, Err(ReportError::Write(_))));
        assert!(sink.is_failed());

        let second = sink.write(&Envelope::new(LOG, &"second"));
        assert!(matches!(second, Err(ReportError::Write(_))));

        // Only the fragment of the failed record is in the stream.
        assert_eq!(tw.contents().len(), 10);
        assert!(!tw.contents().contains("second"));
        assert_eq!(sink.records_written(), 0);
    }

    #[test]
    fn open_without_path_is_console() {
        assert_eq!(Sink::open(None).mode(), &SinkMode::Console);
    }

    #[test]
    fn open_unwritable_path_degrades_to_console() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing-dir").join("results.jsonl");
        assert_eq!(Sink::open(Some(&path)).mode(), &SinkMode::Console);
        assert!(!path.exists());
    }

    #[test]
    fn open_appends_to_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("results.jsonl");
        std::fs::write(&path, "{\"type\":\"Log\",\"data\":\"earlier\"}\n").unwrap();

        let sink = Sink::open(Some(&path));
        assert_eq!(sink.mode(), &SinkMode::File(path.clone()));
        sink.write(&Envelope::new(LOG, &"later")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().next().unwrap().contains("earlier"));
    }

    #[test]
    fn concurrent_writes_never_interleave() {
        let tw = TestWriter::default();
        let sink = file_sink(&tw);
        let payload = "x".repeat(512);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..50 {
                        sink.write(&Envelope::new(LOG, &payload)).unwrap();
                    }
                });
            }
        });

        let output = tw.contents();
        assert_eq!(output.lines().count(), 400);
        for line in output.lines() {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(parsed["data"].as_str().unwrap().len(), 512);
        }
    }
}
