//! CSV data files for parameterizing tests.
//!
//! A data file is resolved against the working directory first, then each
//! configured resource directory. Rows are loaded eagerly. [`CsvReader::next`]
//! starts at the worker's global client index and wraps around, so parallel
//! workers of the same scenario begin on different rows.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;
use serde_json::{Map, Value};

use crate::error::{ReportError, Result};

/// One data row, addressable by column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    index: usize,
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl CsvRow {
    /// Zero-based position of the row in the file, header excluded.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the value in the named column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        let pos = self.headers.iter().position(|h| h == column)?;
        self.values.get(pos).map(String::as_str)
    }

    /// Returns the raw values in column order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Renders the row as a JSON object keyed by header.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .headers
            .iter()
            .zip(&self.values)
            .map(|(h, v)| (h.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }
}

/// Rows of a headed CSV file.
#[derive(Debug)]
pub struct CsvReader {
    path: PathBuf,
    headers: Arc<[String]>,
    rows: Vec<CsvRow>,
    start: usize,
    cursor: AtomicUsize,
}

/// Finds `path` as given, then under each of `search_dirs`.
fn resolve(path: &Path, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    if path.is_absolute() {
        return None;
    }
    search_dirs
        .iter()
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.is_file())
}

impl CsvReader {
    /// Resolves and loads a data file.
    ///
    /// `start` is the row [`next`](Self::next) begins at, modulo the row
    /// count.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ResourceNotFound`] if the file cannot be
    /// located and [`ReportError::Csv`] if it cannot be parsed.
    pub fn open(path: &Path, search_dirs: &[PathBuf], start: usize) -> Result<Self> {
        let resolved = resolve(path, search_dirs).ok_or_else(|| ReportError::ResourceNotFound {
            path: path.to_path_buf(),
        })?;
        let csv_err = |source: csv::Error| ReportError::Csv {
            path: resolved.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&resolved)
            .map_err(csv_err)?;
        let headers: Arc<[String]> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_owned)
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(csv_err)?;
            rows.push(CsvRow {
                index,
                headers: Arc::clone(&headers),
                values: record.iter().map(str::to_owned).collect(),
            });
        }

        tracing::debug!(path = %resolved.display(), rows = rows.len(), "loaded data file");
        Ok(Self {
            path: resolved,
            headers,
            rows,
            start,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Resolved location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column headers.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the file has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CsvRow> {
        self.rows.get(index)
    }

    /// Returns a uniformly random row.
    #[must_use]
    pub fn random(&self) -> Option<&CsvRow> {
        if self.rows.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..self.rows.len());
        self.rows.get(index)
    }

    /// Returns the next row, wrapping around at the end.
    ///
    /// Safe to call from several threads; each call advances a shared
    /// cursor.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<&CsvRow> {
        if self.rows.is_empty() {
            return None;
        }
        let step = self.cursor.fetch_add(1, Ordering::Relaxed);
        let index = (self.start % self.rows.len() + step) % self.rows.len();
        self.rows.get(index)
    }
}
