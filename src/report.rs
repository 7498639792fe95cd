//! End-of-run error report serialization.
//!
//! Failed tasks are written to a side-channel file as a JSON array of
//! one-entry objects keyed by the failing task's logical directory, each
//! mapping the task title to its URL:
//!
//! ```json
//! [
//!   { "B": { "C": "https://x/2" } }
//! ]
//! ```
//!
//! The file is overwritten on each run and not written at all when every
//! task succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::queue::TaskFailure;

/// Default error report filename, created in the working directory.
pub const ERROR_LOG_FILE: &str = "error.txt";

/// Errors that can occur while writing the error report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be written.
    #[error("failed to write error report to {path}: {source}")]
    Io {
        /// The report path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The report could not be serialized.
    #[error("failed to serialize error report: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// A single report record: `{ dir: { title: url } }`.
///
/// The keys are data, so serialization is spelled out by hand instead of
/// derived.
struct FailureRecord<'a>(&'a TaskFailure);

impl Serialize for FailureRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_map(Some(1))?;
        record.serialize_entry(&self.0.task.dir, &TitleEntry(self.0))?;
        record.end()
    }
}

struct TitleEntry<'a>(&'a TaskFailure);

impl Serialize for TitleEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entry = serializer.serialize_map(Some(1))?;
        entry.serialize_entry(&self.0.task.title, &self.0.task.url)?;
        entry.end()
    }
}

/// Writes the error report for a completed run, overwriting any previous
/// file. A run with zero failures is a no-op.
///
/// Returns whether a report was written.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn write_error_log(failures: &[TaskFailure], path: &Path) -> Result<bool, ReportError> {
    if failures.is_empty() {
        return Ok(false);
    }

    let records: Vec<FailureRecord<'_>> = failures.iter().map(FailureRecord).collect();
    let json = serde_json::to_string_pretty(&records)?;

    fs::write(path, json).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}
