//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "original": { "id": "1", "title": "Greeting", "content": "Hello world" },
//!       "duplicates": [
//!         { "id": "4", "title": "Greeting", "content": "Hello world " }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "total_entries": 10,
//!     "total_comparisons": 45,
//!     "performed_comparisons": 12,
//!     "skipped_comparisons": 33,
//!     "duplicate_groups": 1,
//!     "duplicate_entries": 1,
//!     "scan_duration_ms": 3,
//!     "exit_code": 0,
//!     "exit_code_name": "PD000",
//!     "generated_at": "2026-01-01T00:00:00+00:00"
//!   }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use promptdupe::duplicates::DuplicateScanner;
//! use promptdupe::entry::Entry;
//! use promptdupe::error::ExitCode;
//! use promptdupe::output::json::JsonOutput;
//!
//! let entries = vec![Entry::new("1", "a", "same"), Entry::new("2", "a", "same")];
//! let (groups, summary) = DuplicateScanner::with_defaults()
//!     .scan_with_summary(&entries)
//!     .unwrap();
//!
//! let output = JsonOutput::new(&groups, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

use std::io::Write;

use chrono::Utc;
use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::error::ExitCode;

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Number of entries scanned
    pub total_entries: usize,
    /// Number of non-empty length buckets
    pub bucket_count: usize,
    /// `n * (n - 1) / 2`
    pub total_comparisons: u64,
    /// Pairs actually compared
    pub performed_comparisons: u64,
    /// Pairs skipped by pruning or prior grouping
    pub skipped_comparisons: u64,
    /// Pairs matched by trimmed-content equality
    pub exact_matches: usize,
    /// Pairs matched by fuzzy similarity
    pub fuzzy_matches: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Number of redundant entries (excluding originals)
    pub duplicate_entries: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "PD000")
    pub exit_code_name: String,
    /// When this report was generated (RFC 3339)
    pub generated_at: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_entries: summary.total_entries,
            bucket_count: summary.bucket_count,
            total_comparisons: summary.total_comparisons,
            performed_comparisons: summary.performed_comparisons,
            skipped_comparisons: summary.skipped_comparisons(),
            exact_matches: summary.exact_matches,
            fuzzy_matches: summary.fuzzy_matches,
            duplicate_groups: summary.duplicate_groups,
            duplicate_entries: summary.duplicate_entries,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Duplicate groups, in discovery order
    pub groups: &'a [DuplicateGroup],
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl<'a> JsonOutput<'a> {
    /// Create a new JSON output from duplicate groups, summary and exit code.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            groups,
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
