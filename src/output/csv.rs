//! CSV output formatter for duplicate scan results.
//!
//! One row is generated for each entry of each duplicate group.
//!
//! # Columns
//!
//! - `group_id`: Numeric ID identifying the duplicate group (1-based)
//! - `role`: `original` or `duplicate`
//! - `id`: Entry id
//! - `title`: Entry title
//!
//! # Example
//!
//! ```
//! use promptdupe::duplicates::DuplicateGroup;
//! use promptdupe::entry::Entry;
//! use promptdupe::output::csv::CsvOutput;
//!
//! let groups = vec![DuplicateGroup::new(
//!     Entry::new("1", "Greeting", "Hello"),
//!     vec![Entry::new("2", "Greeting", "Hello")],
//! )];
//!
//! let csv = CsvOutput::new(&groups).to_string().unwrap();
//! assert!(csv.starts_with("group_id,role,id,title\n"));
//! ```

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Role of an entry within its group.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    Original,
    Duplicate,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    role: Role,
    id: &'a str,
    title: &'a str,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, group) in self.groups.iter().enumerate() {
            let group_id = idx + 1;
            for (pos, entry) in group.entries().enumerate() {
                csv_writer.serialize(CsvRow {
                    group_id,
                    role: if pos == 0 {
                        Role::Original
                    } else {
                        Role::Duplicate
                    },
                    id: &entry.id,
                    title: &entry.title,
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
