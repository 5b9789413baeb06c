//! Prompt entries and the read-only repository that supplies them.
//!
//! The duplicate engine only ever sees a `&[Entry]` snapshot. Where that
//! snapshot comes from is behind [`EntryRepository`]; [`FileRepository`]
//! reads it from a JSON or CSV export.
//!
//! # Example
//!
//! ```no_run
//! use promptdupe::entry::{EntryRepository, FileRepository};
//! use std::path::Path;
//!
//! let repo = FileRepository::new(Path::new("prompts.json"));
//! let entries = repo.get_all().unwrap();
//! println!("Loaded {} prompts", entries.len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A saved prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier
    pub id: String,
    /// Short title
    pub title: String,
    /// Prompt body
    pub content: String,
}

impl Entry {
    /// Create a new entry.
    ///
    /// # Example
    ///
    /// ```
    /// use promptdupe::entry::Entry;
    ///
    /// let entry = Entry::new("1", "Greeting", "Hello world");
    /// assert_eq!(entry.id, "1");
    /// ```
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Content length in chars.
    #[must_use]
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Errors that can occur while loading entries.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// An I/O error occurred while reading the source.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The JSON document could not be parsed.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// Path to the JSON file
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The CSV document could not be parsed.
    #[error("Invalid CSV in {path}: {source}")]
    Csv {
        /// Path to the CSV file
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: csv::Error,
    },

    /// The file extension is not a supported format.
    #[error("Unsupported entry format: '{0}' (expected .json or .csv)")]
    UnsupportedFormat(String),
}

/// Source of the entries to scan.
pub trait EntryRepository {
    /// Return a snapshot of every entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the source cannot be read or parsed.
    fn get_all(&self) -> Result<Vec<Entry>, RepositoryError>;
}

/// Entry source backed by an exported JSON or CSV file.
///
/// - `.json`: an array of `{"id", "title", "content"}` objects
/// - `.csv`: a header row `id,title,content` followed by one entry per row
#[derive(Debug, Clone)]
pub struct FileRepository {
    path: PathBuf,
}

impl FileRepository {
    /// Create a repository reading from `path`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// The file this repository reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_json(&self) -> Result<Vec<Entry>, RepositoryError> {
        let content = fs::read_to_string(&self.path).map_err(|e| RepositoryError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| RepositoryError::Json {
            path: self.path.clone(),
            source: e,
        })
    }

    fn read_csv(&self) -> Result<Vec<Entry>, RepositoryError> {
        let csv_error = |e| RepositoryError::Csv {
            path: self.path.clone(),
            source: e,
        };
        let mut reader = csv::Reader::from_path(&self.path).map_err(csv_error)?;
        reader
            .deserialize()
            .collect::<Result<Vec<Entry>, _>>()
            .map_err(csv_error)
    }
}

impl EntryRepository for FileRepository {
    fn get_all(&self) -> Result<Vec<Entry>, RepositoryError> {
        let extension = self
            .path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        let entries = match extension.as_str() {
            "json" => self.read_json()?,
            "csv" => self.read_csv()?,
            _ => return Err(RepositoryError::UnsupportedFormat(extension)),
        };

        log::debug!(
            "Loaded {} entries from {}",
            entries.len(),
            self.path.display()
        );
        Ok(entries)
    }
}
