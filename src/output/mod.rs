//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Text for reading in a terminal
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```
//! use promptdupe::duplicates::DuplicateScanner;
//! use promptdupe::entry::Entry;
//! use promptdupe::output::TextOutput;
//!
//! let entries = vec![Entry::new("1", "a", "same"), Entry::new("2", "a", "same")];
//! let (groups, summary) = DuplicateScanner::with_defaults()
//!     .scan_with_summary(&entries)
//!     .unwrap();
//!
//! let text = TextOutput::new(&groups, &summary).with_color(false);
//! print!("{}", text.to_string().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

// Re-export main types
pub use csv::CsvOutput;
pub use json::JsonOutput;
pub use text::TextOutput;
