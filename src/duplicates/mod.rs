//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Content-length bucketing (pruning)
//! - Bounded pairwise comparison with timeout and cancellation
//! - Cooperative yielding during long scans
//! - Duplicate group management

pub mod groups;
pub mod scanner;
pub mod yielder;

pub use groups::{bucket_of, pair_count, DuplicateGroup, LengthBuckets, BUCKET_WIDTH};
pub use scanner::{DuplicateScanner, MatchKind, ScanError, ScanOptions, ScanSummary};
pub use yielder::{CountingYielder, NoopYielder, SleepYielder, Yielder};
