//! Duplicate groups and length-bucket pruning.
//!
//! # Overview
//!
//! Length bucketing is the pruning step of duplicate detection. Every entry
//! lands in bucket `floor(content_len / 100)` and is only ever compared
//! against entries from its own or an adjacent bucket. Entries further apart
//! differ in length too much to pass the length-ratio check of
//! [`smart_similarity`](crate::similarity::smart_similarity) at the content
//! threshold.
//!
//! # Example
//!
//! ```
//! use promptdupe::entry::Entry;
//! use promptdupe::duplicates::LengthBuckets;
//!
//! let entries = vec![
//!     Entry::new("1", "a", "x".repeat(50)),
//!     Entry::new("2", "b", "x".repeat(150)),
//!     Entry::new("3", "c", "x".repeat(250)),
//! ];
//!
//! let buckets = LengthBuckets::build(&entries);
//! assert_eq!(buckets.candidates(0), vec![1]);      // bucket 0 sees bucket 1 only
//! assert_eq!(buckets.candidates(1), vec![2]);      // forward-only
//! assert_eq!(buckets.bucket_count(), 3);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entry::Entry;

/// Width of a length bucket in chars.
pub const BUCKET_WIDTH: usize = 100;

/// A group of entries judged to be duplicates of one another.
///
/// Membership is exclusive: an entry id appears in at most one group, as
/// either `original` or one of `duplicates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The earliest entry of the group in input order
    pub original: Entry,
    /// Later entries similar to `original`, in input order
    pub duplicates: Vec<Entry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(original: Entry, duplicates: Vec<Entry>) -> Self {
        Self {
            original,
            duplicates,
        }
    }

    /// Number of entries in this group, original included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.duplicates.len() + 1
    }

    /// Groups always hold at least the original.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of redundant entries (all but the original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// Iterate over every entry, original first.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        std::iter::once(&self.original).chain(self.duplicates.iter())
    }

    /// Ids of every entry, original first.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.entries().map(|e| e.id.as_str()).collect()
    }
}

/// Bucket index for a content length in chars.
#[must_use]
pub fn bucket_of(content_len: usize) -> usize {
    content_len / BUCKET_WIDTH
}

/// Entry indices grouped by content-length bucket.
#[derive(Debug, Clone, Default)]
pub struct LengthBuckets {
    /// Bucket of each entry, by input index
    assignments: Vec<usize>,
    /// Input indices in each bucket, ascending
    members: HashMap<usize, Vec<usize>>,
}

impl LengthBuckets {
    /// Assign every entry to its bucket.
    #[must_use]
    pub fn build(entries: &[Entry]) -> Self {
        let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
        let assignments: Vec<usize> = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let bucket = bucket_of(entry.content_len());
                members.entry(bucket).or_default().push(idx);
                bucket
            })
            .collect();

        Self {
            assignments,
            members,
        }
    }

    /// Bucket of the entry at input index `idx`.
    #[must_use]
    pub fn bucket(&self, idx: usize) -> usize {
        self.assignments[idx]
    }

    /// Number of non-empty buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.members.len()
    }

    /// Indices `j > idx` in the same or an adjacent bucket, ascending.
    #[must_use]
    pub fn candidates(&self, idx: usize) -> Vec<usize> {
        let bucket = self.assignments[idx];
        let neighbours = [bucket.checked_sub(1), Some(bucket), bucket.checked_add(1)];

        let mut candidates: Vec<usize> = neighbours
            .into_iter()
            .flatten()
            .filter_map(|b| self.members.get(&b))
            .flat_map(|indices| {
                let start = indices.partition_point(|&j| j <= idx);
                indices[start..].iter().copied()
            })
            .collect();
        candidates.sort_unstable();
        candidates
    }

    /// Number of forward pairs that bucket pruning keeps.
    #[must_use]
    pub fn candidate_pairs(&self) -> u64 {
        (0..self.assignments.len())
            .map(|idx| self.candidates(idx).len() as u64)
            .sum()
    }
}

/// Forward pair count for `n` entries, `n * (n - 1) / 2`.
#[must_use]
pub fn pair_count(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}
