//! Duplicate scanner with bounded pairwise comparison.
//!
//! # Overview
//!
//! This module orchestrates near-duplicate detection over a list of entries:
//! 1. **Validation**: Reject malformed options before any work
//! 2. **Size guard**: Refuse collections above `max_items` unless explicitly allowed
//! 3. **Bucketing**: Group entries by content length (see [`crate::duplicates::groups`])
//! 4. **Comparison**: Compare each unprocessed entry against later entries in
//!    adjacent buckets, within a wall-clock budget, yielding cooperatively
//! 5. **Grouping**: First-discovery order decides which entry is the original
//!
//! A scan is all-or-nothing: on timeout or cancellation no groups are returned.
//!
//! # Example
//!
//! ```
//! use promptdupe::entry::Entry;
//! use promptdupe::duplicates::{DuplicateScanner, ScanOptions};
//!
//! let entries = vec![
//!     Entry::new("1", "A", "Hello world"),
//!     Entry::new("2", "A", "Hello world"),
//!     Entry::new("3", "B", "Something else entirely"),
//! ];
//!
//! let scanner = DuplicateScanner::new(ScanOptions::default().with_max_items(100));
//! let groups = scanner.scan(&entries).unwrap();
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].original.id, "1");
//! assert_eq!(groups[0].duplicates[0].id, "2");
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::groups::{pair_count, DuplicateGroup, LengthBuckets};
use super::yielder::{SleepYielder, Yielder};
use crate::entry::Entry;
use crate::progress::ProgressCallback;
use crate::similarity::{smart_similarity_with, Metrics, StandardMetrics, DEFAULT_THRESHOLD};

/// Default maximum number of entries scanned without explicit opt-in.
pub const DEFAULT_MAX_ITEMS: usize = 1000;
/// Default wall-clock budget for a scan.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default interval between cooperative yields.
pub const DEFAULT_YIELD_INTERVAL_MS: u64 = 50;
/// Default title similarity cutoff (strictly greater than).
pub const DEFAULT_TITLE_THRESHOLD: f64 = 0.8;
/// Default content similarity cutoff (strictly greater than).
pub const DEFAULT_CONTENT_THRESHOLD: f64 = 0.9;

/// Configuration for a duplicate scan.
///
/// Built once per scan through the `with_*` builders and never mutated while
/// the scan runs.
#[derive(Clone)]
pub struct ScanOptions {
    /// Largest collection scanned without `allow_large_datasets`.
    pub max_items: usize,
    /// Bypass the `max_items` guard. The timeout still applies.
    pub allow_large_datasets: bool,
    /// Wall-clock budget in milliseconds.
    pub timeout_ms: u64,
    /// Minimum wall-clock time between cooperative yields, in milliseconds.
    pub yield_interval_ms: u64,
    /// Titles must score strictly above this.
    pub title_threshold: f64,
    /// Contents must score strictly above this.
    pub content_threshold: f64,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
    /// Optional shutdown flag for cancellation.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Yield primitive supplied by the host.
    pub yielder: Arc<dyn Yielder>,
}

impl std::fmt::Debug for ScanOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanOptions")
            .field("max_items", &self.max_items)
            .field("allow_large_datasets", &self.allow_large_datasets)
            .field("timeout_ms", &self.timeout_ms)
            .field("yield_interval_ms", &self.yield_interval_ms)
            .field("title_threshold", &self.title_threshold)
            .field("content_threshold", &self.content_threshold)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .field("shutdown_flag", &self.shutdown_flag)
            .field("yielder", &"<yielder>")
            .finish()
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            allow_large_datasets: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            yield_interval_ms: DEFAULT_YIELD_INTERVAL_MS,
            title_threshold: DEFAULT_TITLE_THRESHOLD,
            content_threshold: DEFAULT_CONTENT_THRESHOLD,
            progress_callback: None,
            shutdown_flag: None,
            yielder: Arc::new(SleepYielder::default()),
        }
    }
}

impl ScanOptions {
    /// Set the item limit.
    #[must_use]
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Allow collections above the item limit.
    #[must_use]
    pub fn with_allow_large_datasets(mut self, allow: bool) -> Self {
        self.allow_large_datasets = allow;
        self
    }

    /// Set the wall-clock budget.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the yield interval.
    #[must_use]
    pub fn with_yield_interval_ms(mut self, interval_ms: u64) -> Self {
        self.yield_interval_ms = interval_ms;
        self
    }

    /// Set the title cutoff.
    #[must_use]
    pub fn with_title_threshold(mut self, threshold: f64) -> Self {
        self.title_threshold = threshold;
        self
    }

    /// Set the content cutoff.
    #[must_use]
    pub fn with_content_threshold(mut self, threshold: f64) -> Self {
        self.content_threshold = threshold;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Set the shutdown flag for cancellation.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the yield primitive.
    #[must_use]
    pub fn with_yielder(mut self, yielder: Arc<dyn Yielder>) -> Self {
        self.yielder = yielder;
        self
    }

    /// Check the options before a scan.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidOptions`] for a zero `max_items` or
    /// `timeout_ms`, or a threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.max_items == 0 {
            return Err(ScanError::invalid("max_items", "must be positive"));
        }
        if self.timeout_ms == 0 {
            return Err(ScanError::invalid("timeout_ms", "must be positive"));
        }
        for (field, value) in [
            ("title_threshold", self.title_threshold),
            ("content_threshold", self.content_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScanError::invalid(
                    field,
                    format!("{} is outside [0, 1]", value),
                ));
            }
        }
        Ok(())
    }

    /// Check if cancellation has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Errors that can occur during a duplicate scan.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    /// Options were malformed.
    #[error("Invalid scan option '{field}': {reason}")]
    InvalidOptions {
        /// Offending option
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The collection is larger than the configured limit.
    #[error(
        "Too many prompts to compare safely: {count} entries exceed the limit of {max_items} \
         ({estimated_comparisons} comparisons)"
    )]
    SizeLimitExceeded {
        /// Number of entries submitted
        count: usize,
        /// Configured limit
        max_items: usize,
        /// `count * (count - 1) / 2`
        estimated_comparisons: u64,
    },

    /// The wall-clock budget ran out before the scan finished.
    #[error(
        "Scan timed out after {elapsed_ms} ms ({processed_comparisons} of {total_comparisons} \
         comparisons done)"
    )]
    Timeout {
        /// Time spent before giving up
        elapsed_ms: u64,
        /// Comparisons performed
        processed_comparisons: u64,
        /// Comparisons planned
        total_comparisons: u64,
    },

    /// The scan was cancelled through the shutdown flag.
    #[error(
        "Scan cancelled ({processed_comparisons} of {total_comparisons} comparisons done)"
    )]
    Cancelled {
        /// Comparisons performed
        processed_comparisons: u64,
        /// Comparisons planned
        total_comparisons: u64,
    },
}

impl ScanError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOptions {
            field,
            reason: reason.into(),
        }
    }
}

/// How two entries were judged to be duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Contents are equal after trimming whitespace
    Exact,
    /// Title and content both scored above their cutoffs
    Fuzzy,
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Number of entries submitted
    pub total_entries: usize,
    /// Number of non-empty length buckets
    pub bucket_count: usize,
    /// `n * (n - 1) / 2`
    pub total_comparisons: u64,
    /// Pairs actually compared
    pub performed_comparisons: u64,
    /// Pairs matched by trimmed-content equality
    pub exact_matches: usize,
    /// Pairs matched by fuzzy similarity
    pub fuzzy_matches: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Number of redundant entries (excluding originals)
    pub duplicate_entries: usize,
    /// Number of cooperative yields
    pub yields: usize,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Pairs never compared, because of bucket pruning or prior grouping.
    #[must_use]
    pub fn skipped_comparisons(&self) -> u64 {
        self.total_comparisons - self.performed_comparisons
    }

    /// Percentage of planned comparisons that were skipped.
    #[must_use]
    pub fn skipped_percentage(&self) -> f64 {
        if self.total_comparisons == 0 {
            0.0
        } else {
            (self.skipped_comparisons() as f64 / self.total_comparisons as f64) * 100.0
        }
    }
}

/// Near-duplicate scanner.
///
/// Holds no state between scans; every call to [`DuplicateScanner::scan`]
/// starts fresh.
///
/// # Example
///
/// ```
/// use promptdupe::duplicates::{DuplicateScanner, ScanError, ScanOptions};
/// use promptdupe::entry::Entry;
///
/// let entries: Vec<Entry> = (0..15)
///     .map(|i| Entry::new(i.to_string(), "t", format!("prompt {}", i)))
///     .collect();
///
/// let scanner = DuplicateScanner::new(ScanOptions::default().with_max_items(10));
/// match scanner.scan(&entries) {
///     Err(ScanError::SizeLimitExceeded { count, estimated_comparisons, .. }) => {
///         assert_eq!(count, 15);
///         assert_eq!(estimated_comparisons, 105);
///     }
///     other => panic!("unexpected result: {:?}", other),
/// }
/// ```
pub struct DuplicateScanner<M = StandardMetrics> {
    options: ScanOptions,
    metrics: M,
}

impl DuplicateScanner {
    /// Create a new scanner with the given options.
    #[must_use]
    pub fn new(options: ScanOptions) -> Self {
        Self::with_metrics(options, StandardMetrics)
    }

    /// Create a new scanner with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ScanOptions::default())
    }
}

impl<M: Metrics> DuplicateScanner<M> {
    /// Create a scanner that compares with a custom [`Metrics`] implementation.
    #[must_use]
    pub fn with_metrics(options: ScanOptions, metrics: M) -> Self {
        Self { options, metrics }
    }

    /// The options this scanner was built with.
    #[must_use]
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Decide whether two entries are duplicates, and how.
    #[must_use]
    pub fn match_kind(&self, x: &Entry, y: &Entry) -> Option<MatchKind> {
        if x.content.trim() == y.content.trim() {
            return Some(MatchKind::Exact);
        }

        // The selector always runs at its default cutoff; the configured
        // thresholds only apply to the score it returns.
        let titles = smart_similarity_with(&self.metrics, &x.title, &y.title, DEFAULT_THRESHOLD);
        if !titles.exceeds(self.options.title_threshold) {
            return None;
        }

        let contents =
            smart_similarity_with(&self.metrics, &x.content, &y.content, DEFAULT_THRESHOLD);
        contents
            .exceeds(self.options.content_threshold)
            .then_some(MatchKind::Fuzzy)
    }

    /// Check whether two entries are duplicates.
    #[must_use]
    pub fn are_similar(&self, x: &Entry, y: &Entry) -> bool {
        self.match_kind(x, y).is_some()
    }

    /// Find duplicate groups in `entries`.
    ///
    /// # Errors
    ///
    /// Returns `ScanError` if the options are invalid, the collection is over
    /// the item limit, the wall-clock budget runs out, or the scan is
    /// cancelled. No groups are returned in any of these cases.
    pub fn scan(&self, entries: &[Entry]) -> Result<Vec<DuplicateGroup>, ScanError> {
        self.scan_with_summary(entries).map(|(groups, _)| groups)
    }

    /// Find duplicate groups in `entries`, with summary statistics.
    ///
    /// # Errors
    ///
    /// Same as [`DuplicateScanner::scan`].
    pub fn scan_with_summary(
        &self,
        entries: &[Entry],
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), ScanError> {
        let start = Instant::now();
        self.options.validate()?;

        let n = entries.len();
        let total = pair_count(n);

        if n > self.options.max_items && !self.options.allow_large_datasets {
            log::warn!(
                "Refusing to scan {} entries (limit {}, {} comparisons)",
                n,
                self.options.max_items,
                total
            );
            return Err(ScanError::SizeLimitExceeded {
                count: n,
                max_items: self.options.max_items,
                estimated_comparisons: total,
            });
        }

        log::info!(
            "Starting duplicate scan of {} entries ({} comparisons at most)",
            n,
            total
        );

        let buckets = LengthBuckets::build(entries);
        let mut summary = ScanSummary {
            total_entries: n,
            bucket_count: buckets.bucket_count(),
            total_comparisons: total,
            ..Default::default()
        };
        log::debug!(
            "Length bucketing: {} entries in {} buckets",
            n,
            summary.bucket_count
        );

        let callback = self.options.progress_callback.as_deref();
        if let Some(callback) = callback {
            callback.on_scan_start(total);
        }

        let result = self.compare_all(entries, &buckets, start, &mut summary);

        if let Some(callback) = callback {
            if result.is_ok() {
                callback.on_progress(100, total, total);
            }
            callback.on_scan_end();
        }

        let groups = match result {
            Ok(groups) => groups,
            Err(e) => {
                log::warn!("Duplicate scan aborted: {}", e);
                return Err(e);
            }
        };

        summary.duplicate_groups = groups.len();
        summary.duplicate_entries = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.scan_duration = start.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate entries, {} of {} comparisons performed in {:?}",
            summary.duplicate_groups,
            summary.duplicate_entries,
            summary.performed_comparisons,
            summary.total_comparisons,
            summary.scan_duration
        );

        Ok((groups, summary))
    }

    fn compare_all(
        &self,
        entries: &[Entry],
        buckets: &LengthBuckets,
        start: Instant,
        summary: &mut ScanSummary,
    ) -> Result<Vec<DuplicateGroup>, ScanError> {
        let total = summary.total_comparisons;
        let timeout = Duration::from_millis(self.options.timeout_ms);
        let yield_interval = Duration::from_millis(self.options.yield_interval_ms);
        let callback = self.options.progress_callback.as_deref();

        let mut processed: HashSet<&str> = HashSet::new();
        let mut groups = Vec::new();
        let mut current = 0u64;
        let mut last_yield = Instant::now();

        for (i, original) in entries.iter().enumerate() {
            if processed.contains(original.id.as_str()) {
                continue;
            }
            self.check_budget(start, timeout, current, total)?;

            let mut duplicates: Vec<usize> = Vec::new();
            for j in buckets.candidates(i) {
                let candidate = &entries[j];
                if processed.contains(candidate.id.as_str()) {
                    continue;
                }

                let kind = self.match_kind(original, candidate);
                current += 1;

                if let Some(callback) = callback {
                    let percent = ((current as f64 * 100.0) / total as f64).round() as u8;
                    callback.on_progress(percent, current, total);
                }

                if last_yield.elapsed() >= yield_interval {
                    self.options.yielder.yield_now();
                    summary.yields += 1;
                    last_yield = Instant::now();
                }

                match kind {
                    Some(MatchKind::Exact) => summary.exact_matches += 1,
                    Some(MatchKind::Fuzzy) => summary.fuzzy_matches += 1,
                    None => {}
                }
                if kind.is_some() {
                    log::trace!("Entry {} duplicates {} ({:?})", candidate.id, original.id, kind);
                    duplicates.push(j);
                }

                summary.performed_comparisons = current;
                self.check_budget(start, timeout, current, total)?;
            }

            if duplicates.is_empty() {
                continue;
            }

            processed.insert(original.id.as_str());
            for &j in &duplicates {
                processed.insert(entries[j].id.as_str());
            }

            log::debug!(
                "Duplicate group {}: {} entries",
                original.id,
                duplicates.len() + 1
            );
            groups.push(DuplicateGroup::new(
                original.clone(),
                duplicates.into_iter().map(|j| entries[j].clone()).collect(),
            ));
        }

        Ok(groups)
    }

    /// Fail with `Timeout` or `Cancelled` once the scan must stop.
    fn check_budget(
        &self,
        start: Instant,
        timeout: Duration,
        current: u64,
        total: u64,
    ) -> Result<(), ScanError> {
        if self.options.is_shutdown_requested() {
            return Err(ScanError::Cancelled {
                processed_comparisons: current,
                total_comparisons: total,
            });
        }

        let elapsed = start.elapsed();
        if elapsed > timeout {
            return Err(ScanError::Timeout {
                elapsed_ms: elapsed.as_millis() as u64,
                processed_comparisons: current,
                total_comparisons: total,
            });
        }
        Ok(())
    }
}
