//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements [`ProgressCallback`]
//! to display a visual progress bar in the terminal while a duplicate scan runs.
//!
//! # Accessible Mode
//!
//! When accessible mode is enabled, progress reporting uses simplified output:
//! - ASCII bar characters only
//! - No colors

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress callback for duplicate scans.
///
/// Implement this trait to receive progress updates while
/// [`DuplicateScanner`](crate::duplicates::DuplicateScanner) compares entries.
pub trait ProgressCallback: Send + Sync {
    /// Called once before the first comparison.
    ///
    /// # Arguments
    ///
    /// * `total` - Total comparison count, `n * (n - 1) / 2`
    fn on_scan_start(&self, _total: u64) {}

    /// Called after every comparison, and once more at completion with
    /// `(100, total, total)`.
    ///
    /// # Arguments
    ///
    /// * `percent` - `round(100 * current / total)`
    /// * `current` - Comparisons performed so far
    /// * `total` - Total comparison count
    fn on_progress(&self, percent: u8, current: u64, total: u64);

    /// Called when the scan ends, successfully or not.
    fn on_scan_end(&self) {}

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
    accessible: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bar will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use promptdupe::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self::with_accessible(quiet, false)
    }

    /// Create a new progress reporter with accessible mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use promptdupe::progress::Progress;
    ///
    /// let progress = Progress::with_accessible(false, true);
    /// assert!(progress.is_accessible());
    /// ```
    #[must_use]
    pub fn with_accessible(quiet: bool, accessible: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
            accessible,
        }
    }

    /// Check if accessible mode is enabled.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    fn style(&self) -> ProgressStyle {
        if self.accessible {
            ProgressStyle::with_template(
                "[{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        } else {
            ProgressStyle::with_template(
                "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(ref pb) = *guard {
                f(pb);
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_scan_start(&self, total: u64) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(self.style());
        pb.set_message("Comparing prompts");
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_progress(&self, _percent: u8, current: u64, _total: u64) {
        if self.quiet {
            return;
        }
        self.with_bar(|pb| pb.set_position(current));
    }

    fn on_scan_end(&self) {
        if self.quiet {
            return;
        }
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_with_message("Comparison complete");
            }
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        let message = message.to_string();
        self.with_bar(move |pb| pb.set_message(message));
    }
}
