//! Ctrl+C cancellation for long scans.
//!
//! ```rust,no_run
//! use promptdupe::duplicates::ScanOptions;
//! use promptdupe::signal::install_handler;
//!
//! let cancel = install_handler().expect("Failed to install signal handler");
//! let options = ScanOptions::default().with_shutdown_flag(cancel.flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Cancellation token shared between the Ctrl+C hook and a scan.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Ask the running scan to stop at its next budget check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Flag for [`ScanOptions::with_shutdown_flag`](crate::duplicates::ScanOptions::with_shutdown_flag).
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    fn rearm(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static PROCESS_TOKEN: OnceLock<CancelToken> = OnceLock::new();

/// Hook Ctrl+C to a process-wide [`CancelToken`] and return it, re-armed.
///
/// `ctrlc` allows a single hook per process. When some other code already
/// owns it, the token is still returned but only [`CancelToken::cancel`]
/// trips it.
///
/// # Errors
///
/// Returns `SignalError` only when the hook cannot be registered for a
/// reason other than an existing hook.
pub fn install_handler() -> Result<CancelToken, SignalError> {
    let mut fresh = false;
    let token = PROCESS_TOKEN.get_or_init(|| {
        fresh = true;
        CancelToken::new()
    });
    token.rearm();
    if !fresh {
        return Ok(token.clone());
    }

    let flag = token.flag();
    match ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\nInterrupted. Stopping scan...");
        let _ = stderr.flush();
        log::info!("Scan cancellation requested from the terminal");
    }) {
        Ok(()) => Ok(token.clone()),
        Err(ctrlc::Error::MultipleHandlers) => {
            log::debug!("Ctrl+C is already hooked; cancellation stays manual");
            Ok(token.clone())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::{DuplicateScanner, NoopYielder, ScanError, ScanOptions};
    use crate::entry::Entry;

    fn scanner_for(token: &CancelToken) -> DuplicateScanner {
        DuplicateScanner::new(
            ScanOptions::default()
                .with_shutdown_flag(token.flag())
                .with_yielder(Arc::new(NoopYielder)),
        )
    }

    #[test]
    fn test_token_starts_clear() {
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn test_clones_share_cancellation() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(token.flag().load(Ordering::SeqCst));
    }

    #[test]
    fn test_install_rearms_process_token() {
        let first = install_handler().unwrap();
        first.cancel();

        let second = install_handler().unwrap();
        assert!(!second.is_cancelled());
        assert!(!first.is_cancelled());
    }

    #[test]
    fn test_cancelled_token_stops_scan() {
        let token = CancelToken::new();
        token.cancel();

        let entries = vec![Entry::new("1", "a", "x"), Entry::new("2", "b", "y")];
        assert_eq!(
            scanner_for(&token).scan(&entries),
            Err(ScanError::Cancelled {
                processed_comparisons: 0,
                total_comparisons: 1,
            })
        );
    }

    #[test]
    fn test_clear_token_lets_scan_finish() {
        let token = CancelToken::new();
        let entries = vec![Entry::new("1", "a", "x"), Entry::new("2", "a", "x")];
        assert_eq!(scanner_for(&token).scan(&entries).unwrap().len(), 1);
    }
}
