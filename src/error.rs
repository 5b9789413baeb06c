//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::ScanError;

/// Exit codes for the promptdupe application.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (unexpected failure, invalid options, unreadable input)
/// - 2: No duplicates found (completed normally, no duplicates)
/// - 3: Size limit exceeded (scan refused, too many entries)
/// - 4: Timeout (scan ran out of its wall-clock budget)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and duplicates were found.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Size limit exceeded: Too many entries to compare safely.
    SizeLimitExceeded = 3,
    /// Timeout: The scan did not finish within its budget.
    Timeout = 4,
    /// Interrupted: Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "PD000",
            Self::GeneralError => "PD001",
            Self::NoDuplicates => "PD002",
            Self::SizeLimitExceeded => "PD003",
            Self::Timeout => "PD004",
            Self::Interrupted => "PD130",
        }
    }

    /// Exit code for a failed scan.
    #[must_use]
    pub fn from_scan_error(err: &ScanError) -> Self {
        match err {
            ScanError::InvalidOptions { .. } => Self::GeneralError,
            ScanError::SizeLimitExceeded { .. } => Self::SizeLimitExceeded,
            ScanError::Timeout { .. } => Self::Timeout,
            ScanError::Cancelled { .. } => Self::Interrupted,
        }
    }

    /// Exit code for any application error, looking through anyhow context.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<ScanError>())
            .map_or(Self::GeneralError, Self::from_scan_error)
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "PD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::NoDuplicates.as_i32(), 2);
        assert_eq!(ExitCode::SizeLimitExceeded.as_i32(), 3);
        assert_eq!(ExitCode::Timeout.as_i32(), 4);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_from_scan_error() {
        let err = ScanError::Timeout {
            elapsed_ms: 5,
            processed_comparisons: 1,
            total_comparisons: 2,
        };
        assert_eq!(ExitCode::from_scan_error(&err), ExitCode::Timeout);

        let err = ScanError::Cancelled {
            processed_comparisons: 0,
            total_comparisons: 2,
        };
        assert_eq!(ExitCode::from_scan_error(&err), ExitCode::Interrupted);
    }

    #[test]
    fn test_from_error_sees_through_context() {
        let err = Err::<(), _>(ScanError::SizeLimitExceeded {
            count: 15,
            max_items: 10,
            estimated_comparisons: 105,
        })
        .context("Duplicate scan failed")
        .unwrap_err();

        assert_eq!(ExitCode::from_error(&err), ExitCode::SizeLimitExceeded);
        assert_eq!(
            ExitCode::from_error(&anyhow::anyhow!("boom")),
            ExitCode::GeneralError
        );
    }

    #[test]
    fn test_structured_error_json() {
        let err = anyhow::anyhow!("bad input");
        let structured = StructuredError::new(&err, ExitCode::GeneralError);
        let json = serde_json::to_string(&structured).unwrap();
        assert!(json.contains("\"code\":\"PD001\""));
        assert!(json.contains("\"exit_code\":1"));
        assert!(json.contains("\"interrupted\":false"));
    }
}
