//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the dupescan application.
///
/// - 0: Success (duplicates found and session completed)
/// - 1: General error (invalid root, unexpected failure)
/// - 2: No duplicates found (scan completed normally, nothing to resolve)
/// - 3: Partial success (completed with some non-fatal per-file errors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: duplicates were found and the session completed.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Partial success: completed but some files failed to hash, delete,
    /// or rename.
    PartialSuccess = 3,
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
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NoDuplicates => "DS002",
            Self::PartialSuccess => "DS003",
        }
    }
}

/// Structured error information for `--json-errors` output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
        }
    }
}
