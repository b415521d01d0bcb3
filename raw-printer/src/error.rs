//! Error types for raw print submissions

use std::fmt;

use thiserror::Error;

/// Failure of a single call into the OS print spooler
///
/// `code` is the platform error code (`GetLastError` on Windows, 0 when unknown).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (os error {code})")]
pub struct SpoolError {
    pub code: u32,
    pub message: String,
}

impl SpoolError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Fatal outcome of a submission
///
/// Only the first fatal error of a submission is ever reported. Teardown
/// failures are carried separately as [`TeardownWarning`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    /// Device could not be opened (unknown name, access denied, offline)
    #[error("Device unavailable: {device}: {source}")]
    DeviceUnavailable { device: String, source: SpoolError },

    /// Spooler refused to start the job
    #[error("Job start failed: {job}: {source}")]
    JobStartFailed { job: String, source: SpoolError },

    /// Spooler refused to start the page
    #[error("Page start failed: {0}")]
    PageStartFailed(SpoolError),

    /// Payload transfer failed
    #[error("Write failed: {0}")]
    WriteFailed(SpoolError),

    /// Spooler accepted only part of the payload
    #[error("Short write: {written} of {expected} bytes accepted")]
    ShortWrite { written: usize, expected: usize },

    /// No raw spooler backend on this platform
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Blocking print task could not be joined
    #[error("Print task failed: {0}")]
    Runtime(String),
}

impl PrintError {
    /// Whether resubmitting the same payload is safe.
    ///
    /// True only when nothing can have reached the device yet.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PrintError::DeviceUnavailable { .. } | PrintError::JobStartFailed { .. }
        )
    }
}

/// Teardown step that may fail without failing the submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStep {
    EndPage,
    EndJob,
    Close,
}

impl fmt::Display for TeardownStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeardownStep::EndPage => f.write_str("end page"),
            TeardownStep::EndJob => f.write_str("end job"),
            TeardownStep::Close => f.write_str("close device"),
        }
    }
}

/// Non-fatal failure of end-page, end-job or close
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Teardown warning: {step} failed: {source}")]
pub struct TeardownWarning {
    pub step: TeardownStep,
    pub source: SpoolError,
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
