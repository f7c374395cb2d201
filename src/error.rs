//! Domain error type shared by every pipeline stage.
//!
//! Stage-level failures propagate as `Result<_, Error>`; per-file failures
//! are recovered locally by omission and only surface through tracing.

use std::fmt;

/// Classifies an [`Error`] for callers that branch on the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An expected artifact or marker was absent (e.g. no solution file).
    NotFound,
    /// I/O, parse, network or service failure.
    Failure,
    /// The operation was interrupted by the run's cancellation signal.
    Cancelled,
}

/// Error carried across stage boundaries: a stable short code, a
/// human-readable message and an optional offending field name.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: String,
    message: String,
    kind: ErrorKind,
    invalid_field: Option<String>,
}

impl Error {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        kind: ErrorKind,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            kind,
            invalid_field: None,
        }
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorKind::Failure)
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorKind::NotFound)
    }

    pub fn cancelled(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorKind::Cancelled)
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.invalid_field = Some(field.into());
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn invalid_field(&self) -> Option<&str> {
        self.invalid_field.as_deref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}
