//! Executor error types
//!
//! Connection failures, syntax errors and permission errors all surface
//! as one code: RELCHECK_EXECUTION_FAILED. Execution errors are recovered
//! per (descriptor, target) pair and never abort a run.

use std::fmt;

/// Executor error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// Query could not be run against the target
    ExecutionFailed,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::ExecutionFailed => "RELCHECK_EXECUTION_FAILED",
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error with the target it happened on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    target: String,
    message: String,
}

impl ExecutorError {
    /// Create an execution failed error
    pub fn execution_failed(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::ExecutionFailed,
            target: target.into(),
            message: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the target the query ran against
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the underlying error text
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.code, self.target, self.message)
    }
}

impl std::error::Error for ExecutorError {}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
