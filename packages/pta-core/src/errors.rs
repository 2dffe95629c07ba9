//! Error types for pta-core
//!
//! The fixpoint itself is a total computation over a finite domain; errors can
//! only arise while checking the input program against the IR contract, before
//! the worklist loop starts.

use thiserror::Error;

/// Main error type for pointer analysis operations
#[derive(Debug, Error)]
pub enum PtaError {
    /// The requested entry method does not exist or has no analyzable body
    #[error("entry method `{0}` has no analyzable body")]
    NoEntry(String),

    /// A statement violates the IR contract (e.g., a static invocation
    /// carrying an instance receiver)
    #[error("malformed statement in `{method}`: {reason}")]
    MalformedStmt { method: String, reason: String },
}

impl PtaError {
    /// Create a malformed-statement error
    pub fn malformed(method: impl Into<String>, reason: impl Into<String>) -> Self {
        PtaError::MalformedStmt {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for pointer analysis operations
pub type Result<T> = std::result::Result<T, PtaError>;
