//! Error types for the calculator pipeline.
//!
//! All fallible operations in the calculator runtime return `CalcResult<T>`.
//! Every variant is a hard stop: an invocation that produces a `CalcError`
//! never returns a result. Advisory findings travel as `SafetyWarning`s
//! instead (see `result`).

use thiserror::Error;

/// The unified error type for the calculator runtime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// The requested calculator type is not in the registry.
    #[error("unknown calculator type '{name}'")]
    UnknownCalculator { name: String },

    /// A value violated a hard bound, was negative, or was physiologically
    /// impossible.
    #[error("validation error: {reason}")]
    Validation { reason: String },

    /// A required parameter is missing, has the wrong type, or the parameter
    /// bag failed structural schema verification.
    #[error("invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    /// The formula is not defined for the supplied inputs
    /// (e.g. an adult-only equation called with age < 18).
    #[error("domain error: {reason}")]
    Domain { reason: String },

    /// The audit sink could not record the invocation.
    ///
    /// Fatal: an invocation that cannot be audited is not returned.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// A configuration document is missing or malformed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl CalcError {
    /// Shorthand for a `Validation` error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation { reason: reason.into() }
    }

    /// Shorthand for a `Domain` error.
    pub fn domain(reason: impl Into<String>) -> Self {
        Self::Domain { reason: reason.into() }
    }

    /// Shorthand for an `InvalidParameters` error.
    pub fn invalid_parameters(reason: impl Into<String>) -> Self {
        Self::InvalidParameters { reason: reason.into() }
    }
}

/// Convenience alias used throughout the calculator crates.
pub type CalcResult<T> = Result<T, CalcError>;
