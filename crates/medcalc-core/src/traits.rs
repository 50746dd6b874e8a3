//! Seams between the orchestrator and its injected collaborators.
//!
//! - `AuditSink`         records every invocation, success or failure
//! - `ParameterVerifier` checks a parameter bag against a calculator's schema
//!
//! Both are owned by the orchestrator instance, so each host (or test) wires
//! in its own sink rather than sharing process-wide state.

use serde_json::Value;

use medcalc_contracts::{
    audit::AuditRecord, error::CalcResult, params::Parameters, verify::VerificationReport,
};

/// Append-only destination for invocation records.
///
/// A failed write is fatal: the orchestrator returns
/// `CalcError::AuditWriteFailed` instead of the report.
pub trait AuditSink: Send + Sync {
    /// Record one invocation. The inputs are already sanitized.
    fn record(&self, record: &AuditRecord) -> CalcResult<()>;
}

/// Structural checker for parameter bags.
///
/// Runs after the extreme-value scan and before the formula. A failing report
/// aborts the invocation with `CalcError::InvalidParameters`.
pub trait ParameterVerifier: Send + Sync {
    /// Verify `params` against the JSON Schema `schema`.
    ///
    /// Return `Err` only when verification itself could not run (for example
    /// a malformed schema). Failures found in the bag go in the report.
    fn verify(&self, params: &Parameters, schema: &Value) -> CalcResult<VerificationReport>;
}
