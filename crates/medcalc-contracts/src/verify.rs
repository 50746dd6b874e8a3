//! Parameter verification report types.
//!
//! Before a formula runs, the parameter bag is checked structurally against
//! the calculator's input schema. Only a passing report lets the invocation
//! proceed.

use serde::{Deserialize, Serialize};

/// The result of checking a parameter bag against an input schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if no failure was found.
    pub passed: bool,
    /// Every failure collected during the run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    pub fn pass() -> Self {
        Self {
            passed: true,
            failures: Vec::new(),
        }
    }

    /// Join all failures into one `; `-separated line.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.location, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// One structural failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Where in the bag the failure occurred (`/weight`, or `/` for the root).
    pub location: String,
    /// Human-readable explanation.
    pub message: String,
}
