//! Audit records written once per invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{calculator::CalculatorKind, params::Parameters};

/// Caller-supplied identifier correlating invocations from one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create a new, random session identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable record of one invocation, success or failure.
///
/// Exactly one of `output` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    /// The requested calculator key, as given. Unknown keys are recorded
    /// verbatim alongside their `UnknownCalculator` error.
    pub calculator_type: String,
    /// Inputs with patient-identifier fields removed.
    pub inputs: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditRecord {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// The registered calculator this record refers to, if any.
    pub fn kind(&self) -> Option<CalculatorKind> {
        self.calculator_type.parse().ok()
    }
}
