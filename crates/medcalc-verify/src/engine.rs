//! Schema-based parameter verifier.
//!
//! `SchemaParameterVerifier` implements `ParameterVerifier` from
//! `medcalc-core` in two phases:
//!
//! 1. **Structural**: the parameter bag, as JSON, is validated against the
//!    calculator's input schema with the `jsonschema` crate.
//! 2. **Cross-field**: rules registered for the schema's calculator (its
//!    `title`) run against the same JSON. They cover constraints a flat
//!    object schema does not express, such as "one of these two fields".
//!
//! All failures from both phases are collected into one report.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use medcalc_contracts::{
    calculator::CalculatorKind,
    error::{CalcError, CalcResult},
    params::Parameters,
    verify::{VerificationFailure, VerificationReport},
};
use medcalc_core::traits::ParameterVerifier;

/// A cross-field check. Returns `Some(message)` on failure.
pub type CrossFieldRule = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

struct NamedRule {
    name: String,
    check: CrossFieldRule,
}

/// JSON Schema verifier with optional per-calculator cross-field rules.
#[derive(Default)]
pub struct SchemaParameterVerifier {
    rules: BTreeMap<CalculatorKind, Vec<NamedRule>>,
}

impl SchemaParameterVerifier {
    /// A verifier with structural validation only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A verifier with the built-in cross-field rules registered.
    pub fn with_clinical_rules() -> Self {
        let mut verifier = Self::new();
        verifier.register_rule(
            CalculatorKind::QtcCorrection,
            "interval-source",
            Box::new(|bag| {
                let has = |key: &str| bag.get(key).is_some_and(|v| !v.is_null());
                if has("rr") || has("heartRate") {
                    None
                } else {
                    Some("either rr or heartRate is required".to_string())
                }
            }),
        );
        verifier
    }

    /// Register `check` under `name` for calculator `kind`.
    ///
    /// Rules for one calculator run in registration order.
    pub fn register_rule(
        &mut self,
        kind: CalculatorKind,
        name: impl Into<String>,
        check: CrossFieldRule,
    ) {
        self.rules.entry(kind).or_default().push(NamedRule {
            name: name.into(),
            check,
        });
    }

    fn rules_for(&self, schema: &Value) -> &[NamedRule] {
        schema
            .get("title")
            .and_then(Value::as_str)
            .and_then(|title| title.parse::<CalculatorKind>().ok())
            .and_then(|kind| self.rules.get(&kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl ParameterVerifier for SchemaParameterVerifier {
    fn verify(&self, params: &Parameters, schema: &Value) -> CalcResult<VerificationReport> {
        let validator = jsonschema::validator_for(schema).map_err(|e| CalcError::ConfigError {
            reason: format!("invalid input schema: {e}"),
        })?;

        let bag = params.to_json();
        let title = schema.get("title").and_then(Value::as_str).unwrap_or("<untitled>");
        let mut failures: Vec<VerificationFailure> = Vec::new();

        // ── Phase 1: structural ──────────────────────────────────────────────
        for error in validator.iter_errors(&bag) {
            let pointer = error.instance_path.to_string();
            let location = if pointer.is_empty() { "/".to_string() } else { pointer };
            let message = error.to_string();
            warn!(schema = title, %location, %message, "parameter schema violation");
            failures.push(VerificationFailure { location, message });
        }

        // ── Phase 2: cross-field ─────────────────────────────────────────────
        for rule in self.rules_for(schema) {
            debug!(schema = title, rule = %rule.name, "evaluating cross-field rule");
            if let Some(message) = (rule.check)(&bag) {
                warn!(schema = title, rule = %rule.name, %message, "cross-field rule failed");
                failures.push(VerificationFailure {
                    location: "/".to_string(),
                    message,
                });
            }
        }

        let passed = failures.is_empty();
        debug!(schema = title, passed, failure_count = failures.len(), "verification complete");

        Ok(VerificationReport { passed, failures })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
