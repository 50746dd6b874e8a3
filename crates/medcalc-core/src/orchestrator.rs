//! The calculator orchestrator: one synchronous pipeline per invocation.
//!
//!   Resolve → Guard → Scan → Verify → Compute → Advise → Report → Audit
//!
//! The formula is never reached unless the negative-value guard, the
//! extreme-value scan and the schema verification all pass. Every invocation
//! is audited exactly once, success or failure. An unknown calculator type
//! is rejected before anything else runs; its record keeps the requested key
//! and the error.

use chrono::Utc;
use tracing::{debug, info, warn};

use medcalc_contracts::{
    audit::{AuditRecord, SessionId},
    calculator::CalculatorKind,
    error::{CalcError, CalcResult},
    params::Parameters,
    result::{CalculatorResult, SafetyWarning},
};
use medcalc_safety::{advisors, extreme, DrugLimitTable};

use crate::config::CalculatorConfig;
use crate::report::CalculationReport;
use crate::sanitize::sanitize;
use crate::traits::{AuditSink, ParameterVerifier};

/// Drives calculator invocations.
///
/// The orchestrator owns its trusted collaborators and holds no other
/// state between invocations. It is `Send + Sync`; concurrent callers share
/// one instance and the audit sink serializes appends.
pub struct Orchestrator {
    audit: Box<dyn AuditSink>,
    verifier: Box<dyn ParameterVerifier>,
    drug_limits: DrugLimitTable,
}

impl Orchestrator {
    /// Create an orchestrator with the given collaborators and drug table.
    pub fn new(
        audit: Box<dyn AuditSink>,
        verifier: Box<dyn ParameterVerifier>,
        drug_limits: DrugLimitTable,
    ) -> Self {
        Self { audit, verifier, drug_limits }
    }

    /// Create an orchestrator whose drug table is built from `config`.
    pub fn with_config(
        audit: Box<dyn AuditSink>,
        verifier: Box<dyn ParameterVerifier>,
        config: &CalculatorConfig,
    ) -> CalcResult<Self> {
        Ok(Self::new(audit, verifier, config.drug_limit_table()?))
    }

    /// Run one calculator invocation.
    ///
    /// # Pipeline
    ///
    /// 1. Resolve `calculator_type`; unknown → `UnknownCalculator`, audited as a
    ///    failure without running any later step
    /// 2. Negative-value guard; any hit → `Validation`
    /// 3. Extreme-value scan; any fatal finding → `Validation`, warnings kept
    /// 4. Schema verification through the injected verifier → `InvalidParameters`
    /// 5. Formula; range and domain failures propagate
    /// 6. Merge scanner, formula and advisor warnings in that order
    /// 7. Attach the disclaimer
    /// 8. Audit the sanitized inputs with the output, or with the error on abort
    ///
    /// # Errors
    ///
    /// Any abort in steps 1-5 is audited and then returned. An audit write
    /// failure is returned as `AuditWriteFailed` and the report is dropped.
    pub fn invoke(
        &self,
        calculator_type: &str,
        params: Parameters,
        session: Option<SessionId>,
    ) -> CalcResult<CalculationReport> {
        // ── Step 1: Resolve ──────────────────────────────────────────────────
        let kind: CalculatorKind = match calculator_type.parse() {
            Ok(kind) => kind,
            Err(e) => {
                warn!(calculator = %calculator_type, "unknown calculator type rejected");
                self.write_audit(calculator_type, &params, session, None, Some(e.to_string()))?;
                return Err(e);
            }
        };

        debug!(
            calculator = %kind,
            params = params.len(),
            session = session.as_ref().map(|s| s.0.as_str()).unwrap_or("-"),
            "invocation starting"
        );

        match self.evaluate(kind, &params) {
            Ok(result) => {
                // ── Step 8: Audit the success ────────────────────────────────
                self.write_audit(kind.as_str(), &params, session, Some(result.value()), None)?;
                info!(
                    calculator = %kind,
                    value = result.value(),
                    warnings = result.warnings().len(),
                    critical = result.has_critical_advisory(),
                    "calculation complete"
                );
                Ok(CalculationReport::new(kind, result))
            }
            Err(err) => {
                self.write_audit(kind.as_str(), &params, session, None, Some(err.to_string()))?;
                Err(err)
            }
        }
    }

    /// Steps 2-7. Nothing here touches the audit sink.
    fn evaluate(&self, kind: CalculatorKind, params: &Parameters) -> CalcResult<CalculatorResult> {
        // ── Step 2: Negative-value guard ─────────────────────────────────────
        let negatives = extreme::validate_positive_numbers(params);
        if !negatives.is_empty() {
            let reason = negatives.join("; ");
            warn!(calculator = %kind, reason = %reason, "negative parameter rejected");
            return Err(CalcError::validation(reason));
        }

        // ── Step 3: Extreme-value scan ───────────────────────────────────────
        let (fatal, advisory): (Vec<_>, Vec<_>) =
            extreme::scan(params).into_iter().partition(|f| f.is_fatal());
        if !fatal.is_empty() {
            let reason = fatal
                .iter()
                .map(|f| f.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(calculator = %kind, reason = %reason, "extreme value rejected");
            return Err(CalcError::validation(reason));
        }
        let scanner_warnings: Vec<SafetyWarning> = advisory
            .into_iter()
            .map(|f| SafetyWarning::warning(f.message))
            .collect();

        // ── Step 4: Schema verification ──────────────────────────────────────
        let schema = medcalc_formulas::input_schema(kind);
        let report = self.verifier.verify(params, &schema)?;
        if !report.passed {
            let summary = report.summary();
            warn!(calculator = %kind, failures = %summary, "parameter verification failed");
            return Err(CalcError::invalid_parameters(format!("{kind}: {summary}")));
        }

        // ── Step 5: Formula ──────────────────────────────────────────────────
        let mut result = medcalc_formulas::compute(kind, params).map_err(|e| {
            warn!(calculator = %kind, error = %e, "formula rejected inputs");
            e
        })?;

        // ── Step 6: Merge warnings ───────────────────────────────────────────
        let advisories = advisors::advise(kind, params, &self.drug_limits);
        result.merge_warnings(scanner_warnings, advisories);

        Ok(result)
    }

    fn write_audit(
        &self,
        calculator_type: &str,
        params: &Parameters,
        session: Option<SessionId>,
        output: Option<f64>,
        error: Option<String>,
    ) -> CalcResult<()> {
        let record = AuditRecord {
            timestamp: Utc::now(),
            calculator_type: calculator_type.to_string(),
            inputs: sanitize(params),
            output,
            session_id: session,
            error,
        };
        self.audit.record(&record).map_err(|e| {
            warn!(calculator = %calculator_type, error = %e, "audit write failed");
            match e {
                CalcError::AuditWriteFailed { .. } => e,
                other => CalcError::AuditWriteFailed { reason: other.to_string() },
            }
        })
    }

    pub fn drug_limits(&self) -> &DrugLimitTable {
        &self.drug_limits
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
