//! The structured report returned to callers, and its text rendering.
//!
//! Every successful invocation carries a disclaimer. It is attached by the
//! orchestrator and cannot be removed: `CalculationReport` has no
//! constructor outside this crate.

use serde::Serialize;

use medcalc_contracts::{calculator::CalculatorKind, result::CalculatorResult};

/// Disclaimer attached to every result.
pub const STANDARD_DISCLAIMER: &str = "⚕️ **Medical Disclaimer:** This calculation is provided for \
clinical decision support and educational purposes only. It does not replace professional clinical \
judgment. Verify every result independently before making treatment decisions.";

/// Disclaimer attached to dosing calculators.
pub const DOSING_DISCLAIMER: &str = "⚕️ **Medical Disclaimer:** This calculation is provided for \
clinical decision support and educational purposes only. It does not replace professional clinical \
judgment. Verify every result independently before making treatment decisions.\n\n\
🚨 **DOSING SAFETY WARNING:** Calculated doses must be checked by a licensed prescriber or \
pharmacist against current dosing references and institutional protocols before administration. \
Account for renal and hepatic function, allergies, drug interactions, maximum daily doses and the \
patient's full clinical picture. Never administer a dose flagged as an overdose alert without \
independent review.";

/// The disclaimer variant for `kind`.
pub fn disclaimer_for(kind: CalculatorKind) -> &'static str {
    if kind.is_dosing() {
        DOSING_DISCLAIMER
    } else {
        STANDARD_DISCLAIMER
    }
}

/// A completed calculation with its mandatory disclaimer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationReport {
    calculator: CalculatorKind,
    name: &'static str,
    result: CalculatorResult,
    disclaimer: &'static str,
}

impl CalculationReport {
    pub(crate) fn new(kind: CalculatorKind, result: CalculatorResult) -> Self {
        Self {
            calculator: kind,
            name: medcalc_formulas::spec(kind).name,
            result,
            disclaimer: disclaimer_for(kind),
        }
    }

    pub fn calculator(&self) -> CalculatorKind {
        self.calculator
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn result(&self) -> &CalculatorResult {
        &self.result
    }

    pub fn disclaimer(&self) -> &'static str {
        self.disclaimer
    }

    /// Render the report as markdown-style text.
    pub fn render(&self) -> String {
        let r = &self.result;
        let mut out = format!("## {}\n\n", self.name);

        out.push_str(&format!("**Result:** {}", format_value(r.value())));
        if let Some(unit) = r.unit() {
            out.push(' ');
            out.push_str(unit);
        }
        out.push('\n');

        if let Some(interpretation) = r.interpretation() {
            out.push_str(&format!("**Interpretation:** {}\n", interpretation));
        }
        out.push_str(&format!("\n**Formula:** {}\n", r.formula()));

        if !r.notes().is_empty() {
            out.push_str("\n**Notes:**\n");
            for note in r.notes() {
                out.push_str(&format!("- {}\n", note));
            }
        }

        if !r.warnings().is_empty() {
            out.push_str("\n**Safety Warnings:**\n");
            for warning in r.warnings() {
                out.push_str(&format!("{} {}\n", warning.level.icon(), warning.message));
            }
        }

        out.push_str(&format!("\n**Reference:** {}\n", r.citation()));
        out.push_str("\n---\n");
        out.push_str(self.disclaimer);
        out.push('\n');
        out
    }
}

/// Whole numbers without decimals, everything else to at most two places.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{:.0}", value);
    }
    let fixed = format!("{:.2}", value);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}
