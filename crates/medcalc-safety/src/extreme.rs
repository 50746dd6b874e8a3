//! Input-integrity guards that run before any formula.
//!
//! These checks are independent of which calculator is running. They catch
//! typos (a shifted decimal point, a weight entered in grams) rather than
//! clinical abnormalities, and they skip silently over absent or
//! non-numeric fields.

use serde::Serialize;

use medcalc_contracts::params::Parameters;

/// How serious an extreme-value finding is.
///
/// Only `Fatal` aborts an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    Warning,
    Fatal,
}

/// One result of the extreme-value sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeFinding {
    pub parameter: &'static str,
    pub severity: FindingSeverity,
    pub message: String,
}

impl ExtremeFinding {
    fn fatal(parameter: &'static str, message: String) -> Self {
        Self {
            parameter,
            severity: FindingSeverity::Fatal,
            message,
        }
    }

    fn warning(parameter: &'static str, message: String) -> Self {
        Self {
            parameter,
            severity: FindingSeverity::Warning,
            message,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == FindingSeverity::Fatal
    }
}

/// Flag every numeric parameter below zero, whatever it represents.
///
/// Returns one message per offending field, in key order.
pub fn validate_positive_numbers(params: &Parameters) -> Vec<String> {
    params
        .numbers()
        .filter(|(_, value)| *value < 0.0)
        .map(|(key, value)| format!("Parameter '{key}' cannot be negative (got {value})"))
        .collect()
}

/// Cross-parameter sanity sweep over weight, height, age and creatinine.
///
/// A height supplied with `heightUnit = "m"` is converted to centimetres
/// before the thresholds apply.
pub fn scan(params: &Parameters) -> Vec<ExtremeFinding> {
    let mut findings = Vec::new();

    if let Some(weight) = params.number("weight") {
        if weight > 500.0 {
            findings.push(ExtremeFinding::fatal(
                "weight",
                format!("Weight {weight} kg exceeds the physiological maximum (500 kg); check units"),
            ));
        } else if weight > 200.0 {
            findings.push(ExtremeFinding::warning(
                "weight",
                format!("Weight {weight} kg is unusually high; please confirm"),
            ));
        } else if weight < 0.5 {
            findings.push(ExtremeFinding::fatal(
                "weight",
                format!("Weight {weight} kg is below the physiological minimum (0.5 kg)"),
            ));
        }
    }

    if let Some(raw_height) = params.number("height") {
        let height = if params.text("heightUnit") == Some("m") {
            raw_height * 100.0
        } else {
            raw_height
        };
        if height > 250.0 {
            findings.push(ExtremeFinding::fatal(
                "height",
                format!("Height {height} cm exceeds the physiological maximum (250 cm); check units"),
            ));
        } else if height > 220.0 {
            findings.push(ExtremeFinding::warning(
                "height",
                format!("Height {height} cm is unusually tall; please confirm"),
            ));
        } else if height < 30.0 {
            findings.push(ExtremeFinding::fatal(
                "height",
                format!("Height {height} cm is below the physiological minimum (30 cm); check units"),
            ));
        }
    }

    if let Some(age) = params.number("age") {
        if age > 120.0 {
            findings.push(ExtremeFinding::warning(
                "age",
                format!("Age {age} years exceeds documented human lifespan; please confirm"),
            ));
        } else if age < 0.0 {
            findings.push(ExtremeFinding::fatal(
                "age",
                format!("Age {age} years cannot be negative"),
            ));
        }
    }

    if let Some(creatinine) = params.number("creatinine") {
        if creatinine > 15.0 {
            findings.push(ExtremeFinding::warning(
                "creatinine",
                format!(
                    "Creatinine {creatinine} mg/dL is extremely high; consider acute kidney injury \
                     or a unit error (µmol/L vs mg/dL)"
                ),
            ));
        } else if creatinine < 0.1 {
            findings.push(ExtremeFinding::warning(
                "creatinine",
                format!("Creatinine {creatinine} mg/dL is unusually low; please confirm"),
            ));
        }
    }

    findings
}
