//! Calculator outputs and advisory warnings.
//!
//! A `CalculatorResult` is produced once per successful invocation. Its
//! numeric fields are fixed when the formula returns; the orchestrator may
//! only append to `warnings`.

use serde::{Deserialize, Serialize};

/// How loud an advisory warning is.
///
/// No level aborts an invocation. Aborts are `CalcError`s and never appear
/// here. `CriticalAdvisory` is the loudest label a still-returned result can
/// carry (e.g. a computed dose above a known ceiling); it is serialized as
/// `"error"` for callers that expect the three-level vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WarningLevel {
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "error")]
    CriticalAdvisory,
}

impl WarningLevel {
    /// Marker shown next to the message in rendered reports.
    pub fn icon(&self) -> &'static str {
        match self {
            WarningLevel::Info => "ℹ️",
            WarningLevel::Warning => "⚠️",
            WarningLevel::CriticalAdvisory => "🚨",
        }
    }
}

/// The clinical concern an advisory warning belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningCategory {
    Contraindication,
    Overdose,
    Pregnancy,
    Pediatric,
    Geriatric,
}

/// A non-blocking advisory attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyWarning {
    pub level: WarningLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<WarningCategory>,
}

impl SafetyWarning {
    pub fn new(level: WarningLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            category: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(WarningLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(WarningLevel::Warning, message)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(WarningLevel::CriticalAdvisory, message)
    }

    pub fn with_category(mut self, category: WarningCategory) -> Self {
        self.category = Some(category);
        self
    }
}

/// The output of one formula evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorResult {
    value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interpretation: Option<String>,
    formula: String,
    citation: String,
    #[serde(default)]
    notes: Vec<String>,
    #[serde(default)]
    warnings: Vec<SafetyWarning>,
}

impl CalculatorResult {
    /// Start a result with the mandatory fields.
    pub fn new(value: f64, formula: impl Into<String>, citation: impl Into<String>) -> Self {
        Self {
            value,
            unit: None,
            interpretation: None,
            formula: formula.into(),
            citation: citation.into(),
            notes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_interpretation(mut self, interpretation: impl Into<String>) -> Self {
        self.interpretation = Some(interpretation.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_warning(mut self, warning: SafetyWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = SafetyWarning>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Place `leading` ahead of the formula's own warnings and `trailing`
    /// after them. The only mutation the orchestrator performs on a result.
    pub fn merge_warnings(
        &mut self,
        leading: impl IntoIterator<Item = SafetyWarning>,
        trailing: impl IntoIterator<Item = SafetyWarning>,
    ) {
        let own = std::mem::take(&mut self.warnings);
        self.warnings = leading.into_iter().chain(own).chain(trailing).collect();
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn interpretation(&self) -> Option<&str> {
        self.interpretation.as_deref()
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn citation(&self) -> &str {
        &self.citation
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn warnings(&self) -> &[SafetyWarning] {
        &self.warnings
    }

    /// True if any attached warning carries the `CriticalAdvisory` label.
    pub fn has_critical_advisory(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.level == WarningLevel::CriticalAdvisory)
    }
}
