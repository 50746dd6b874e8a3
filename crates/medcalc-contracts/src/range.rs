//! Physiological quantities and their acceptable ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A physiological quantity governed by a static range table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Quantity {
    Weight,
    Height,
    Age,
    Creatinine,
    HeartRate,
    SystolicBp,
    DiastolicBp,
}

impl Quantity {
    /// Human-readable name used in validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Quantity::Weight => "Weight",
            Quantity::Height => "Height",
            Quantity::Age => "Age",
            Quantity::Creatinine => "Creatinine",
            Quantity::HeartRate => "Heart rate",
            Quantity::SystolicBp => "Systolic blood pressure",
            Quantity::DiastolicBp => "Diastolic blood pressure",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hard and soft bounds for one quantity.
///
/// Invariant: `min <= warn_min <= warn_max <= max` when the soft bounds are
/// present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
    pub warn_min: Option<f64>,
    pub warn_max: Option<f64>,
}

impl ParameterRange {
    /// True if the soft bounds (when present) nest inside the hard bounds.
    pub fn is_well_formed(&self) -> bool {
        let lo = self.warn_min.unwrap_or(self.min);
        let hi = self.warn_max.unwrap_or(self.max);
        self.min <= lo && lo <= hi && hi <= self.max
    }
}
