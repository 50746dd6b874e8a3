//! Typed parameter records and shared input checks.
//!
//! Every formula deserializes the loose parameter bag into its own record
//! before touching a number. Required measurements that are missing fail
//! here with the field's name; optional risk-factor flags default to
//! `false`.

use serde::{de::DeserializeOwned, Deserialize};

use medcalc_contracts::{
    calculator::CalculatorKind,
    error::{CalcError, CalcResult},
    params::Parameters,
    range::Quantity,
    result::SafetyWarning,
};
use medcalc_safety::range;

/// Deserialize `params` into the record `T` for calculator `kind`.
pub fn parse<T: DeserializeOwned>(kind: CalculatorKind, params: &Parameters) -> CalcResult<T> {
    serde_json::from_value(params.to_json())
        .map_err(|e| CalcError::invalid_parameters(format!("{kind}: {e}")))
}

/// Biological sex, where a formula's coefficients depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn is_female(&self) -> bool {
        *self == Sex::Female
    }
}

/// Unit a height parameter was supplied in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    M,
}

impl HeightUnit {
    pub fn to_cm(self, height: f64) -> f64 {
        match self {
            HeightUnit::Cm => height,
            HeightUnit::M => height * 100.0,
        }
    }
}

pub(crate) fn default_true() -> bool {
    true
}

/// Run the range validator over each `(value, quantity)` pair.
///
/// The first hard violation aborts; soft violations are collected.
pub fn range_warnings(checks: &[(f64, Quantity)]) -> CalcResult<Vec<SafetyWarning>> {
    let mut warnings = Vec::new();
    for (value, quantity) in checks {
        if let Some(warning) = range::check(*value, *quantity)? {
            warnings.push(warning);
        }
    }
    Ok(warnings)
}

/// Fail with a domain error unless `value` is strictly positive.
pub fn require_positive(value: f64, label: &str) -> CalcResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CalcError::domain(format!("{label} must be greater than 0 (got {value})")))
    }
}

/// Fail with a domain error unless `age` is adult (≥ 18).
pub fn require_adult(age: f64, formula: &str) -> CalcResult<()> {
    if age < 18.0 {
        Err(CalcError::domain(format!(
            "{formula} is validated only for adults (age ≥ 18); got age {age}"
        )))
    } else {
        Ok(())
    }
}

/// Check that `value` is a whole number within `min..=max`.
pub fn require_score(value: f64, label: &str, min: u32, max: u32) -> CalcResult<u32> {
    if value.fract() != 0.0 || value < f64::from(min) || value > f64::from(max) {
        return Err(CalcError::validation(format!(
            "{label} must be a whole number from {min} to {max} (got {value})"
        )));
    }
    Ok(value as u32)
}

/// Round to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Probe {
        weight: f64,
        #[serde(default)]
        height_unit: HeightUnit,
        #[serde(default)]
        diabetes: bool,
    }

    #[test]
    fn parse_reports_missing_required_field_by_name() {
        let params = Parameters::from_json(json!({ "diabetes": true })).unwrap();
        match parse::<Probe>(CalculatorKind::Bmi, &params) {
            Err(CalcError::InvalidParameters { reason }) => {
                assert!(reason.contains("weight"), "{reason}");
                assert!(reason.starts_with("bmi:"), "{reason}");
            }
            other => panic!("expected InvalidParameters, got {:?}", other),
        }
    }

    #[test]
    fn parse_defaults_optional_fields_and_ignores_unknown_keys() {
        let params = Parameters::from_json(json!({ "weight": 70, "colour": "blue" })).unwrap();
        let probe: Probe = parse(CalculatorKind::Bmi, &params).unwrap();
        assert_eq!(probe.weight, 70.0);
        assert_eq!(probe.height_unit, HeightUnit::Cm);
        assert!(!probe.diabetes);
    }

    #[test]
    fn parse_rejects_wrong_types() {
        let params = Parameters::from_json(json!({ "weight": "seventy" })).unwrap();
        assert!(matches!(
            parse::<Probe>(CalculatorKind::Bmi, &params),
            Err(CalcError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn require_score_accepts_only_whole_numbers_in_range() {
        assert_eq!(require_score(4.0, "Eye", 1, 4).unwrap(), 4);
        assert!(require_score(4.5, "Eye", 1, 4).is_err());
        assert!(require_score(0.0, "Eye", 1, 4).is_err());
        assert!(require_score(5.0, "Eye", 1, 4).is_err());
    }

    #[test]
    fn round_to_two_places() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(519.615, 0), 520.0);
    }

    #[test]
    fn require_adult_is_a_domain_error() {
        assert!(matches!(require_adult(17.9, "MDRD"), Err(CalcError::Domain { .. })));
        assert!(require_adult(18.0, "MDRD").is_ok());
    }
}
