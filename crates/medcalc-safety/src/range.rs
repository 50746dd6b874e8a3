//! Range validator for governed physiological quantities.
//!
//! A value outside the hard bounds is invalid and must abort the
//! invocation. A value inside the hard bounds but outside the typical
//! (soft) bounds is valid and carries a warning.

use medcalc_contracts::{
    error::{CalcError, CalcResult},
    range::{ParameterRange, Quantity},
    result::SafetyWarning,
};

/// The static range table entry for `quantity`.
pub fn range_for(quantity: Quantity) -> ParameterRange {
    let (min, max, unit, warn_min, warn_max) = match quantity {
        Quantity::Weight => (0.5, 500.0, "kg", 2.0, 200.0),
        Quantity::Height => (30.0, 250.0, "cm", 45.0, 220.0),
        Quantity::Age => (0.0, 120.0, "years", 0.0, 100.0),
        Quantity::Creatinine => (0.1, 20.0, "mg/dL", 0.5, 10.0),
        Quantity::HeartRate => (20.0, 300.0, "bpm", 40.0, 180.0),
        Quantity::SystolicBp => (50.0, 300.0, "mmHg", 70.0, 200.0),
        Quantity::DiastolicBp => (30.0, 200.0, "mmHg", 40.0, 120.0),
    };
    ParameterRange {
        min,
        max,
        unit,
        warn_min: Some(warn_min),
        warn_max: Some(warn_max),
    }
}

/// Outcome of a single range check.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCheck {
    pub valid: bool,
    pub warning: Option<String>,
    pub error: Option<String>,
}

/// Check `value` against the range table entry for `quantity`.
///
/// Pure; the caller decides what to do with the outcome. Non-finite values
/// are always invalid.
pub fn validate(value: f64, quantity: Quantity) -> RangeCheck {
    let range = range_for(quantity);

    if !value.is_finite() || value < range.min || value > range.max {
        return RangeCheck {
            valid: false,
            warning: None,
            error: Some(format!(
                "{} value {} {} is outside the acceptable range ({}-{} {})",
                quantity.label(),
                value,
                range.unit,
                range.min,
                range.max,
                range.unit
            )),
        };
    }

    if let (Some(warn_min), Some(warn_max)) = (range.warn_min, range.warn_max) {
        if value < warn_min || value > warn_max {
            return RangeCheck {
                valid: true,
                warning: Some(format!(
                    "{} value {} {} is outside the typical range ({}-{} {}). Please verify.",
                    quantity.label(),
                    value,
                    range.unit,
                    warn_min,
                    warn_max,
                    range.unit
                )),
                error: None,
            };
        }
    }

    RangeCheck {
        valid: true,
        warning: None,
        error: None,
    }
}

/// Validate and convert the outcome into the pipeline's terms: a hard
/// violation becomes `CalcError::Validation`, a soft one a warning.
pub fn check(value: f64, quantity: Quantity) -> CalcResult<Option<SafetyWarning>> {
    let outcome = validate(value, quantity);
    if let Some(error) = outcome.error {
        return Err(CalcError::validation(error));
    }
    Ok(outcome.warning.map(SafetyWarning::warning))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Quantity; 7] = [
        Quantity::Weight,
        Quantity::Height,
        Quantity::Age,
        Quantity::Creatinine,
        Quantity::HeartRate,
        Quantity::SystolicBp,
        Quantity::DiastolicBp,
    ];

    #[test]
    fn every_range_table_entry_is_well_formed() {
        for quantity in ALL {
            assert!(range_for(quantity).is_well_formed(), "{quantity} range is malformed");
        }
    }

    #[test]
    fn value_inside_typical_range_is_silent() {
        let outcome = validate(70.0, Quantity::Weight);
        assert!(outcome.valid);
        assert!(outcome.warning.is_none());
        assert!(outcome.error.is_none());
    }

    #[test]
    fn value_outside_typical_range_warns() {
        let outcome = validate(250.0, Quantity::Weight);
        assert!(outcome.valid);
        let warning = outcome.warning.expect("expected a soft warning");
        assert!(warning.contains("Weight value 250 kg"), "{warning}");
        assert!(warning.contains("typical range (2-200 kg)"), "{warning}");
    }

    #[test]
    fn value_outside_hard_range_is_invalid() {
        let outcome = validate(600.0, Quantity::Weight);
        assert!(!outcome.valid);
        let error = outcome.error.expect("expected an error");
        assert!(error.contains("600 kg"), "{error}");
        assert!(error.contains("acceptable range (0.5-500 kg)"), "{error}");
    }

    #[test]
    fn hard_bounds_are_inclusive() {
        assert!(validate(0.5, Quantity::Weight).valid);
        assert!(validate(500.0, Quantity::Weight).valid);
        assert!(!validate(20.01, Quantity::Creatinine).valid);
    }

    #[test]
    fn non_finite_values_are_invalid() {
        assert!(!validate(f64::NAN, Quantity::HeartRate).valid);
        assert!(!validate(f64::INFINITY, Quantity::Height).valid);
    }

    #[test]
    fn check_maps_outcomes_to_pipeline_terms() {
        assert_eq!(check(120.0, Quantity::SystolicBp).unwrap(), None);
        assert!(check(210.0, Quantity::SystolicBp).unwrap().is_some());
        match check(10.0, Quantity::DiastolicBp) {
            Err(CalcError::Validation { reason }) => {
                assert!(reason.contains("Diastolic blood pressure"), "{reason}")
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }
}
