//! Pediatric age classification and weight plausibility.

use medcalc_contracts::{
    age::AgeBand,
    error::{CalcError, CalcResult},
};

/// Days per year used when converting ages for the two youngest bands.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Upper bound of the neonate band, in days.
pub const NEONATE_MAX_DAYS: f64 = 28.0;

/// Map an age in years to its life-stage band.
///
/// Neonate and infant boundaries are evaluated in days; the rest in years.
/// A negative or non-finite age is an error, not a band.
pub fn classify(age_years: f64) -> CalcResult<AgeBand> {
    if !age_years.is_finite() || age_years < 0.0 {
        return Err(CalcError::validation(format!(
            "Age {age_years} years is not a valid age"
        )));
    }

    let age_days = age_years * DAYS_PER_YEAR;
    let band = if age_days <= NEONATE_MAX_DAYS {
        AgeBand::Neonate
    } else if age_days <= DAYS_PER_YEAR {
        AgeBand::Infant
    } else if age_years < 13.0 {
        AgeBand::Child
    } else if age_years < 18.0 {
        AgeBand::Adolescent
    } else {
        AgeBand::Adult
    };
    Ok(band)
}

/// Plausible weight window (kg) for a band. Adolescents and adults have none.
pub fn weight_window(band: AgeBand) -> Option<(f64, f64)> {
    match band {
        AgeBand::Neonate => Some((0.5, 5.0)),
        AgeBand::Infant => Some((2.0, 15.0)),
        AgeBand::Child => Some((8.0, 50.0)),
        AgeBand::Adolescent | AgeBand::Adult => None,
    }
}

/// Outcome of a pediatric dosing plausibility check.
#[derive(Debug, Clone, PartialEq)]
pub struct DosingCheck {
    pub valid: bool,
    pub band: Option<AgeBand>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Classify `age_years` and check `weight_kg` against the band's window.
///
/// An implausible weight is a warning. Negative age or weight is an error.
pub fn validate_dosing(age_years: f64, weight_kg: f64) -> DosingCheck {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    if weight_kg < 0.0 {
        errors.push(format!("Weight {weight_kg} kg cannot be negative"));
    }

    let band = match classify(age_years) {
        Ok(band) => Some(band),
        Err(e) => {
            errors.push(match e {
                CalcError::Validation { reason } => reason,
                other => other.to_string(),
            });
            None
        }
    };

    if let (Some(band), true) = (band, errors.is_empty()) {
        if let Some((lo, hi)) = weight_window(band) {
            if weight_kg < lo || weight_kg > hi {
                warnings.push(format!(
                    "Weight {weight_kg} kg is unusual for a {band} ({}); expected {lo}-{hi} kg. \
                     Verify weight before dosing.",
                    band.age_range()
                ));
            }
        }
    }

    DosingCheck {
        valid: errors.is_empty(),
        band,
        warnings,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_day_based_boundaries() {
        // ≈18 days
        assert_eq!(classify(0.05).unwrap(), AgeBand::Neonate);
        // ≈33 days
        assert_eq!(classify(0.09).unwrap(), AgeBand::Infant);
        assert_eq!(classify(0.0).unwrap(), AgeBand::Neonate);
        assert_eq!(classify(1.0).unwrap(), AgeBand::Infant);
    }

    #[test]
    fn classify_year_based_boundaries() {
        assert_eq!(classify(1.01).unwrap(), AgeBand::Child);
        assert_eq!(classify(12.99).unwrap(), AgeBand::Child);
        assert_eq!(classify(13.0).unwrap(), AgeBand::Adolescent);
        assert_eq!(classify(17.99).unwrap(), AgeBand::Adolescent);
        assert_eq!(classify(18.0).unwrap(), AgeBand::Adult);
    }

    #[test]
    fn classify_rejects_negative_age() {
        assert!(matches!(classify(-0.1), Err(CalcError::Validation { .. })));
    }

    #[test]
    fn bands_partition_the_age_axis_without_gaps() {
        let mut previous = classify(0.0).unwrap();
        let mut age = 0.0;
        while age < 25.0 {
            let band = classify(age).unwrap();
            assert!(band >= previous, "band went backwards at age {age}");
            previous = band;
            age += 0.001;
        }
        assert_eq!(previous, AgeBand::Adult);
    }

    #[test]
    fn implausible_weight_for_band_is_a_warning() {
        let check = validate_dosing(0.05, 9.0);
        assert!(check.valid);
        assert_eq!(check.band, Some(AgeBand::Neonate));
        assert_eq!(check.warnings.len(), 1);
        assert!(check.warnings[0].contains("neonate"));

        let check = validate_dosing(6.0, 20.0);
        assert!(check.valid);
        assert!(check.warnings.is_empty());
    }

    #[test]
    fn adolescents_have_no_weight_window() {
        let check = validate_dosing(15.0, 120.0);
        assert!(check.valid);
        assert!(check.warnings.is_empty());
    }

    #[test]
    fn negative_inputs_are_errors() {
        let check = validate_dosing(-1.0, 10.0);
        assert!(!check.valid);
        assert_eq!(check.band, None);

        let check = validate_dosing(4.0, -2.0);
        assert!(!check.valid);
        assert!(check.errors[0].contains("cannot be negative"));
        assert!(check.warnings.is_empty());
    }
}
