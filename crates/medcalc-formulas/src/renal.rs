//! Kidney function estimates: Cockcroft-Gault, MDRD and CKD-EPI.
//!
//! All three are adult-only; an age under 18 is a domain error.

use serde::Deserialize;

use medcalc_contracts::{
    calculator::CalculatorKind,
    error::CalcResult,
    params::Parameters,
    range::Quantity,
    result::CalculatorResult,
};

use crate::catalog::{CalculatorSpec, ParamSpec};
use crate::input::{self, default_true, Sex};

const SEXES: &[&str] = &["male", "female"];

/// KDIGO GFR category for a clearance or eGFR value.
pub fn ckd_stage(gfr: f64) -> &'static str {
    if gfr >= 90.0 {
        "G1: normal or high kidney function"
    } else if gfr >= 60.0 {
        "G2: mildly decreased kidney function"
    } else if gfr >= 45.0 {
        "G3a: mildly to moderately decreased kidney function"
    } else if gfr >= 30.0 {
        "G3b: moderately to severely decreased kidney function"
    } else if gfr >= 15.0 {
        "G4: severely decreased kidney function"
    } else {
        "G5: kidney failure"
    }
}

fn with_dose_note(result: CalculatorResult, gfr: f64) -> CalculatorResult {
    if gfr < 60.0 {
        result.with_note("Below 60: review doses of renally cleared drugs")
    } else {
        result
    }
}

// ── Cockcroft-Gault ───────────────────────────────────────────────────────────

pub static CREATININE_CLEARANCE_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::CreatinineClearance,
    name: "Creatinine Clearance (Cockcroft-Gault)",
    description: "Estimated creatinine clearance for adult drug dosing",
    params: &[
        ParamSpec::number("age", "Age in years (18 or older)"),
        ParamSpec::number("weight", "Body weight in kg"),
        ParamSpec::number("creatinine", "Serum creatinine in mg/dL"),
        ParamSpec::choice("sex", SEXES, "Biological sex"),
    ],
};

#[derive(Debug, Deserialize)]
struct ClearanceInput {
    age: f64,
    weight: f64,
    creatinine: f64,
    sex: Sex,
}

pub fn creatinine_clearance(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: ClearanceInput = input::parse(CalculatorKind::CreatinineClearance, params)?;
    input::require_adult(input.age, "Cockcroft-Gault")?;
    let warnings = input::range_warnings(&[
        (input.age, Quantity::Age),
        (input.weight, Quantity::Weight),
        (input.creatinine, Quantity::Creatinine),
    ])?;

    let sex_factor = if input.sex.is_female() { 0.85 } else { 1.0 };
    let clearance = ((140.0 - input.age) * input.weight * sex_factor) / (72.0 * input.creatinine);

    let result = CalculatorResult::new(
        clearance,
        format!(
            "CrCl = ((140 − {}) × {} kg × {}) / (72 × {} mg/dL) = {:.1}",
            input.age, input.weight, sex_factor, input.creatinine, clearance
        ),
        "Cockcroft DW, Gault MH. Prediction of creatinine clearance from serum creatinine. Nephron. 1976;16(1):31-41.",
    )
    .with_unit("mL/min")
    .with_interpretation(ckd_stage(clearance))
    .with_note("Uses actual body weight; consider ideal or adjusted weight in obesity")
    .with_warnings(warnings);

    Ok(with_dose_note(result, clearance))
}

// ── MDRD ──────────────────────────────────────────────────────────────────────

pub static MDRD_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::Mdrd,
    name: "eGFR (MDRD)",
    description: "Four-variable MDRD study equation",
    params: &[
        ParamSpec::number("creatinine", "Serum creatinine in mg/dL"),
        ParamSpec::number("age", "Age in years (18 or older)"),
        ParamSpec::choice("sex", SEXES, "Biological sex"),
        ParamSpec::flag("black", "Apply the legacy race coefficient"),
    ],
};

#[derive(Debug, Deserialize)]
struct MdrdInput {
    creatinine: f64,
    age: f64,
    sex: Sex,
    #[serde(default)]
    black: bool,
}

pub fn mdrd(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: MdrdInput = input::parse(CalculatorKind::Mdrd, params)?;
    input::require_adult(input.age, "MDRD")?;
    let warnings = input::range_warnings(&[
        (input.creatinine, Quantity::Creatinine),
        (input.age, Quantity::Age),
    ])?;

    let mut egfr = 175.0 * input.creatinine.powf(-1.154) * input.age.powf(-0.203);
    if input.sex.is_female() {
        egfr *= 0.742;
    }
    if input.black {
        egfr *= 1.212;
    }

    let result = CalculatorResult::new(
        egfr,
        format!(
            "eGFR = 175 × {}^−1.154 × {}^−0.203{}{} = {:.1}",
            input.creatinine,
            input.age,
            if input.sex.is_female() { " × 0.742" } else { "" },
            if input.black { " × 1.212" } else { "" },
            egfr
        ),
        "Levey AS, et al. Using standardized serum creatinine values in the MDRD study equation. Ann Intern Med. 2006;145(4):247-254.",
    )
    .with_unit("mL/min/1.73m²")
    .with_interpretation(ckd_stage(egfr))
    .with_note("MDRD underestimates GFR above 60; CKD-EPI is preferred in that range")
    .with_warnings(warnings);

    Ok(with_dose_note(result, egfr))
}

// ── CKD-EPI ───────────────────────────────────────────────────────────────────

pub static CKD_EPI_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::CkdEpi,
    name: "eGFR (CKD-EPI)",
    description: "CKD-EPI creatinine equation, race-neutral by default",
    params: &[
        ParamSpec::number("creatinine", "Serum creatinine in mg/dL"),
        ParamSpec::number("age", "Age in years (18 or older)"),
        ParamSpec::choice("sex", SEXES, "Biological sex"),
        ParamSpec::flag("raceNeutral", "Omit the race coefficient (default true)"),
        ParamSpec::flag("black", "Apply the legacy race coefficient when raceNeutral is false"),
    ],
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CkdEpiInput {
    creatinine: f64,
    age: f64,
    sex: Sex,
    #[serde(default = "default_true")]
    race_neutral: bool,
    #[serde(default)]
    black: bool,
}

pub fn ckd_epi(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: CkdEpiInput = input::parse(CalculatorKind::CkdEpi, params)?;
    input::require_adult(input.age, "CKD-EPI")?;
    let warnings = input::range_warnings(&[
        (input.creatinine, Quantity::Creatinine),
        (input.age, Quantity::Age),
    ])?;

    let female = input.sex.is_female();
    let (kappa, alpha) = if female { (0.7, -0.329) } else { (0.9, -0.411) };
    let ratio = input.creatinine / kappa;

    let mut egfr = 141.0 * ratio.min(1.0).powf(alpha) * ratio.max(1.0).powf(-1.209) * 0.993f64.powf(input.age);
    if female {
        egfr *= 1.018;
    }
    let race_applied = !input.race_neutral && input.black;
    if race_applied {
        egfr *= 1.159;
    }

    let mut result = CalculatorResult::new(
        egfr,
        format!(
            "eGFR = 141 × min(Scr/{kappa}, 1)^{alpha} × max(Scr/{kappa}, 1)^−1.209 × 0.993^{}{}{} = {:.1}",
            input.age,
            if female { " × 1.018" } else { "" },
            if race_applied { " × 1.159" } else { "" },
            egfr
        ),
        "Levey AS, et al. A new equation to estimate glomerular filtration rate. Ann Intern Med. 2009;150(9):604-612.",
    )
    .with_unit("mL/min/1.73m²")
    .with_interpretation(ckd_stage(egfr))
    .with_warnings(warnings);

    result = if input.race_neutral {
        result.with_note("Race-neutral: no race coefficient applied")
    } else {
        result.with_note("Legacy race coefficient mode; race-neutral reporting is recommended")
    };

    Ok(with_dose_note(result, egfr))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use medcalc_contracts::error::CalcError;

    use super::*;
    use crate::test_support::{assert_close, params};

    #[test]
    fn cockcroft_gault_male_and_female() {
        let male = creatinine_clearance(&params(json!({
            "age": 60, "weight": 72, "creatinine": 1.0, "sex": "male"
        })))
        .unwrap();
        assert_close(male.value(), 80.0);
        assert_eq!(male.unit(), Some("mL/min"));
        assert!(male.interpretation().unwrap().starts_with("G2"));

        let female = creatinine_clearance(&params(json!({
            "age": 60, "weight": 72, "creatinine": 1.0, "sex": "female"
        })))
        .unwrap();
        assert_close(female.value(), 68.0);
    }

    #[test]
    fn adult_only_formulas_reject_minors() {
        let minor = json!({ "age": 17, "weight": 60, "creatinine": 1.0, "sex": "male" });
        for f in [creatinine_clearance, mdrd, ckd_epi] {
            match f(&params(minor.clone())) {
                Err(CalcError::Domain { reason }) => assert!(reason.contains("18"), "{reason}"),
                other => panic!("expected Domain, got {:?}", other),
            }
        }
    }

    #[test]
    fn adult_only_formulas_compute_from_18() {
        let adult = json!({ "age": 18, "weight": 60, "creatinine": 1.0, "sex": "male" });
        for f in [creatinine_clearance, mdrd, ckd_epi] {
            assert!(f(&params(adult.clone())).unwrap().value() > 0.0);
        }
    }

    #[test]
    fn mdrd_coefficients() {
        let base = mdrd(&params(json!({ "creatinine": 1.0, "age": 50, "sex": "male" }))).unwrap();
        assert_close(base.value(), 175.0 * 50f64.powf(-0.203));

        let adjusted = mdrd(&params(json!({
            "creatinine": 1.0, "age": 50, "sex": "female", "black": true
        })))
        .unwrap();
        assert_close(adjusted.value(), base.value() * 0.742 * 1.212);
    }

    #[test]
    fn ckd_epi_piecewise_terms() {
        // Creatinine at κ: both piecewise terms are 1.
        let at_kappa = ckd_epi(&params(json!({ "creatinine": 0.9, "age": 40, "sex": "male" }))).unwrap();
        assert_close(at_kappa.value(), 141.0 * 0.993f64.powf(40.0));

        let high = ckd_epi(&params(json!({ "creatinine": 1.8, "age": 40, "sex": "male" }))).unwrap();
        assert_close(high.value(), 141.0 * 2f64.powf(-1.209) * 0.993f64.powf(40.0));

        let low_female = ckd_epi(&params(json!({ "creatinine": 0.35, "age": 40, "sex": "female" }))).unwrap();
        assert_close(low_female.value(), 141.0 * 0.5f64.powf(-0.329) * 0.993f64.powf(40.0) * 1.018);
    }

    #[test]
    fn ckd_epi_race_coefficient_only_when_not_race_neutral() {
        let neutral = ckd_epi(&params(json!({
            "creatinine": 1.0, "age": 50, "sex": "male", "black": true
        })))
        .unwrap();
        let legacy = ckd_epi(&params(json!({
            "creatinine": 1.0, "age": 50, "sex": "male", "black": true, "raceNeutral": false
        })))
        .unwrap();
        assert_close(legacy.value(), neutral.value() * 1.159);
    }

    #[test]
    fn ckd_stage_thresholds() {
        assert!(ckd_stage(90.0).starts_with("G1"));
        assert!(ckd_stage(89.9).starts_with("G2"));
        assert!(ckd_stage(45.0).starts_with("G3a"));
        assert!(ckd_stage(30.0).starts_with("G3b"));
        assert!(ckd_stage(15.0).starts_with("G4"));
        assert!(ckd_stage(14.9).starts_with("G5"));
    }
}
