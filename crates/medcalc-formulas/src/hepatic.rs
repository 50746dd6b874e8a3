//! Liver disease severity: Child-Pugh and MELD.

use serde::Deserialize;

use medcalc_contracts::{
    calculator::CalculatorKind,
    error::CalcResult,
    params::Parameters,
    range::Quantity,
    result::CalculatorResult,
};

use crate::catalog::{CalculatorSpec, ParamSpec};
use crate::input;

const ASCITES: &[&str] = &["none", "mild", "moderate"];
const ENCEPHALOPATHY: &[&str] = &["none", "grade1-2", "grade3-4"];

/// MELD is reported on a 6-40 scale.
pub const MELD_CAP: f64 = 40.0;

/// Creatinine substituted for patients on dialysis.
const DIALYSIS_CREATININE: f64 = 4.0;

// ── Child-Pugh ────────────────────────────────────────────────────────────────

pub static CHILD_PUGH_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::ChildPugh,
    name: "Child-Pugh Score",
    description: "Severity of chronic liver disease",
    params: &[
        ParamSpec::number("bilirubin", "Total bilirubin in mg/dL"),
        ParamSpec::number("albumin", "Serum albumin in g/dL"),
        ParamSpec::number("inr", "International normalized ratio"),
        ParamSpec::choice("ascites", ASCITES, "Ascites"),
        ParamSpec::choice("encephalopathy", ENCEPHALOPATHY, "Hepatic encephalopathy"),
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Ascites {
    None,
    Mild,
    Moderate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
enum Encephalopathy {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "grade1-2")]
    Grade1To2,
    #[serde(rename = "grade3-4")]
    Grade3To4,
}

#[derive(Debug, Deserialize)]
struct LiverPanel {
    bilirubin: f64,
    albumin: f64,
    inr: f64,
    ascites: Ascites,
    encephalopathy: Encephalopathy,
}

pub fn child_pugh(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: LiverPanel = input::parse(CalculatorKind::ChildPugh, params)?;
    input::require_positive(input.albumin, "Albumin")?;
    input::require_positive(input.inr, "INR")?;

    let bilirubin = match input.bilirubin {
        b if b < 2.0 => 1,
        b if b <= 3.0 => 2,
        _ => 3,
    };
    let albumin = match input.albumin {
        a if a > 3.5 => 1,
        a if a >= 2.8 => 2,
        _ => 3,
    };
    let inr = match input.inr {
        i if i < 1.7 => 1,
        i if i <= 2.3 => 2,
        _ => 3,
    };
    let ascites = match input.ascites {
        Ascites::None => 1,
        Ascites::Mild => 2,
        Ascites::Moderate => 3,
    };
    let encephalopathy = match input.encephalopathy {
        Encephalopathy::None => 1,
        Encephalopathy::Grade1To2 => 2,
        Encephalopathy::Grade3To4 => 3,
    };
    let total: u32 = bilirubin + albumin + inr + ascites + encephalopathy;

    let (class, survival) = match total {
        5..=6 => ("Class A: well-compensated disease", "100%"),
        7..=9 => ("Class B: significant functional compromise", "80%"),
        _ => ("Class C: decompensated disease", "45%"),
    };

    Ok(CalculatorResult::new(
        f64::from(total),
        format!(
            "Bilirubin({bilirubin}) + Albumin({albumin}) + INR({inr}) + Ascites({ascites}) + Encephalopathy({encephalopathy}) = {total}"
        ),
        "Pugh RN, et al. Transection of the oesophagus for bleeding oesophageal varices. Br J Surg. 1973;60(8):646-649.",
    )
    .with_unit("points")
    .with_interpretation(class)
    .with_note(format!("Approximate 1-year survival: {survival}")))
}

// ── MELD ──────────────────────────────────────────────────────────────────────

pub static MELD_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::Meld,
    name: "MELD Score",
    description: "Model for End-Stage Liver Disease",
    params: &[
        ParamSpec::number("bilirubin", "Total bilirubin in mg/dL"),
        ParamSpec::number("inr", "International normalized ratio"),
        ParamSpec::number("creatinine", "Serum creatinine in mg/dL"),
        ParamSpec::flag("dialysis", "Dialysis at least twice in the past week"),
    ],
};

#[derive(Debug, Deserialize)]
struct MeldInput {
    bilirubin: f64,
    inr: f64,
    creatinine: f64,
    #[serde(default)]
    dialysis: bool,
}

pub fn meld(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: MeldInput = input::parse(CalculatorKind::Meld, params)?;
    input::require_positive(input.bilirubin, "Bilirubin")?;
    input::require_positive(input.inr, "INR")?;
    let warnings = input::range_warnings(&[(input.creatinine, Quantity::Creatinine)])?;

    let bilirubin = input.bilirubin.max(1.0);
    let inr = input.inr.max(1.0);
    let creatinine = if input.dialysis {
        DIALYSIS_CREATININE
    } else {
        input.creatinine.max(1.0)
    };

    let raw = 3.78 * bilirubin.ln() + 11.2 * inr.ln() + 9.57 * creatinine.ln() + 6.43;
    let score = raw.round().min(MELD_CAP);

    let (interpretation, mortality) = match score as u32 {
        0..=9 => ("Low severity", "1.9%"),
        10..=19 => ("Moderate severity", "6.0%"),
        20..=29 => ("High severity", "19.6%"),
        30..=39 => ("Very high severity", "52.6%"),
        _ => ("Extremely high severity", "71.3%"),
    };

    let mut result = CalculatorResult::new(
        score,
        format!(
            "MELD = 3.78 × ln({bilirubin}) + 11.2 × ln({inr}) + 9.57 × ln({creatinine}) + 6.43 = {raw:.1}"
        ),
        "Kamath PS, et al. A model to predict survival in patients with end-stage liver disease. Hepatology. 2001;33(2):464-470.",
    )
    .with_unit("points")
    .with_interpretation(interpretation)
    .with_note(format!("Estimated 3-month mortality: {mortality}"))
    .with_warnings(warnings);

    if input.dialysis {
        result = result.with_note("Dialysis: creatinine set to 4.0 mg/dL");
    }
    if raw.round() > MELD_CAP {
        result = result.with_note("Score capped at 40");
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::params;

    #[test]
    fn child_pugh_classes() {
        let a = child_pugh(&params(json!({
            "bilirubin": 1.0, "albumin": 4.0, "inr": 1.0, "ascites": "none", "encephalopathy": "none"
        })))
        .unwrap();
        assert_eq!(a.value(), 5.0);
        assert!(a.interpretation().unwrap().starts_with("Class A"));
        assert!(a.notes()[0].contains("100%"));

        let b = child_pugh(&params(json!({
            "bilirubin": 2.5, "albumin": 3.0, "inr": 1.8, "ascites": "mild", "encephalopathy": "none"
        })))
        .unwrap();
        assert_eq!(b.value(), 9.0);
        assert!(b.interpretation().unwrap().starts_with("Class B"));

        let c = child_pugh(&params(json!({
            "bilirubin": 4.0, "albumin": 2.5, "inr": 2.5, "ascites": "moderate", "encephalopathy": "grade3-4"
        })))
        .unwrap();
        assert_eq!(c.value(), 15.0);
        assert!(c.interpretation().unwrap().starts_with("Class C"));
    }

    #[test]
    fn child_pugh_rejects_unknown_tri_state() {
        assert!(matches!(
            child_pugh(&params(json!({
                "bilirubin": 1.0, "albumin": 4.0, "inr": 1.0, "ascites": "severe", "encephalopathy": "none"
            }))),
            Err(medcalc_contracts::error::CalcError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn meld_floors_inputs_at_one() {
        let result = meld(&params(json!({ "bilirubin": 0.5, "inr": 0.9, "creatinine": 0.8 }))).unwrap();
        assert_eq!(result.value(), 6.0);
    }

    #[test]
    fn meld_is_an_integer() {
        let result = meld(&params(json!({ "bilirubin": 2.3, "inr": 1.4, "creatinine": 1.7 }))).unwrap();
        assert_eq!(result.value().fract(), 0.0);
        let raw = 3.78 * 2.3f64.ln() + 11.2 * 1.4f64.ln() + 9.57 * 1.7f64.ln() + 6.43;
        assert_eq!(result.value(), raw.round());
    }

    #[test]
    fn meld_caps_at_forty() {
        let result = meld(&params(json!({ "bilirubin": 30, "inr": 5, "creatinine": 4 }))).unwrap();
        assert_eq!(result.value(), 40.0);
        assert!(result.notes().iter().any(|n| n == "Score capped at 40"));
    }

    #[test]
    fn meld_rounding_to_forty_is_not_reported_as_capped() {
        // Raw score 40.2: rounds to 40 on its own.
        let bilirubin = ((40.2 - 6.43) / 3.78f64).exp();
        let result = meld(&params(json!({ "bilirubin": bilirubin, "inr": 1.0, "creatinine": 1.0 }))).unwrap();
        assert_eq!(result.value(), 40.0);
        assert!(
            !result.notes().iter().any(|n| n == "Score capped at 40"),
            "notes: {:?}",
            result.notes()
        );
    }

    #[test]
    fn meld_dialysis_forces_creatinine_term() {
        let on_dialysis = meld(&params(json!({
            "bilirubin": 1.0, "inr": 1.0, "creatinine": 1.0, "dialysis": true
        })))
        .unwrap();
        assert_eq!(on_dialysis.value(), (9.57 * 4f64.ln() + 6.43).round());
    }
}
