//! Pulmonary embolism and pneumonia severity: Wells and CURB-65.

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

const UREA_UNITS: &[&str] = &["mmol/L", "mg/dL"];

// ── Wells (PE) ────────────────────────────────────────────────────────────────

pub static WELLS_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::Wells,
    name: "Wells Score (PE)",
    description: "Pre-test probability of pulmonary embolism",
    params: &[
        ParamSpec::flag("clinicalSignsDvt", "Clinical signs and symptoms of DVT"),
        ParamSpec::flag("peMostLikely", "PE is the most likely diagnosis"),
        ParamSpec::number("heartRate", "Heart rate in bpm (counts when > 100)"),
        ParamSpec::flag("immobilizationOrSurgery", "Immobilization ≥ 3 days or surgery in the last 4 weeks"),
        ParamSpec::flag("previousDvtPe", "Previously diagnosed DVT or PE"),
        ParamSpec::flag("hemoptysis", "Hemoptysis"),
        ParamSpec::flag("malignancy", "Malignancy treated within 6 months or palliative"),
    ],
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WellsInput {
    #[serde(default)]
    clinical_signs_dvt: bool,
    #[serde(default)]
    pe_most_likely: bool,
    heart_rate: f64,
    #[serde(default)]
    immobilization_or_surgery: bool,
    #[serde(default)]
    previous_dvt_pe: bool,
    #[serde(default)]
    hemoptysis: bool,
    #[serde(default)]
    malignancy: bool,
}

pub fn wells(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: WellsInput = input::parse(CalculatorKind::Wells, params)?;
    let warnings = input::range_warnings(&[(input.heart_rate, Quantity::HeartRate)])?;

    let score: f64 = [
        (input.clinical_signs_dvt, 3.0),
        (input.pe_most_likely, 3.0),
        (input.heart_rate > 100.0, 1.5),
        (input.immobilization_or_surgery, 1.5),
        (input.previous_dvt_pe, 1.5),
        (input.hemoptysis, 1.0),
        (input.malignancy, 1.0),
    ]
    .into_iter()
    .filter(|(present, _)| *present)
    .map(|(_, points)| points)
    .sum();

    let interpretation = if score > 6.0 {
        "High probability of PE"
    } else if score > 4.0 {
        "Moderate probability of PE"
    } else {
        "Low probability of PE"
    };

    Ok(CalculatorResult::new(
        score,
        "DVT signs(3) + PE most likely(3) + HR > 100(1.5) + Immobilization/surgery(1.5) + Prior DVT/PE(1.5) + Hemoptysis(1) + Malignancy(1)",
        "Wells PS, et al. Derivation of a simple clinical model to categorize patients probability of pulmonary embolism. Thromb Haemost. 2000;83(3):416-420.",
    )
    .with_unit("points")
    .with_interpretation(interpretation)
    .with_note("Score ≤ 4 (PE unlikely): a negative D-dimer can exclude PE")
    .with_warnings(warnings))
}

// ── CURB-65 ───────────────────────────────────────────────────────────────────

pub static CURB65_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::Curb65,
    name: "CURB-65",
    description: "Community-acquired pneumonia severity",
    params: &[
        ParamSpec::flag("confusion", "New confusion"),
        ParamSpec::number("urea", "Blood urea in the unit given by ureaUnit"),
        ParamSpec::optional_choice("ureaUnit", UREA_UNITS, "Unit of urea (default mmol/L)"),
        ParamSpec::number("respiratoryRate", "Respiratory rate in breaths/min"),
        ParamSpec::number("systolicBP", "Systolic blood pressure in mmHg"),
        ParamSpec::number("diastolicBP", "Diastolic blood pressure in mmHg"),
        ParamSpec::number("age", "Age in years"),
    ],
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
enum UreaUnit {
    #[default]
    #[serde(rename = "mmol/L")]
    MmolPerL,
    #[serde(rename = "mg/dL")]
    MgPerDl,
}

impl UreaUnit {
    fn threshold(self) -> f64 {
        match self {
            UreaUnit::MmolPerL => 7.0,
            UreaUnit::MgPerDl => 19.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PneumoniaInput {
    #[serde(default)]
    confusion: bool,
    urea: f64,
    #[serde(default)]
    urea_unit: UreaUnit,
    respiratory_rate: f64,
    #[serde(rename = "systolicBP")]
    systolic_bp: f64,
    #[serde(rename = "diastolicBP")]
    diastolic_bp: f64,
    age: f64,
}

/// 30-day mortality (%) by score, 0 through 5.
const MORTALITY_BY_SCORE: [f64; 6] = [0.7, 2.1, 9.2, 14.5, 40.0, 57.0];

pub fn curb65(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: PneumoniaInput = input::parse(CalculatorKind::Curb65, params)?;
    let warnings = input::range_warnings(&[
        (input.systolic_bp, Quantity::SystolicBp),
        (input.diastolic_bp, Quantity::DiastolicBp),
        (input.age, Quantity::Age),
    ])?;

    let urea_threshold = input.urea_unit.threshold();
    let score: u32 = [
        input.confusion,
        input.urea > urea_threshold,
        input.respiratory_rate >= 30.0,
        input.systolic_bp < 90.0 || input.diastolic_bp <= 60.0,
        input.age >= 65.0,
    ]
    .into_iter()
    .map(u32::from)
    .sum();

    let interpretation = match score {
        0 | 1 => "Low severity: consider outpatient treatment",
        2 => "Moderate severity: consider short inpatient stay or closely supervised outpatient care",
        _ => "Severe pneumonia: hospitalize and assess for ICU admission",
    };

    Ok(CalculatorResult::new(
        f64::from(score),
        format!(
            "Confusion(1) + Urea > {urea_threshold}(1) + RR ≥ 30(1) + SBP < 90 or DBP ≤ 60(1) + Age ≥ 65(1)"
        ),
        "Lim WS, et al. Defining community acquired pneumonia severity on presentation to hospital. Thorax. 2003;58(5):377-382.",
    )
    .with_unit("points")
    .with_interpretation(interpretation)
    .with_note(format!("30-day mortality at score {score}: {}%", MORTALITY_BY_SCORE[score as usize]))
    .with_warnings(warnings))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::params;

    #[test]
    fn wells_weights_and_bands() {
        let high = wells(&params(json!({
            "clinicalSignsDvt": true, "peMostLikely": true, "heartRate": 110
        })))
        .unwrap();
        assert_eq!(high.value(), 7.5);
        assert_eq!(high.interpretation(), Some("High probability of PE"));

        let moderate = wells(&params(json!({
            "peMostLikely": true, "heartRate": 80, "hemoptysis": true, "malignancy": true
        })))
        .unwrap();
        assert_eq!(moderate.value(), 5.0);
        assert_eq!(moderate.interpretation(), Some("Moderate probability of PE"));

        let low = wells(&params(json!({ "heartRate": 101, "previousDvtPe": true, "hemoptysis": true }))).unwrap();
        assert_eq!(low.value(), 4.0);
        assert_eq!(low.interpretation(), Some("Low probability of PE"));
    }

    #[test]
    fn wells_boundary_at_six_is_moderate() {
        let result = wells(&params(json!({ "clinicalSignsDvt": true, "peMostLikely": true, "heartRate": 70 }))).unwrap();
        assert_eq!(result.value(), 6.0);
        assert_eq!(result.interpretation(), Some("Moderate probability of PE"));
    }

    fn curb(extra: serde_json::Value) -> CalculatorResult {
        let mut bag = json!({
            "urea": 5, "respiratoryRate": 16, "systolicBP": 120, "diastolicBP": 80, "age": 40
        });
        if let (Some(base), Some(extra)) = (bag.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        curb65(&params(bag)).unwrap()
    }

    #[test]
    fn curb65_low_risk_baseline() {
        let result = curb(json!({}));
        assert_eq!(result.value(), 0.0);
        assert!(result.notes()[0].contains("0.7%"));
    }

    #[test]
    fn curb65_urea_threshold_depends_on_unit() {
        assert_eq!(curb(json!({ "urea": 8 })).value(), 1.0);
        assert_eq!(curb(json!({ "urea": 18, "ureaUnit": "mg/dL" })).value(), 0.0);
        assert_eq!(curb(json!({ "urea": 20, "ureaUnit": "mg/dL" })).value(), 1.0);
    }

    #[test]
    fn curb65_blood_pressure_criterion() {
        assert_eq!(curb(json!({ "systolicBP": 85 })).value(), 1.0);
        assert_eq!(curb(json!({ "diastolicBP": 60 })).value(), 1.0);
        assert_eq!(curb(json!({ "diastolicBP": 61 })).value(), 0.0);
    }

    #[test]
    fn curb65_severity_bands() {
        let moderate = curb(json!({ "confusion": true, "age": 70 }));
        assert_eq!(moderate.value(), 2.0);
        assert!(moderate.interpretation().unwrap().starts_with("Moderate"));

        let severe = curb(json!({ "confusion": true, "age": 70, "respiratoryRate": 32 }));
        assert_eq!(severe.value(), 3.0);
        assert!(severe.interpretation().unwrap().starts_with("Severe"));
    }
}
