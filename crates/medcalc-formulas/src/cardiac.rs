//! Cardiology scores: CHA₂DS₂-VASc, HAS-BLED and QTc correction.

use serde::Deserialize;

use medcalc_contracts::{
    calculator::CalculatorKind,
    error::{CalcError, CalcResult},
    params::Parameters,
    range::Quantity,
    result::CalculatorResult,
};

use crate::catalog::{CalculatorSpec, ParamSpec};
use crate::input::{self, Sex};

const SEXES: &[&str] = &["male", "female"];
const QTC_FORMULAS: &[&str] = &["bazett", "fridericia", "framingham"];

// ── CHA₂DS₂-VASc ──────────────────────────────────────────────────────────────

pub static CHA2DS2_VASC_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::Cha2ds2Vasc,
    name: "CHA₂DS₂-VASc",
    description: "Stroke risk in atrial fibrillation",
    params: &[
        ParamSpec::number("age", "Age in years"),
        ParamSpec::choice("sex", SEXES, "Biological sex"),
        ParamSpec::flag("chf", "Congestive heart failure"),
        ParamSpec::flag("hypertension", "Hypertension"),
        ParamSpec::flag("diabetes", "Diabetes mellitus"),
        ParamSpec::flag("strokeTia", "Prior stroke, TIA or thromboembolism"),
        ParamSpec::flag("vascularDisease", "Prior MI, peripheral artery disease or aortic plaque"),
    ],
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StrokeRiskInput {
    age: f64,
    sex: Sex,
    #[serde(default)]
    chf: bool,
    #[serde(default)]
    hypertension: bool,
    #[serde(default)]
    diabetes: bool,
    #[serde(default)]
    stroke_tia: bool,
    #[serde(default)]
    vascular_disease: bool,
}

/// Adjusted annual stroke rate (%) by score, 0 through 9.
const STROKE_RATE_BY_SCORE: [f64; 10] = [0.0, 1.3, 2.2, 3.2, 4.0, 6.7, 9.8, 9.6, 6.7, 15.2];

pub fn cha2ds2_vasc(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: StrokeRiskInput = input::parse(CalculatorKind::Cha2ds2Vasc, params)?;
    let warnings = input::range_warnings(&[(input.age, Quantity::Age)])?;

    let age_points = if input.age >= 75.0 {
        2
    } else if input.age >= 65.0 {
        1
    } else {
        0
    };
    let score: u32 = u32::from(input.chf)
        + u32::from(input.hypertension)
        + age_points
        + u32::from(input.diabetes)
        + 2 * u32::from(input.stroke_tia)
        + u32::from(input.vascular_disease)
        + u32::from(input.sex.is_female());

    let interpretation = match score {
        0 => "Low risk: anticoagulation not needed",
        1 => "Low-moderate risk: consider anticoagulation",
        2..=4 => "Moderate-high risk: anticoagulation recommended",
        _ => "High risk: anticoagulation strongly recommended",
    };
    let stroke_rate = STROKE_RATE_BY_SCORE[score.min(9) as usize];

    Ok(CalculatorResult::new(
        f64::from(score),
        "CHF(1) + Hypertension(1) + Age≥75(2) / Age 65-74(1) + Diabetes(1) + Stroke/TIA(2) + Vascular disease(1) + Female(1)",
        "Lip GY, et al. Refining clinical risk stratification for predicting stroke and thromboembolism in atrial fibrillation. Chest. 2010;137(2):263-272.",
    )
    .with_unit("points")
    .with_interpretation(interpretation)
    .with_note(format!("Adjusted annual stroke rate at score {score}: {stroke_rate}%"))
    .with_note("Weigh against bleeding risk (HAS-BLED) before starting anticoagulation")
    .with_warnings(warnings))
}

// ── HAS-BLED ──────────────────────────────────────────────────────────────────

pub static HAS_BLED_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::HasBled,
    name: "HAS-BLED",
    description: "Major bleeding risk on anticoagulation",
    params: &[
        ParamSpec::number("age", "Age in years (counts when > 65)"),
        ParamSpec::flag("hypertension", "Uncontrolled hypertension"),
        ParamSpec::flag("abnormalRenal", "Abnormal renal function"),
        ParamSpec::flag("abnormalLiver", "Abnormal liver function"),
        ParamSpec::flag("stroke", "Prior stroke"),
        ParamSpec::flag("bleeding", "Prior major bleeding or predisposition"),
        ParamSpec::flag("labileInr", "Labile INR"),
        ParamSpec::flag("drugs", "Antiplatelet or NSAID use"),
        ParamSpec::flag("alcohol", "Alcohol use ≥ 8 drinks per week"),
    ],
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BleedingRiskInput {
    age: f64,
    #[serde(default)]
    hypertension: bool,
    #[serde(default)]
    abnormal_renal: bool,
    #[serde(default)]
    abnormal_liver: bool,
    #[serde(default)]
    stroke: bool,
    #[serde(default)]
    bleeding: bool,
    #[serde(default)]
    labile_inr: bool,
    #[serde(default)]
    drugs: bool,
    #[serde(default)]
    alcohol: bool,
}

/// Major bleeds per 100 patient-years by score, 0 through 5+.
const BLEEDS_PER_100_BY_SCORE: [f64; 6] = [1.13, 1.02, 1.88, 3.74, 8.70, 12.50];

pub fn has_bled(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: BleedingRiskInput = input::parse(CalculatorKind::HasBled, params)?;
    let warnings = input::range_warnings(&[(input.age, Quantity::Age)])?;

    let score: u32 = [
        input.hypertension,
        input.abnormal_renal,
        input.abnormal_liver,
        input.stroke,
        input.bleeding,
        input.labile_inr,
        input.age > 65.0,
        input.drugs,
        input.alcohol,
    ]
    .into_iter()
    .map(u32::from)
    .sum();

    let interpretation = if score >= 3 {
        "High bleeding risk: caution and regular review warranted"
    } else {
        "Low-moderate bleeding risk"
    };
    let rate = BLEEDS_PER_100_BY_SCORE[score.min(5) as usize];

    Ok(CalculatorResult::new(
        f64::from(score),
        "Hypertension + Abnormal renal + Abnormal liver + Stroke + Bleeding + Labile INR + Elderly (>65) + Drugs + Alcohol (1 point each)",
        "Pisters R, et al. A novel user-friendly score (HAS-BLED) to assess 1-year risk of major bleeding in patients with atrial fibrillation. Chest. 2010;138(5):1093-1100.",
    )
    .with_unit("points")
    .with_interpretation(interpretation)
    .with_note(format!("Major bleeds per 100 patient-years at this score: {rate}"))
    .with_note("A high score is a prompt to correct modifiable factors, not a reason alone to withhold anticoagulation")
    .with_warnings(warnings))
}

// ── QTc ───────────────────────────────────────────────────────────────────────

pub static QTC_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::QtcCorrection,
    name: "QTc Correction",
    description: "Heart-rate-corrected QT interval by Bazett, Fridericia or Framingham",
    params: &[
        ParamSpec::number("qt", "Measured QT interval in ms"),
        ParamSpec::optional_number("rr", "RR interval in ms (takes precedence over heartRate)"),
        ParamSpec::optional_number("heartRate", "Heart rate in bpm, used when rr is absent"),
        ParamSpec::optional_choice("formula", QTC_FORMULAS, "Correction formula (default bazett)"),
    ],
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum QtcFormula {
    #[default]
    Bazett,
    Fridericia,
    Framingham,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QtInput {
    qt: f64,
    rr: Option<f64>,
    heart_rate: Option<f64>,
    #[serde(default)]
    formula: QtcFormula,
}

pub fn qtc(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: QtInput = input::parse(CalculatorKind::QtcCorrection, params)?;
    input::require_positive(input.qt, "QT interval")?;

    let mut warnings = Vec::new();
    let rr_ms = match (input.rr, input.heart_rate) {
        (Some(rr), _) => rr,
        (None, Some(hr)) => {
            warnings = input::range_warnings(&[(hr, Quantity::HeartRate)])?;
            60_000.0 / hr
        }
        (None, None) => {
            return Err(CalcError::invalid_parameters(
                "qtc-correction: either rr or heartRate is required",
            ))
        }
    };
    input::require_positive(rr_ms, "RR interval")?;
    let rr_sec = rr_ms / 1000.0;

    let (raw, formula) = match input.formula {
        QtcFormula::Bazett => (
            input.qt / rr_sec.sqrt(),
            format!("Bazett: QTc = QT / √RR = {} / √{} = {:.1}", input.qt, rr_sec, input.qt / rr_sec.sqrt()),
        ),
        QtcFormula::Fridericia => (
            input.qt / rr_sec.cbrt(),
            format!("Fridericia: QTc = QT / ∛RR = {} / ∛{} = {:.1}", input.qt, rr_sec, input.qt / rr_sec.cbrt()),
        ),
        QtcFormula::Framingham => (
            input.qt + 154.0 * (1.0 - rr_sec),
            format!(
                "Framingham: QTc = QT + 154 × (1 − RR) = {} + 154 × (1 − {}) = {:.1}",
                input.qt,
                rr_sec,
                input.qt + 154.0 * (1.0 - rr_sec)
            ),
        ),
    };
    let qtc = raw.round();

    let interpretation = if qtc > 500.0 {
        "HIGH RISK: markedly prolonged QTc with risk of torsades de pointes"
    } else if qtc > 480.0 {
        "Prolonged QTc"
    } else if qtc > 450.0 {
        "Borderline prolonged QTc"
    } else {
        "Normal QTc"
    };

    let mut result = CalculatorResult::new(
        qtc,
        formula,
        "Bazett HC. Heart. 1920;7:353-370. Fridericia LS. Acta Med Scand. 1920;53:469-486. Sagie A, et al. Am J Cardiol. 1992;70(7):797-801.",
    )
    .with_unit("ms")
    .with_interpretation(interpretation)
    .with_note(format!("RR interval: {} ms", rr_ms))
    .with_note("Bazett overcorrects at high heart rates; Fridericia or Framingham are preferred above 100 bpm")
    .with_warnings(warnings);

    if qtc > 500.0 {
        result = result.with_note(
            "QTc > 500 ms: review QT-prolonging drugs, correct potassium and magnesium, and consider cardiac monitoring",
        );
    }

    Ok(result)
}
