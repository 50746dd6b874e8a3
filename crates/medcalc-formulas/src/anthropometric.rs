//! Body-size calculators: BMI, body surface area, ideal body weight.

use serde::Deserialize;

use medcalc_contracts::{
    calculator::CalculatorKind,
    error::{CalcError, CalcResult},
    params::Parameters,
    range::Quantity,
    result::CalculatorResult,
};

use crate::catalog::{CalculatorSpec, ParamSpec};
use crate::input::{self, HeightUnit, Sex};

const HEIGHT_UNITS: &[&str] = &["cm", "m"];
const SEXES: &[&str] = &["male", "female"];

const CM_PER_INCH: f64 = 2.54;

// ── BMI ───────────────────────────────────────────────────────────────────────

pub static BMI_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::Bmi,
    name: "Body Mass Index",
    description: "Weight relative to height squared, with WHO adult weight bands",
    params: &[
        ParamSpec::number("weight", "Body weight in kg"),
        ParamSpec::number("height", "Height in the unit given by heightUnit"),
        ParamSpec::optional_choice("heightUnit", HEIGHT_UNITS, "Unit of height (default cm)"),
    ],
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BodySize {
    weight: f64,
    height: f64,
    #[serde(default)]
    height_unit: HeightUnit,
}

pub fn bmi(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: BodySize = input::parse(CalculatorKind::Bmi, params)?;
    let height_cm = input.height_unit.to_cm(input.height);
    let warnings = input::range_warnings(&[
        (input.weight, Quantity::Weight),
        (height_cm, Quantity::Height),
    ])?;

    let height_m = height_cm / 100.0;
    let bmi = input.weight / (height_m * height_m);

    let band = if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Normal weight"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    };

    Ok(CalculatorResult::new(
        bmi,
        format!("BMI = weight / height² = {} kg / ({} m)² = {:.2}", input.weight, height_m, bmi),
        "World Health Organization. Obesity: preventing and managing the global epidemic. WHO Technical Report Series 894, 2000.",
    )
    .with_unit("kg/m²")
    .with_interpretation(band)
    .with_note("Bands: <18.5 underweight, 18.5-24.9 normal, 25-29.9 overweight, ≥30 obese")
    .with_note("BMI does not distinguish fat from lean mass and is not validated for children")
    .with_warnings(warnings))
}

// ── BSA ───────────────────────────────────────────────────────────────────────

pub static BSA_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::Bsa,
    name: "Body Surface Area (Mosteller)",
    description: "Body surface area from height and weight",
    params: &[
        ParamSpec::number("weight", "Body weight in kg"),
        ParamSpec::number("height", "Height in the unit given by heightUnit"),
        ParamSpec::optional_choice("heightUnit", HEIGHT_UNITS, "Unit of height (default cm)"),
    ],
};

pub fn bsa(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: BodySize = input::parse(CalculatorKind::Bsa, params)?;
    let height_cm = input.height_unit.to_cm(input.height);
    let warnings = input::range_warnings(&[
        (input.weight, Quantity::Weight),
        (height_cm, Quantity::Height),
    ])?;

    let bsa = (height_cm * input.weight / 3600.0).sqrt();

    Ok(CalculatorResult::new(
        bsa,
        format!("BSA = √(height × weight / 3600) = √({} cm × {} kg / 3600) = {:.2}", height_cm, input.weight, bsa),
        "Mosteller RD. Simplified calculation of body-surface area. N Engl J Med. 1987;317(17):1098.",
    )
    .with_unit("m²")
    .with_note("Average adult BSA is about 1.7 m²")
    .with_note("Used for chemotherapy dosing and cardiac index")
    .with_warnings(warnings))
}

// ── IBW ───────────────────────────────────────────────────────────────────────

pub static IBW_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::Ibw,
    name: "Ideal Body Weight (Devine)",
    description: "Ideal body weight from height and sex; defined for heights of 60 inches and above",
    params: &[
        ParamSpec::number("height", "Height in the unit given by heightUnit"),
        ParamSpec::choice("sex", SEXES, "Biological sex"),
        ParamSpec::optional_choice("heightUnit", HEIGHT_UNITS, "Unit of height (default cm)"),
        ParamSpec::optional_number("weight", "Actual body weight in kg, for the adjusted weight note"),
    ],
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdealWeightInput {
    height: f64,
    sex: Sex,
    #[serde(default)]
    height_unit: HeightUnit,
    weight: Option<f64>,
}

pub fn ibw(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: IdealWeightInput = input::parse(CalculatorKind::Ibw, params)?;
    let height_cm = input.height_unit.to_cm(input.height);
    let mut checks = vec![(height_cm, Quantity::Height)];
    if let Some(weight) = input.weight {
        checks.push((weight, Quantity::Weight));
    }
    let warnings = input::range_warnings(&checks)?;

    let inches = height_cm / CM_PER_INCH;
    if inches < 60.0 {
        return Err(CalcError::domain(format!(
            "Devine IBW is defined only for heights of 60 inches (152.4 cm) or more; got {:.1} inches",
            inches
        )));
    }

    let base = if input.sex.is_female() { 45.5 } else { 50.0 };
    let ibw = base + 2.3 * (inches - 60.0);

    let mut result = CalculatorResult::new(
        ibw,
        format!("IBW = {} + 2.3 × ({:.1} in − 60) = {:.1}", base, inches, ibw),
        "Devine BJ. Gentamicin therapy. Drug Intell Clin Pharm. 1974;8:650-655.",
    )
    .with_unit("kg")
    .with_warnings(warnings);

    if let Some(actual) = input.weight {
        let percent = actual / ibw * 100.0;
        result = result.with_note(format!("Actual weight is {:.0}% of ideal body weight", percent));
        if actual > 1.2 * ibw {
            let adjusted = ibw + 0.4 * (actual - ibw);
            result = result.with_note(format!(
                "Actual weight exceeds 120% of IBW; adjusted body weight = IBW + 0.4 × (actual − IBW) = {:.1} kg",
                adjusted
            ));
        }
    }

    Ok(result)
}
