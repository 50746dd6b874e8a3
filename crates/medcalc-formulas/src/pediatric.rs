//! Weight-based pediatric dosing.
//!
//! The arithmetic is a single product. Life-stage classification and the
//! weight-plausibility window run here; the overdose and pregnancy advisors
//! are layered on by the orchestrator.

use serde::Deserialize;

use medcalc_contracts::{
    calculator::CalculatorKind,
    error::{CalcError, CalcResult},
    params::Parameters,
    range::Quantity,
    result::{CalculatorResult, SafetyWarning, WarningCategory},
};
use medcalc_safety::pediatric;

use crate::catalog::{CalculatorSpec, ParamSpec};
use crate::input;

pub static PEDIATRIC_DOSING_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::PediatricDosingWeight,
    name: "Pediatric Weight-Based Dosing",
    description: "Single dose from a per-kg prescription, with age-band and overdose checks",
    params: &[
        ParamSpec::number("weight", "Body weight in kg"),
        ParamSpec::number("age", "Age in years (fractional for infants)"),
        ParamSpec::number("dosePerKg", "Prescribed dose in mg/kg"),
        ParamSpec::optional_text("drugName", "Drug name, checked against the per-drug ceiling table"),
        ParamSpec::flag("pregnant", "Patient is pregnant"),
        ParamSpec::flag("lactating", "Patient is breastfeeding"),
    ],
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DosingInput {
    weight: f64,
    age: f64,
    dose_per_kg: f64,
    drug_name: Option<String>,
}

pub fn pediatric_dosing(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: DosingInput = input::parse(CalculatorKind::PediatricDosingWeight, params)?;
    input::require_positive(input.dose_per_kg, "Dose per kg")?;
    let mut warnings = input::range_warnings(&[
        (input.weight, Quantity::Weight),
        (input.age, Quantity::Age),
    ])?;

    let check = pediatric::validate_dosing(input.age, input.weight);
    let band = match check.band {
        Some(band) if check.valid => band,
        _ => return Err(CalcError::validation(check.errors.join("; "))),
    };
    warnings.extend(
        check
            .warnings
            .into_iter()
            .map(|w| SafetyWarning::warning(w).with_category(WarningCategory::Pediatric)),
    );

    let dose = input::round_to(input.dose_per_kg * input.weight, 2);
    let drug = input.drug_name.as_deref().map(str::trim).filter(|d| !d.is_empty());

    let mut result = CalculatorResult::new(
        dose,
        format!(
            "Dose = {} mg/kg × {} kg = {} mg",
            input.dose_per_kg, input.weight, dose
        ),
        "Kearns GL, et al. Developmental pharmacology: drug disposition, action, and therapy in infants and children. N Engl J Med. 2003;349(12):1157-1167.",
    )
    .with_unit("mg")
    .with_interpretation(format!("{} dose ({}, {})", capitalize(band.as_str()), band.age_range(), band.description()))
    .with_warnings(warnings);

    if let Some(drug) = drug {
        result = result.with_note(format!("Drug: {drug}"));
    }
    result = result
        .with_note("A weight-based dose should not exceed the usual adult dose")
        .with_note("Verify the per-kg dose against a current pediatric formulary");

    Ok(result)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
