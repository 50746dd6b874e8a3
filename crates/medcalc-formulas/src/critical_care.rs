//! Intensive care scores and burn resuscitation: SOFA, qSOFA, GCS, Parkland.

use serde::Deserialize;

use medcalc_contracts::{
    calculator::CalculatorKind,
    error::{CalcError, CalcResult},
    params::Parameters,
    range::Quantity,
    result::{CalculatorResult, SafetyWarning},
};

use crate::catalog::{CalculatorSpec, ParamSpec};
use crate::input;

// ── SOFA ──────────────────────────────────────────────────────────────────────

pub static SOFA_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::Sofa,
    name: "SOFA Score",
    description: "Sequential Organ Failure Assessment across six organ systems",
    params: &[
        ParamSpec::number("pao2Fio2", "PaO₂/FiO₂ ratio in mmHg"),
        ParamSpec::flag("mechanicalVentilation", "On mechanical ventilation or CPAP"),
        ParamSpec::number("platelets", "Platelets in ×10³/µL"),
        ParamSpec::number("bilirubin", "Total bilirubin in mg/dL"),
        ParamSpec::number("meanArterialPressure", "Mean arterial pressure in mmHg"),
        ParamSpec::optional_number(
            "vasopressorLevel",
            "0 none, 1 dopamine ≤5 or any dobutamine, 2 dopamine >5 or epi/norepi ≤0.1, 3 dopamine >15 or epi/norepi >0.1",
        ),
        ParamSpec::number("glasgowComaScale", "Glasgow Coma Scale total, 3-15"),
        ParamSpec::number("creatinine", "Serum creatinine in mg/dL"),
        ParamSpec::optional_number("urineOutput", "Urine output in mL/day"),
    ],
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrganFunction {
    pao2_fio2: f64,
    #[serde(default)]
    mechanical_ventilation: bool,
    platelets: f64,
    bilirubin: f64,
    mean_arterial_pressure: f64,
    #[serde(default)]
    vasopressor_level: f64,
    glasgow_coma_scale: f64,
    creatinine: f64,
    urine_output: Option<f64>,
}

fn respiratory_points(ratio: f64, ventilated: bool) -> u32 {
    match ratio {
        r if r < 100.0 && ventilated => 4,
        r if r < 200.0 && ventilated => 3,
        r if r < 300.0 => 2,
        r if r < 400.0 => 1,
        _ => 0,
    }
}

fn coagulation_points(platelets: f64) -> u32 {
    match platelets {
        p if p < 20.0 => 4,
        p if p < 50.0 => 3,
        p if p < 100.0 => 2,
        p if p < 150.0 => 1,
        _ => 0,
    }
}

fn liver_points(bilirubin: f64) -> u32 {
    match bilirubin {
        b if b >= 12.0 => 4,
        b if b >= 6.0 => 3,
        b if b >= 2.0 => 2,
        b if b >= 1.2 => 1,
        _ => 0,
    }
}

fn cardiovascular_points(map: f64, vasopressor_level: u32) -> u32 {
    let pressure = u32::from(map < 70.0);
    let support = if vasopressor_level == 0 { 0 } else { vasopressor_level + 1 };
    pressure.max(support)
}

fn cns_points(gcs: u32) -> u32 {
    match gcs {
        15 => 0,
        13..=14 => 1,
        10..=12 => 2,
        6..=9 => 3,
        _ => 4,
    }
}

fn renal_points(creatinine: f64, urine_output: Option<f64>) -> u32 {
    let by_creatinine = match creatinine {
        c if c >= 5.0 => 4,
        c if c >= 3.5 => 3,
        c if c >= 2.0 => 2,
        c if c >= 1.2 => 1,
        _ => 0,
    };
    let by_urine = match urine_output {
        Some(u) if u < 200.0 => 4,
        Some(u) if u < 500.0 => 3,
        _ => 0,
    };
    by_creatinine.max(by_urine)
}

pub fn sofa(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: OrganFunction = input::parse(CalculatorKind::Sofa, params)?;
    input::require_positive(input.pao2_fio2, "PaO₂/FiO₂ ratio")?;
    let gcs = input::require_score(input.glasgow_coma_scale, "Glasgow Coma Scale", 3, 15)?;
    let vasopressors = input::require_score(input.vasopressor_level, "Vasopressor level", 0, 3)?;
    let warnings = input::range_warnings(&[(input.creatinine, Quantity::Creatinine)])?;

    let components = [
        ("Respiratory", respiratory_points(input.pao2_fio2, input.mechanical_ventilation)),
        ("Coagulation", coagulation_points(input.platelets)),
        ("Liver", liver_points(input.bilirubin)),
        ("Cardiovascular", cardiovascular_points(input.mean_arterial_pressure, vasopressors)),
        ("CNS", cns_points(gcs)),
        ("Renal", renal_points(input.creatinine, input.urine_output)),
    ];
    let total: u32 = components.iter().map(|(_, points)| points).sum();

    let interpretation = match total {
        0..=6 => "Low predicted ICU mortality (<10%)",
        7..=9 => "Moderate predicted ICU mortality (15-20%)",
        10..=12 => "High predicted ICU mortality (40-50%)",
        _ => "Very high predicted ICU mortality (>50%)",
    };

    let mut result = CalculatorResult::new(
        f64::from(total),
        "Sum of respiratory, coagulation, liver, cardiovascular, CNS and renal sub-scores (0-4 each)",
        "Vincent JL, et al. The SOFA (Sepsis-related Organ Failure Assessment) score to describe organ dysfunction/failure. Intensive Care Med. 1996;22(7):707-710.",
    )
    .with_unit("points")
    .with_interpretation(interpretation)
    .with_warnings(warnings);

    for (system, points) in components {
        result = result.with_note(format!("{system}: {points}"));
    }
    result = result.with_note("An increase of 2 or more from baseline indicates organ dysfunction (Sepsis-3)");

    Ok(result)
}

// ── qSOFA ─────────────────────────────────────────────────────────────────────

pub static QSOFA_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::Qsofa,
    name: "qSOFA",
    description: "Bedside screen for sepsis-related poor outcome",
    params: &[
        ParamSpec::flag("alteredMentation", "Altered mental status (GCS < 15)"),
        ParamSpec::number("systolicBP", "Systolic blood pressure in mmHg"),
        ParamSpec::number("respiratoryRate", "Respiratory rate in breaths/min"),
    ],
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuickSofaInput {
    #[serde(default)]
    altered_mentation: bool,
    #[serde(rename = "systolicBP")]
    systolic_bp: f64,
    respiratory_rate: f64,
}

pub fn qsofa(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: QuickSofaInput = input::parse(CalculatorKind::Qsofa, params)?;
    let warnings = input::range_warnings(&[(input.systolic_bp, Quantity::SystolicBp)])?;

    let score = u32::from(input.altered_mentation)
        + u32::from(input.systolic_bp <= 100.0)
        + u32::from(input.respiratory_rate >= 22.0);

    let interpretation = if score >= 2 {
        "Elevated risk: qSOFA ≥ 2 is associated with poor outcome in suspected infection"
    } else {
        "Not elevated"
    };

    Ok(CalculatorResult::new(
        f64::from(score),
        "Altered mentation(1) + SBP ≤ 100(1) + RR ≥ 22(1)",
        "Seymour CW, et al. Assessment of clinical criteria for sepsis. JAMA. 2016;315(8):762-774.",
    )
    .with_unit("points")
    .with_interpretation(interpretation)
    .with_note("qSOFA is a prompt for further assessment, not a diagnostic criterion for sepsis")
    .with_warnings(warnings))
}

// ── Glasgow Coma Scale ────────────────────────────────────────────────────────

pub static GCS_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::GlasgowComaScale,
    name: "Glasgow Coma Scale",
    description: "Level of consciousness from eye, verbal and motor responses",
    params: &[
        ParamSpec::number("eye", "Eye opening, 1-4"),
        ParamSpec::number("verbal", "Verbal response, 1-5"),
        ParamSpec::number("motor", "Motor response, 1-6"),
    ],
};

#[derive(Debug, Deserialize)]
struct ComaScaleInput {
    eye: f64,
    verbal: f64,
    motor: f64,
}

pub fn glasgow_coma_scale(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: ComaScaleInput = input::parse(CalculatorKind::GlasgowComaScale, params)?;
    let eye = input::require_score(input.eye, "Eye response", 1, 4)?;
    let verbal = input::require_score(input.verbal, "Verbal response", 1, 5)?;
    let motor = input::require_score(input.motor, "Motor response", 1, 6)?;
    let total = eye + verbal + motor;

    let interpretation = match total {
        3..=8 => "Severe brain injury",
        9..=12 => "Moderate brain injury",
        _ => "Mild or no brain injury",
    };

    let mut result = CalculatorResult::new(
        f64::from(total),
        format!("GCS = E{eye} + V{verbal} + M{motor} = {total}"),
        "Teasdale G, Jennett B. Assessment of coma and impaired consciousness. Lancet. 1974;2(7872):81-84.",
    )
    .with_unit("points")
    .with_interpretation(interpretation);

    if total <= 8 {
        result = result.with_note("GCS ≤ 8: consider definitive airway protection");
    }

    Ok(result)
}

// ── Parkland ──────────────────────────────────────────────────────────────────

pub static PARKLAND_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::ParklandFormula,
    name: "Parkland Formula",
    description: "24-hour crystalloid requirement after burn injury",
    params: &[
        ParamSpec::number("weight", "Body weight in kg"),
        ParamSpec::number("burnPercentage", "Total body surface area burned, 0-100%"),
    ],
};

/// Burn size above which referral to a burn center is advised.
const BURN_CENTER_TBSA: f64 = 20.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BurnInput {
    weight: f64,
    burn_percentage: f64,
}

pub fn parkland(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: BurnInput = input::parse(CalculatorKind::ParklandFormula, params)?;
    if !(0.0..=100.0).contains(&input.burn_percentage) {
        return Err(CalcError::domain(format!(
            "Burn percentage must be between 0 and 100% TBSA (got {})",
            input.burn_percentage
        )));
    }
    let mut warnings = input::range_warnings(&[(input.weight, Quantity::Weight)])?;

    let total = 4.0 * input.weight * input.burn_percentage;
    let first_8h = total / 2.0;
    let next_16h = total / 2.0;
    let first_rate = first_8h / 8.0;
    let next_rate = next_16h / 16.0;

    if input.burn_percentage > BURN_CENTER_TBSA {
        warnings.push(SafetyWarning::warning(format!(
            "Burns over {BURN_CENTER_TBSA}% TBSA: consider referral to a burn center"
        )));
    }

    Ok(CalculatorResult::new(
        total,
        format!(
            "Total = 4 mL × {} kg × {}% TBSA = {} mL",
            input.weight, input.burn_percentage, total
        ),
        "Baxter CR, Shires T. Physiological response to crystalloid resuscitation of severe burns. Ann N Y Acad Sci. 1968;150(3):874-894.",
    )
    .with_unit("mL")
    .with_interpretation("Lactated Ringer's over the first 24 hours from the time of injury")
    .with_note(format!("First 8 hours: {first_8h} mL ({first_rate} mL/h)"))
    .with_note(format!("Next 16 hours: {next_16h} mL ({next_rate} mL/h)"))
    .with_note("Time starts at the burn, not at hospital arrival")
    .with_note("Titrate to urine output of 0.5-1 mL/kg/h in adults")
    .with_warnings(warnings))
}
