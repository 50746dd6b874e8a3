//! Serum anion gap.

use serde::Deserialize;

use medcalc_contracts::{calculator::CalculatorKind, error::CalcResult, params::Parameters, result::CalculatorResult};

use crate::catalog::{CalculatorSpec, ParamSpec};
use crate::input;

/// Reference albumin (g/dL) for the corrected gap.
const NORMAL_ALBUMIN: f64 = 4.0;

pub static ANION_GAP_SPEC: CalculatorSpec = CalculatorSpec {
    kind: CalculatorKind::AnionGap,
    name: "Anion Gap",
    description: "Serum anion gap with optional albumin correction",
    params: &[
        ParamSpec::number("sodium", "Serum sodium in mEq/L"),
        ParamSpec::number("chloride", "Serum chloride in mEq/L"),
        ParamSpec::number("bicarbonate", "Serum bicarbonate in mEq/L"),
        ParamSpec::optional_number("albumin", "Serum albumin in g/dL"),
    ],
};

#[derive(Debug, Deserialize)]
struct Electrolytes {
    sodium: f64,
    chloride: f64,
    bicarbonate: f64,
    albumin: Option<f64>,
}

pub fn anion_gap(params: &Parameters) -> CalcResult<CalculatorResult> {
    let input: Electrolytes = input::parse(CalculatorKind::AnionGap, params)?;
    input::require_positive(input.sodium, "Sodium")?;
    input::require_positive(input.chloride, "Chloride")?;
    input::require_positive(input.bicarbonate, "Bicarbonate")?;

    let gap = input.sodium - (input.chloride + input.bicarbonate);

    let interpretation = if gap > 16.0 {
        "High anion gap: consider metabolic acidosis (ketoacidosis, lactic acidosis, toxins, renal failure)"
    } else if gap < 8.0 {
        "Low anion gap: consider hypoalbuminemia or laboratory error"
    } else {
        "Normal anion gap"
    };

    let mut result = CalculatorResult::new(
        gap,
        format!(
            "AG = Na − (Cl + HCO₃) = {} − ({} + {}) = {}",
            input.sodium, input.chloride, input.bicarbonate, gap
        ),
        "Kraut JA, Madias NE. Serum anion gap: its uses and limitations in clinical medicine. Clin J Am Soc Nephrol. 2007;2(1):162-174.",
    )
    .with_unit("mEq/L")
    .with_interpretation(interpretation)
    .with_note("Reference range 8-16 mEq/L; laboratory ranges vary");

    if let Some(albumin) = input.albumin {
        input::require_positive(albumin, "Albumin")?;
        let corrected = gap + 2.5 * (NORMAL_ALBUMIN - albumin);
        result = result.with_note(format!(
            "Albumin-corrected AG = AG + 2.5 × (4 − {albumin}) = {corrected:.1} mEq/L"
        ));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use medcalc_contracts::error::CalcError;

    use super::*;
    use crate::test_support::params;

    #[test]
    fn gap_bands() {
        let band = |na: f64| {
            anion_gap(&params(json!({ "sodium": na, "chloride": 100, "bicarbonate": 24 })))
                .unwrap()
                .interpretation()
                .unwrap()
                .to_string()
        };
        assert!(band(141.0).starts_with("High anion gap"));
        assert_eq!(band(140.0), "Normal anion gap");
        assert_eq!(band(132.0), "Normal anion gap");
        assert!(band(131.0).starts_with("Low anion gap"));
    }

    #[test]
    fn gap_value() {
        let result = anion_gap(&params(json!({ "sodium": 140, "chloride": 104, "bicarbonate": 24 }))).unwrap();
        assert_eq!(result.value(), 12.0);
        assert_eq!(result.notes().len(), 1);
    }

    #[test]
    fn albumin_correction_note() {
        let result = anion_gap(&params(json!({
            "sodium": 140, "chloride": 104, "bicarbonate": 24, "albumin": 2.0
        })))
        .unwrap();
        assert!(result.notes().iter().any(|n| n.contains("= 17.0 mEq/L")), "{:?}", result.notes());
    }

    #[test]
    fn zero_electrolyte_is_a_domain_error() {
        assert!(matches!(
            anion_gap(&params(json!({ "sodium": 140, "chloride": 0, "bicarbonate": 24 }))),
            Err(CalcError::Domain { .. })
        ));
    }
}
