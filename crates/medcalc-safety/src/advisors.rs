//! Stateless advisory rule sets.
//!
//! Advisors never abort an invocation. They read the raw parameter bag
//! after the formula has succeeded and append warnings to the result. The
//! overdose advisor may label a finding `CriticalAdvisory`; the number is
//! still returned alongside it.

use tracing::warn;

use medcalc_contracts::{
    calculator::CalculatorKind,
    params::Parameters,
    result::{SafetyWarning, WarningCategory},
};

use crate::drug_limits::DrugLimitTable;

/// Fraction of a drug's ceiling at which the advisor starts warning.
pub const APPROACHING_LIMIT_FRACTION: f64 = 0.9;

/// Drug-agnostic per-kg ceilings (mg/kg) for unrecognized drug names.
pub const GENERIC_CRITICAL_MG_PER_KG: f64 = 100.0;
pub const GENERIC_WARNING_MG_PER_KG: f64 = 50.0;

/// Calculator-specific caveats.
pub fn contraindications(kind: CalculatorKind, params: &Parameters) -> Vec<SafetyWarning> {
    let mut warnings = Vec::new();

    match kind {
        CalculatorKind::CreatinineClearance => {
            if params.number("creatinine").is_some_and(|c| c > 5.0) {
                warnings.push(
                    SafetyWarning::warning(
                        "Creatinine > 5 mg/dL: Cockcroft-Gault is unreliable when renal function is \
                         unstable; consider measured clearance",
                    )
                    .with_category(WarningCategory::Contraindication),
                );
            }
            if let Some(age) = params.number("age") {
                if age < 18.0 {
                    warnings.push(
                        SafetyWarning::warning(
                            "Cockcroft-Gault is not validated for patients under 18; use a \
                             pediatric equation (e.g. bedside Schwartz)",
                        )
                        .with_category(WarningCategory::Pediatric),
                    );
                } else if age > 80.0 {
                    warnings.push(
                        SafetyWarning::warning(
                            "Age > 80: Cockcroft-Gault accuracy is reduced in the very elderly; \
                             interpret with caution",
                        )
                        .with_category(WarningCategory::Geriatric),
                    );
                }
            }
        }
        CalculatorKind::Cha2ds2Vasc => {
            warnings.push(
                SafetyWarning::info(
                    "CHA₂DS₂-VASc presumes confirmed atrial fibrillation; it does not apply to \
                     patients without AF",
                )
                .with_category(WarningCategory::Contraindication),
            );
        }
        _ => {}
    }

    warnings
}

/// Compare a per-kg dose against the drug's ceiling and the generic safety
/// net.
///
/// Both checks run: a known drug can trip its own ceiling and the generic
/// one at the same time.
pub fn overdose(table: &DrugLimitTable, drug: Option<&str>, dose_per_kg: f64) -> Vec<SafetyWarning> {
    let mut warnings = Vec::new();

    if let Some(limit) = drug.and_then(|name| table.lookup(name)) {
        if dose_per_kg > limit.max_mg_per_kg {
            warn!(drug = %limit.name, dose_per_kg, max = limit.max_mg_per_kg, "dose exceeds drug ceiling");
            warnings.push(
                SafetyWarning::critical(format!(
                    "OVERDOSE ALERT: {dose_per_kg} mg/kg exceeds the maximum recommended {} mg/kg \
                     for {}. Do not administer without review.",
                    limit.max_mg_per_kg, limit.name
                ))
                .with_category(WarningCategory::Overdose),
            );
        } else if dose_per_kg >= APPROACHING_LIMIT_FRACTION * limit.max_mg_per_kg {
            warnings.push(
                SafetyWarning::warning(format!(
                    "Dose {dose_per_kg} mg/kg is at or above 90% of the maximum recommended {} mg/kg \
                     for {}",
                    limit.max_mg_per_kg, limit.name
                ))
                .with_category(WarningCategory::Overdose),
            );
        }
    }

    if dose_per_kg > GENERIC_CRITICAL_MG_PER_KG {
        warn!(dose_per_kg, "dose exceeds generic per-kg ceiling");
        warnings.push(
            SafetyWarning::critical(format!(
                "Dose {dose_per_kg} mg/kg exceeds {GENERIC_CRITICAL_MG_PER_KG} mg/kg, which is \
                 unusually high for any drug. Verify units and do not administer without review."
            ))
            .with_category(WarningCategory::Overdose),
        );
    } else if dose_per_kg > GENERIC_WARNING_MG_PER_KG {
        warnings.push(
            SafetyWarning::warning(format!(
                "Dose {dose_per_kg} mg/kg exceeds {GENERIC_WARNING_MG_PER_KG} mg/kg; verify the \
                 dose and units"
            ))
            .with_category(WarningCategory::Overdose),
        );
    }

    warnings
}

/// Warnings for explicitly flagged pregnancy or lactation.
pub fn pregnancy(pregnant: bool, lactating: bool) -> Vec<SafetyWarning> {
    let mut warnings = Vec::new();
    if pregnant {
        warnings.push(
            SafetyWarning::warning(
                "Patient is pregnant: review the drug's pregnancy safety data and adjust the dose \
                 before administration",
            )
            .with_category(WarningCategory::Pregnancy),
        );
    }
    if lactating {
        warnings.push(
            SafetyWarning::warning(
                "Patient is breastfeeding: review transfer of the drug into breast milk before \
                 administration",
            )
            .with_category(WarningCategory::Pregnancy),
        );
    }
    warnings
}

/// Generic pregnancy/lactation reminder for calculators without explicit
/// flags.
pub fn pregnancy_reminder() -> SafetyWarning {
    SafetyWarning::info(
        "If the patient is pregnant or breastfeeding, confirm that dose adjustments based on this \
         result account for altered physiology",
    )
    .with_category(WarningCategory::Pregnancy)
}

/// Run every advisor that applies to `kind`.
///
/// Calculators not listed here trigger no advisors.
pub fn advise(kind: CalculatorKind, params: &Parameters, table: &DrugLimitTable) -> Vec<SafetyWarning> {
    let mut warnings = contraindications(kind, params);

    match kind {
        CalculatorKind::PediatricDosingWeight => {
            if let Some(dose_per_kg) = params.number("dosePerKg") {
                warnings.extend(overdose(table, params.text("drugName"), dose_per_kg));
            }
            warnings.extend(pregnancy(params.flag("pregnant"), params.flag("lactating")));
        }
        CalculatorKind::CreatinineClearance | CalculatorKind::Bsa => {
            warnings.push(pregnancy_reminder());
        }
        _ => {}
    }

    warnings
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use medcalc_contracts::result::WarningLevel;

    use super::*;

    fn params(value: serde_json::Value) -> Parameters {
        Parameters::from_json(value).unwrap()
    }

    fn levels(warnings: &[SafetyWarning]) -> Vec<WarningLevel> {
        warnings.iter().map(|w| w.level).collect()
    }

    // ── Contraindications ─────────────────────────────────────────────────────

    #[test]
    fn creatinine_clearance_caveats() {
        let warnings = contraindications(
            CalculatorKind::CreatinineClearance,
            &params(json!({ "creatinine": 6.0, "age": 85 })),
        );
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].category, Some(WarningCategory::Contraindication));
        assert_eq!(warnings[1].category, Some(WarningCategory::Geriatric));

        let warnings = contraindications(
            CalculatorKind::CreatinineClearance,
            &params(json!({ "creatinine": 1.0, "age": 16 })),
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, Some(WarningCategory::Pediatric));

        let warnings = contraindications(
            CalculatorKind::CreatinineClearance,
            &params(json!({ "creatinine": 5.0, "age": 80 })),
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn chads_vasc_always_notes_af_presumption() {
        let warnings = contraindications(CalculatorKind::Cha2ds2Vasc, &Parameters::new());
        assert_eq!(levels(&warnings), vec![WarningLevel::Info]);
        assert!(warnings[0].message.contains("atrial fibrillation"));
    }

    #[test]
    fn other_calculators_have_no_contraindications() {
        assert!(contraindications(CalculatorKind::Bmi, &params(json!({ "age": 90 }))).is_empty());
    }

    // ── Overdose ──────────────────────────────────────────────────────────────

    #[test]
    fn exceeding_drug_ceiling_is_a_critical_advisory() {
        let table = DrugLimitTable::builtin();
        let warnings = overdose(&table, Some("acetaminophen"), 20.0);
        assert_eq!(levels(&warnings), vec![WarningLevel::CriticalAdvisory]);
        assert!(warnings[0].message.contains("Do not administer without review"));
        assert_eq!(warnings[0].category, Some(WarningCategory::Overdose));
    }

    #[test]
    fn approaching_drug_ceiling_warns() {
        let table = DrugLimitTable::builtin();
        assert_eq!(levels(&overdose(&table, Some("ibuprofen"), 9.0)), vec![WarningLevel::Warning]);
        assert_eq!(levels(&overdose(&table, Some("ibuprofen"), 10.0)), vec![WarningLevel::Warning]);
        assert!(overdose(&table, Some("ibuprofen"), 8.9).is_empty());
    }

    #[test]
    fn generic_safety_net_covers_unknown_drugs() {
        let table = DrugLimitTable::builtin();
        assert_eq!(
            levels(&overdose(&table, Some("unlisted-drug"), 150.0)),
            vec![WarningLevel::CriticalAdvisory]
        );
        assert_eq!(levels(&overdose(&table, None, 60.0)), vec![WarningLevel::Warning]);
        assert!(overdose(&table, None, 50.0).is_empty());
    }

    #[test]
    fn known_drug_can_trip_both_checks() {
        let table = DrugLimitTable::builtin();
        let warnings = overdose(&table, Some("morphine"), 120.0);
        assert_eq!(
            levels(&warnings),
            vec![WarningLevel::CriticalAdvisory, WarningLevel::CriticalAdvisory]
        );
    }

    // ── Pregnancy ─────────────────────────────────────────────────────────────

    #[test]
    fn pregnancy_flags_produce_warnings() {
        assert!(pregnancy(false, false).is_empty());
        let warnings = pregnancy(true, true);
        assert_eq!(levels(&warnings), vec![WarningLevel::Warning, WarningLevel::Warning]);
        assert!(warnings[1].message.contains("breast milk"));
        assert_eq!(pregnancy_reminder().level, WarningLevel::Info);
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    #[test]
    fn advise_layers_dosing_advisors_for_pediatric_dosing() {
        let table = DrugLimitTable::builtin();
        let warnings = advise(
            CalculatorKind::PediatricDosingWeight,
            &params(json!({ "dosePerKg": 16, "drugName": "paracetamol", "pregnant": true })),
            &table,
        );
        assert_eq!(
            levels(&warnings),
            vec![WarningLevel::CriticalAdvisory, WarningLevel::Warning]
        );
    }

    #[test]
    fn advise_is_silent_for_calculators_without_advisors() {
        let table = DrugLimitTable::builtin();
        assert!(advise(CalculatorKind::Meld, &params(json!({ "bilirubin": 2 })), &table).is_empty());
    }
}
