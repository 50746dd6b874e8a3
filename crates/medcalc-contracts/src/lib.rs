//! # medcalc-contracts
//!
//! Shared types, parameter model, and error contracts for the clinical
//! calculator runtime.
//!
//! All crates in the workspace import from here. No formula or validation
//! logic lives in this crate, only data definitions and error types.

pub mod age;
pub mod audit;
pub mod calculator;
pub mod error;
pub mod params;
pub mod range;
pub mod result;
pub mod verify;

pub use calculator::CalculatorKind;
pub use error::{CalcError, CalcResult};
pub use params::{ParamValue, Parameters};
pub use result::{CalculatorResult, SafetyWarning, WarningCategory, WarningLevel};

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use age::AgeBand;
    use audit::{AuditRecord, SessionId};
    use range::ParameterRange;

    // ── CalculatorKind ───────────────────────────────────────────────────────

    #[test]
    fn calculator_kind_keys_round_trip_through_from_str() {
        for kind in CalculatorKind::ALL {
            let parsed: CalculatorKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn calculator_kind_registry_has_nineteen_unique_keys() {
        let keys: std::collections::HashSet<&str> =
            CalculatorKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 19);
        assert!(keys.contains("chads2-vasc"));
        assert!(keys.contains("glasgow-coma-scale"));
    }

    #[test]
    fn unknown_calculator_key_is_rejected() {
        match "apgar".parse::<CalculatorKind>() {
            Err(CalcError::UnknownCalculator { name }) => assert_eq!(name, "apgar"),
            other => panic!("expected UnknownCalculator, got {:?}", other),
        }
    }

    #[test]
    fn calculator_kind_serializes_as_registry_key() {
        let json = serde_json::to_string(&CalculatorKind::QtcCorrection).unwrap();
        assert_eq!(json, "\"qtc-correction\"");
        let decoded: CalculatorKind = serde_json::from_str("\"anion-gap\"").unwrap();
        assert_eq!(decoded, CalculatorKind::AnionGap);
    }

    #[test]
    fn only_dosing_calculators_are_flagged_as_dosing() {
        let dosing: Vec<_> = CalculatorKind::ALL.iter().filter(|k| k.is_dosing()).collect();
        assert_eq!(
            dosing,
            vec![&CalculatorKind::PediatricDosingWeight, &CalculatorKind::ParklandFormula]
        );
    }

    // ── Parameters ───────────────────────────────────────────────────────────

    #[test]
    fn parameters_from_json_keeps_scalar_types() {
        let params = Parameters::from_json(json!({
            "weight": 70,
            "sex": "female",
            "diabetes": true
        }))
        .unwrap();

        assert_eq!(params.number("weight"), Some(70.0));
        assert_eq!(params.text("sex"), Some("female"));
        assert!(params.flag("diabetes"));
        assert!(!params.flag("hypertension"));
        assert_eq!(params.number("sex"), None);
    }

    #[test]
    fn parameters_from_json_rejects_nested_values() {
        let result = Parameters::from_json(json!({ "weight": { "value": 70 } }));
        assert!(matches!(result, Err(CalcError::InvalidParameters { .. })));

        let result = Parameters::from_json(json!([1, 2, 3]));
        assert!(matches!(result, Err(CalcError::InvalidParameters { .. })));
    }

    #[test]
    fn param_value_parses_cli_tokens() {
        assert_eq!(ParamValue::parse_token("true"), ParamValue::Bool(true));
        assert_eq!(ParamValue::parse_token("72.5"), ParamValue::Number(72.5));
        assert_eq!(ParamValue::parse_token("-3"), ParamValue::Number(-3.0));
        assert_eq!(ParamValue::parse_token("male"), ParamValue::Text("male".to_string()));
        assert_eq!(ParamValue::parse_token("NaN"), ParamValue::Text("NaN".to_string()));
    }

    #[test]
    fn parameters_to_json_mirrors_contents() {
        let params = Parameters::new()
            .with("weight", 70.0)
            .with("sex", "male")
            .with("dialysis", false);
        assert_eq!(
            params.to_json(),
            json!({ "weight": 70.0, "sex": "male", "dialysis": false })
        );
    }

    // ── Results and warnings ─────────────────────────────────────────────────

    #[test]
    fn critical_advisory_serializes_as_error_level() {
        let warning = SafetyWarning::critical("dose exceeds ceiling")
            .with_category(WarningCategory::Overdose);
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["category"], "overdose");
    }

    #[test]
    fn result_merge_warnings_leaves_numeric_fields_untouched() {
        let mut result = CalculatorResult::new(22.86, "weight / height^2", "Quetelet 1832")
            .with_unit("kg/m²")
            .with_interpretation("Normal weight")
            .with_note("note")
            .with_warning(SafetyWarning::warning("formula"));

        result.merge_warnings([SafetyWarning::info("scanner")], [SafetyWarning::info("advisor")]);

        assert_eq!(result.value(), 22.86);
        assert_eq!(result.unit(), Some("kg/m²"));
        assert_eq!(result.interpretation(), Some("Normal weight"));
        assert_eq!(result.notes(), &["note".to_string()]);
        let order: Vec<&str> = result.warnings().iter().map(|w| w.message.as_str()).collect();
        assert_eq!(order, vec!["scanner", "formula", "advisor"]);
        assert!(!result.has_critical_advisory());
    }

    // ── Ranges and bands ─────────────────────────────────────────────────────

    #[test]
    fn parameter_range_well_formedness() {
        let good = ParameterRange {
            min: 0.5,
            max: 500.0,
            unit: "kg",
            warn_min: Some(2.0),
            warn_max: Some(200.0),
        };
        assert!(good.is_well_formed());

        let bad = ParameterRange { warn_max: Some(600.0), ..good };
        assert!(!bad.is_well_formed());
    }

    #[test]
    fn age_bands_are_ordered_youngest_first() {
        assert!(AgeBand::Neonate < AgeBand::Infant);
        assert!(AgeBand::Adolescent < AgeBand::Adult);
        assert_eq!(AgeBand::Infant.age_range(), "29 days - 1 year");
    }

    // ── Audit records ────────────────────────────────────────────────────────

    #[test]
    fn audit_record_serializes_camel_case_and_skips_absent_fields() {
        let record = AuditRecord {
            timestamp: chrono::Utc::now(),
            calculator_type: "bmi".to_string(),
            inputs: Parameters::new().with("weight", 70.0),
            output: Some(22.9),
            session_id: Some(SessionId("s-1".to_string())),
            error: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["calculatorType"], "bmi");
        assert_eq!(json["sessionId"], "s-1");
        assert!(json.get("error").is_none());
        assert!(record.succeeded());
        assert_eq!(record.kind(), Some(CalculatorKind::Bmi));
    }

    #[test]
    fn audit_record_keeps_unregistered_calculator_key() {
        let record = AuditRecord {
            timestamp: chrono::Utc::now(),
            calculator_type: "apgar".to_string(),
            inputs: Parameters::new(),
            output: None,
            session_id: None,
            error: Some("unknown calculator type 'apgar'".to_string()),
        };
        assert_eq!(record.kind(), None);
        assert!(!record.succeeded());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["calculatorType"], "apgar");
    }

    #[test]
    fn session_id_new_produces_unique_values() {
        let ids: std::collections::HashSet<String> =
            (0..50).map(|_| SessionId::new().0).collect();
        assert_eq!(ids.len(), 50);
    }

    // ── CalcError display messages ───────────────────────────────────────────

    #[test]
    fn error_display_messages_carry_context() {
        let err = CalcError::validation("Weight value 600 kg is outside the acceptable range");
        assert!(err.to_string().contains("validation error"));
        assert!(err.to_string().contains("600 kg"));

        let err = CalcError::domain("Cockcroft-Gault is validated only for adults");
        assert!(err.to_string().starts_with("domain error"));

        let err = CalcError::UnknownCalculator { name: "apgar".to_string() };
        assert!(err.to_string().contains("'apgar'"));

        let err = CalcError::AuditWriteFailed { reason: "lock poisoned".to_string() };
        assert!(err.to_string().contains("audit write failed"));
    }
}
