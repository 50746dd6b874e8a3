//! Parsing of command-line parameters and JSON-lines batch files.

use serde::Deserialize;
use serde_json::Value;

use medcalc_contracts::{
    audit::SessionId,
    error::{CalcError, CalcResult},
    params::{ParamValue, Parameters},
};
use medcalc_core::report::format_value;
use medcalc_core::CalculationReport;

/// Parse `key=value` tokens into a parameter bag.
///
/// Values go through `ParamValue::parse_token`. A later duplicate key wins.
pub fn parse_assignments<S: AsRef<str>>(tokens: &[S]) -> CalcResult<Parameters> {
    let mut params = Parameters::new();
    for token in tokens {
        let token = token.as_ref();
        match token.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                params.insert(key.trim(), ParamValue::parse_token(value.trim()));
            }
            _ => {
                return Err(CalcError::invalid_parameters(format!(
                    "expected key=value, got '{token}'"
                )))
            }
        }
    }
    Ok(params)
}

/// One line of a batch file.
#[derive(Debug)]
pub struct BatchRequest {
    pub calculator: String,
    pub parameters: Parameters,
    pub session: Option<SessionId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchLine {
    calculator: String,
    #[serde(default)]
    parameters: Option<Value>,
    #[serde(default)]
    session_id: Option<String>,
}

/// Parse a JSON-lines document.
///
/// Blank lines and lines starting with `#` are skipped. Each remaining line
/// yields its 1-based line number and either a request or the parse error.
pub fn parse_batch(text: &str) -> Vec<(usize, CalcResult<BatchRequest>)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| (idx + 1, parse_line(line)))
        .collect()
}

fn parse_line(line: &str) -> CalcResult<BatchRequest> {
    let parsed: BatchLine = serde_json::from_str(line).map_err(|e| {
        CalcError::invalid_parameters(format!("malformed batch line: {e}"))
    })?;
    let parameters = match parsed.parameters {
        Some(value) => Parameters::from_json(value)?,
        None => Parameters::new(),
    };
    Ok(BatchRequest {
        calculator: parsed.calculator,
        parameters,
        session: parsed.session_id.map(SessionId),
    })
}

/// One-line outcome of a batch invocation.
pub fn summary_line(
    line: usize,
    calculator: &str,
    outcome: &CalcResult<CalculationReport>,
) -> String {
    match outcome {
        Ok(report) => {
            let result = report.result();
            let value = match result.unit() {
                Some(unit) => format!("{} {}", format_value(result.value()), unit),
                None => format_value(result.value()),
            };
            let mut line = format!("line {line}: {calculator} = {value}");
            if !result.warnings().is_empty() {
                line.push_str(&format!(" [{} warning(s)]", result.warnings().len()));
            }
            if result.has_critical_advisory() {
                line.push_str(" CRITICAL");
            }
            line
        }
        Err(e) => format!("line {line}: {calculator} failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_parse_typed_values() {
        let params =
            parse_assignments(&["weight=70", "height=1.75", "heightUnit=m", "female=true"]).unwrap();
        assert_eq!(params.number("weight"), Some(70.0));
        assert_eq!(params.number("height"), Some(1.75));
        assert_eq!(params.text("heightUnit"), Some("m"));
        assert!(params.flag("female"));
    }

    #[test]
    fn assignment_without_equals_is_rejected() {
        match parse_assignments(&["weight"]) {
            Err(CalcError::InvalidParameters { reason }) => assert!(reason.contains("key=value")),
            other => panic!("expected InvalidParameters, got {:?}", other),
        }
        assert!(parse_assignments(&["=70"]).is_err());
    }

    #[test]
    fn dosing_example_tokens_satisfy_the_calculator() {
        let params = parse_assignments(&["weight=20", "age=6", "dosePerKg=15"]).unwrap();
        let result = medcalc_formulas::compute(
            medcalc_contracts::calculator::CalculatorKind::PediatricDosingWeight,
            &params,
        )
        .unwrap();
        assert_eq!(result.value(), 300.0);
    }

    #[test]
    fn batch_skips_blank_and_comment_lines() {
        let text = "\n# warm-up\n{\"calculator\":\"bmi\",\"parameters\":{\"weight\":70,\"height\":175}}\n\n\
                    {\"calculator\":\"gcs\",\"parameters\":{},\"sessionId\":\"s-1\"}\n";
        let lines = parse_batch(text);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, 3);
        assert_eq!(lines[1].0, 5);

        let first = lines[0].1.as_ref().unwrap();
        assert_eq!(first.calculator, "bmi");
        assert_eq!(first.parameters.number("height"), Some(175.0));
        assert!(first.session.is_none());

        let second = lines[1].1.as_ref().unwrap();
        assert_eq!(second.session, Some(SessionId("s-1".to_string())));
    }

    #[test]
    fn malformed_batch_line_is_reported_not_fatal() {
        let lines = parse_batch("not json\n{\"calculator\":\"bmi\",\"parameters\":{\"weight\":[1]}}\n");
        assert_eq!(lines.len(), 2);
        assert!(matches!(lines[0].1, Err(CalcError::InvalidParameters { .. })));
        assert!(matches!(lines[1].1, Err(CalcError::InvalidParameters { .. })));
    }

    #[test]
    fn missing_parameters_default_to_empty_bag() {
        let lines = parse_batch("{\"calculator\":\"qsofa\"}");
        assert!(lines[0].1.as_ref().unwrap().parameters.is_empty());
    }

    #[test]
    fn failed_outcome_summary_names_the_error() {
        let outcome: CalcResult<CalculationReport> = Err(CalcError::validation("weight must be positive"));
        let line = summary_line(4, "bmi", &outcome);
        assert_eq!(line, "line 4: bmi failed: validation error: weight must be positive");
    }
}
