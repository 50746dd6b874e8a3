//! The loosely-typed parameter bag callers hand to the orchestrator.
//!
//! Parameters arrive as a string-keyed map of heterogeneous scalars. The
//! bag is owned by exactly one invocation and discarded after the audit log
//! records its sanitized copy. Formulas never read the bag directly; they
//! deserialize it into a typed record first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CalcError, CalcResult};

/// A single scalar parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Parse a command-line style token: `true`/`false`, then a number,
    /// otherwise the raw text.
    pub fn parse_token(raw: &str) -> Self {
        match raw {
            "true" => ParamValue::Bool(true),
            "false" => ParamValue::Bool(false),
            _ => raw
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(ParamValue::Number)
                .unwrap_or_else(|| ParamValue::Text(raw.to_string())),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// An ordered mapping from parameter name to scalar value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, ParamValue>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from a JSON object.
    ///
    /// Returns `InvalidParameters` when `value` is not an object or holds a
    /// non-scalar member (arrays, nested objects, `null`).
    pub fn from_json(value: Value) -> CalcResult<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value).map_err(|e| {
                CalcError::invalid_parameters(format!(
                    "parameters must be scalar numbers, strings or booleans: {e}"
                ))
            }),
            other => Err(CalcError::invalid_parameters(format!(
                "parameters must be a JSON object, got {other}"
            ))),
        }
    }

    /// Render the bag as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| {
                    let json = match v {
                        ParamValue::Bool(b) => Value::Bool(*b),
                        ParamValue::Number(n) => serde_json::Number::from_f64(*n)
                            .map(Value::Number)
                            .unwrap_or(Value::Null),
                        ParamValue::Text(s) => Value::String(s.clone()),
                    };
                    (k.clone(), json)
                })
                .collect(),
        )
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert, handy in tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// The value at `key` if it is numeric.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key) {
            Some(ParamValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// The value at `key` if it is a boolean; absent or non-boolean is `false`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(ParamValue::Bool(true)))
    }

    /// The value at `key` if it is text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ParamValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Iterate over every numeric parameter.
    pub fn numbers(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().filter_map(|(k, v)| match v {
            ParamValue::Number(n) => Some((k.as_str(), *n)),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|k, _| keep(k));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
