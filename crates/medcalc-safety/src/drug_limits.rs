//! Per-drug dose ceilings, loaded from TOML.
//!
//! The built-in table is embedded at compile time. Hosts may merge
//! additional entries from their own configuration; an entry whose name
//! matches a built-in one replaces it.
//!
//! ```toml
//! [[drug_limits]]
//! name = "acetaminophen"
//! aliases = ["paracetamol"]
//! max_mg_per_kg = 15.0
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use medcalc_contracts::error::{CalcError, CalcResult};

const BUILTIN_DRUG_LIMITS: &str = include_str!("../data/drug_limits.toml");

/// Maximum single dose for one drug, in mg per kg of body weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugLimit {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub max_mg_per_kg: f64,
}

impl DrugLimit {
    fn matches(&self, normalized: &str) -> bool {
        self.name.eq_ignore_ascii_case(normalized)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(normalized))
    }
}

#[derive(Debug, Deserialize)]
struct DrugLimitDocument {
    #[serde(default)]
    drug_limits: Vec<DrugLimit>,
}

/// Lookup table used by the overdose advisor.
#[derive(Debug, Clone, Default)]
pub struct DrugLimitTable {
    limits: Vec<DrugLimit>,
}

impl DrugLimitTable {
    /// The table shipped with the crate.
    ///
    /// # Panics
    ///
    /// Panics if the embedded document is malformed, which the crate's tests
    /// rule out.
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_DRUG_LIMITS).expect("embedded drug limit table must parse")
    }

    /// Parse a `[[drug_limits]]` TOML document.
    ///
    /// Returns `CalcError::ConfigError` if the TOML is malformed or an entry
    /// has an empty name or a non-positive ceiling.
    pub fn from_toml_str(s: &str) -> CalcResult<Self> {
        let doc: DrugLimitDocument = toml::from_str(s).map_err(|e| CalcError::ConfigError {
            reason: format!("failed to parse drug limit TOML: {}", e),
        })?;
        Self::from_limits(doc.drug_limits)
    }

    /// Build a table from already-deserialized entries, validating each.
    pub fn from_limits(limits: Vec<DrugLimit>) -> CalcResult<Self> {
        for limit in &limits {
            validate_limit(limit)?;
        }
        Ok(Self { limits })
    }

    /// Merge `extra` over this table. Same-named entries are replaced.
    pub fn merge(&mut self, extra: impl IntoIterator<Item = DrugLimit>) -> CalcResult<()> {
        for limit in extra {
            validate_limit(&limit)?;
            match self
                .limits
                .iter_mut()
                .find(|existing| existing.name.eq_ignore_ascii_case(&limit.name))
            {
                Some(existing) => {
                    debug!(drug = %limit.name, max_mg_per_kg = limit.max_mg_per_kg, "replacing drug limit");
                    *existing = limit;
                }
                None => {
                    debug!(drug = %limit.name, max_mg_per_kg = limit.max_mg_per_kg, "adding drug limit");
                    self.limits.push(limit);
                }
            }
        }
        Ok(())
    }

    /// Find the entry for `drug`, matching name or alias case-insensitively.
    pub fn lookup(&self, drug: &str) -> Option<&DrugLimit> {
        let normalized = drug.trim();
        self.limits.iter().find(|limit| limit.matches(normalized))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrugLimit> {
        self.limits.iter()
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

fn validate_limit(limit: &DrugLimit) -> CalcResult<()> {
    if limit.name.trim().is_empty() {
        return Err(CalcError::ConfigError {
            reason: "drug limit entry has an empty name".to_string(),
        });
    }
    if !limit.max_mg_per_kg.is_finite() || limit.max_mg_per_kg <= 0.0 {
        return Err(CalcError::ConfigError {
            reason: format!(
                "drug limit for '{}' must be a positive number of mg/kg, got {}",
                limit.name, limit.max_mg_per_kg
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_parses_and_is_populated() {
        let table = DrugLimitTable::builtin();
        assert!(table.len() >= 10);
        assert!(table.iter().all(|l| l.max_mg_per_kg > 0.0));
    }

    #[test]
    fn lookup_matches_names_and_aliases_case_insensitively() {
        let table = DrugLimitTable::builtin();
        assert_eq!(table.lookup("Acetaminophen").unwrap().max_mg_per_kg, 15.0);
        assert_eq!(table.lookup(" paracetamol ").unwrap().name, "acetaminophen");
        assert!(table.lookup("unobtainium").is_none());
    }

    #[test]
    fn merge_replaces_and_appends() {
        let mut table = DrugLimitTable::builtin();
        let before = table.len();
        table
            .merge(vec![
                DrugLimit {
                    name: "IBUPROFEN".to_string(),
                    aliases: vec![],
                    max_mg_per_kg: 8.0,
                },
                DrugLimit {
                    name: "cefazolin".to_string(),
                    aliases: vec![],
                    max_mg_per_kg: 50.0,
                },
            ])
            .unwrap();

        assert_eq!(table.len(), before + 1);
        assert_eq!(table.lookup("ibuprofen").unwrap().max_mg_per_kg, 8.0);
        assert_eq!(table.lookup("cefazolin").unwrap().max_mg_per_kg, 50.0);
    }

    #[test]
    fn non_positive_ceiling_is_a_config_error() {
        let toml = r#"
            [[drug_limits]]
            name = "mystery"
            max_mg_per_kg = 0.0
        "#;
        match DrugLimitTable::from_toml_str(toml) {
            Err(CalcError::ConfigError { reason }) => assert!(reason.contains("mystery"), "{reason}"),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        match DrugLimitTable::from_toml_str("this is not valid toml ][[[") {
            Err(CalcError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse drug limit TOML"), "{reason}")
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn empty_document_yields_empty_table() {
        let table = DrugLimitTable::from_toml_str("").unwrap();
        assert!(table.is_empty());
    }
}
