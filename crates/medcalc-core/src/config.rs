//! Runtime configuration loaded from TOML.
//!
//! The built-in defaults live in `config/default.toml` and are embedded at
//! compile time. A host-supplied file uses the same layout; sections it
//! leaves out take the built-in values.
//!
//! ```toml
//! [audit]
//! capacity = 500
//!
//! [[drug_limits]]
//! name = "cefazolin"
//! max_mg_per_kg = 50.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use medcalc_contracts::error::{CalcError, CalcResult};
use medcalc_safety::{DrugLimit, DrugLimitTable};

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Default audit log capacity when none is configured.
pub const DEFAULT_AUDIT_CAPACITY: usize = 1000;

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub audit: AuditSettings,
    /// Extra per-drug ceilings merged over the built-in table.
    #[serde(default)]
    pub drug_limits: Vec<DrugLimit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSettings {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_AUDIT_CAPACITY
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self { capacity: DEFAULT_AUDIT_CAPACITY }
    }
}

impl CalculatorConfig {
    /// The configuration shipped with the crate.
    pub fn builtin() -> CalcResult<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Parse and validate a configuration document.
    ///
    /// Returns `CalcError::ConfigError` on malformed TOML, a zero audit
    /// capacity or an invalid drug limit entry.
    pub fn from_toml_str(s: &str) -> CalcResult<Self> {
        let config: CalculatorConfig = toml::from_str(s).map_err(|e| CalcError::ConfigError {
            reason: format!("failed to parse calculator config TOML: {}", e),
        })?;
        config.validate()?;
        debug!(
            audit_capacity = config.audit.capacity,
            extra_drug_limits = config.drug_limits.len(),
            "calculator config loaded"
        );
        Ok(config)
    }

    /// Read the file at `path` and parse it as a configuration document.
    pub fn from_file(path: &Path) -> CalcResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CalcError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> CalcResult<()> {
        if self.audit.capacity == 0 {
            return Err(CalcError::ConfigError {
                reason: "audit capacity must be at least 1".to_string(),
            });
        }
        // Reuse the table's own entry checks.
        DrugLimitTable::from_limits(self.drug_limits.clone())?;
        Ok(())
    }

    /// The built-in drug table with this configuration's entries merged in.
    pub fn drug_limit_table(&self) -> CalcResult<DrugLimitTable> {
        let mut table = DrugLimitTable::builtin();
        table.merge(self.drug_limits.iter().cloned())?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_matches_defaults() {
        let config = CalculatorConfig::builtin().unwrap();
        assert_eq!(config, CalculatorConfig::default());
        assert_eq!(config.audit.capacity, DEFAULT_AUDIT_CAPACITY);
    }

    #[test]
    fn empty_document_takes_defaults() {
        assert_eq!(CalculatorConfig::from_toml_str("").unwrap(), CalculatorConfig::default());
    }

    #[test]
    fn drug_limits_merge_over_builtin_table() {
        let config = CalculatorConfig::from_toml_str(
            r#"
            [audit]
            capacity = 5

            [[drug_limits]]
            name = "acetaminophen"
            aliases = ["paracetamol"]
            max_mg_per_kg = 12.5

            [[drug_limits]]
            name = "cefazolin"
            max_mg_per_kg = 50.0
            "#,
        )
        .unwrap();
        assert_eq!(config.audit.capacity, 5);

        let table = config.drug_limit_table().unwrap();
        assert_eq!(table.lookup("paracetamol").unwrap().max_mg_per_kg, 12.5);
        assert_eq!(table.lookup("cefazolin").unwrap().max_mg_per_kg, 50.0);
        assert!(table.lookup("ibuprofen").is_some());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        match CalculatorConfig::from_toml_str("[audit]\ncapacity = 0\n") {
            Err(CalcError::ConfigError { reason }) => assert!(reason.contains("capacity"), "{reason}"),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn invalid_drug_limit_is_rejected() {
        let toml = r#"
            [[drug_limits]]
            name = "mystery"
            max_mg_per_kg = -1.0
        "#;
        assert!(matches!(
            CalculatorConfig::from_toml_str(toml),
            Err(CalcError::ConfigError { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        match CalculatorConfig::from_file(Path::new("/nonexistent/medcalc.toml")) {
            Err(CalcError::ConfigError { reason }) => assert!(reason.contains("failed to read"), "{reason}"),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
