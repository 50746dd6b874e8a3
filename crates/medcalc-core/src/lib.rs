//! # medcalc-core
//!
//! The calculator runtime: seams, orchestration, reports and configuration.
//!
//! This crate provides:
//! - The two seam traits (`AuditSink`, `ParameterVerifier`)
//! - The `Orchestrator` that runs guard, scanner, verifier, formula and
//!   advisors in order and audits every invocation
//! - `CalculationReport` with its mandatory disclaimer and text rendering
//! - `CalculatorConfig`, loaded from TOML
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medcalc_core::{Orchestrator, CalculatorConfig};
//!
//! let config = CalculatorConfig::builtin()?;
//! let orchestrator = Orchestrator::with_config(Box::new(audit), Box::new(verifier), &config)?;
//! let report = orchestrator.invoke("bmi", params, None)?;
//! println!("{}", report.render());
//! ```

pub mod config;
pub mod orchestrator;
pub mod report;
pub mod sanitize;
pub mod traits;

pub use config::CalculatorConfig;
pub use orchestrator::Orchestrator;
pub use report::CalculationReport;
