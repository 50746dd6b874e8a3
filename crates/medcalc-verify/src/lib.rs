//! # medcalc-verify
//!
//! Parameter verification for the calculator runtime.
//!
//! [`engine::SchemaParameterVerifier`] implements
//! [`medcalc_core::traits::ParameterVerifier`]. It validates a parameter bag
//! against the calculator's JSON Schema, then runs any cross-field rules
//! registered for that calculator.
//!
//! ```rust,ignore
//! use medcalc_verify::SchemaParameterVerifier;
//!
//! let verifier = SchemaParameterVerifier::with_clinical_rules();
//! let report = verifier.verify(&params, &medcalc_formulas::input_schema(kind))?;
//! ```

pub mod engine;

pub use engine::SchemaParameterVerifier;
