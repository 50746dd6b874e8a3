//! # medcalc-safety
//!
//! Input validation and advisory layers for the clinical calculator runtime.
//!
//! ## Overview
//!
//! - [`range`]: hard and typical bounds for governed physiological
//!   quantities.
//! - [`extreme`]: the negative-value guard and the cross-parameter
//!   extreme-value sweep that run before any formula.
//! - [`pediatric`]: life-stage classification and weight plausibility.
//! - [`advisors`]: contraindication, overdose and pregnancy advisories
//!   appended to successful results.
//! - [`drug_limits`]: the TOML-loaded per-drug dose ceilings the overdose
//!   advisor consults.
//!
//! Nothing in this crate performs I/O. Host configuration files are read by
//! `medcalc-core` and merged in through `DrugLimitTable::merge`.

pub mod advisors;
pub mod drug_limits;
pub mod extreme;
pub mod pediatric;
pub mod range;

pub use drug_limits::{DrugLimit, DrugLimitTable};
pub use extreme::{ExtremeFinding, FindingSeverity};
