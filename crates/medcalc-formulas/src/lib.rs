//! # medcalc-formulas
//!
//! The formula registry: one pure function per calculator, reached through
//! a single exhaustive dispatch over [`CalculatorKind`].
//!
//! Each function deserializes the parameter bag into its own typed record,
//! calls the range validator for every governed quantity it reads, and
//! returns a [`CalculatorResult`] with value, unit, interpretation, formula
//! text, citation, notes and any formula-level warnings. Formulas never
//! clamp an out-of-domain input; they return `CalcError::Domain`.
//!
//! ## Modules
//!
//! - [`anthropometric`]: BMI, BSA, IBW
//! - [`cardiac`]: CHA₂DS₂-VASc, HAS-BLED, QTc
//! - [`renal`]: Cockcroft-Gault, MDRD, CKD-EPI
//! - [`critical_care`]: SOFA, qSOFA, GCS, Parkland
//! - [`pulmonary`]: Wells, CURB-65
//! - [`hepatic`]: Child-Pugh, MELD
//! - [`metabolic`]: anion gap
//! - [`pediatric`]: weight-based dosing
//! - [`catalog`]: declared parameters and JSON Schema per calculator

pub mod anthropometric;
pub mod cardiac;
pub mod catalog;
pub mod critical_care;
pub mod hepatic;
pub mod input;
pub mod metabolic;
pub mod pediatric;
pub mod pulmonary;
pub mod renal;

use serde_json::Value;
use tracing::debug;

use medcalc_contracts::{
    calculator::CalculatorKind, error::CalcResult, params::Parameters, result::CalculatorResult,
};

pub use catalog::{CalculatorSpec, ParamSpec, ParamType};

/// Run the formula for `kind` over `params`.
pub fn compute(kind: CalculatorKind, params: &Parameters) -> CalcResult<CalculatorResult> {
    debug!(calculator = %kind, params = params.len(), "computing formula");

    match kind {
        CalculatorKind::Bmi => anthropometric::bmi(params),
        CalculatorKind::Bsa => anthropometric::bsa(params),
        CalculatorKind::Ibw => anthropometric::ibw(params),
        CalculatorKind::Cha2ds2Vasc => cardiac::cha2ds2_vasc(params),
        CalculatorKind::HasBled => cardiac::has_bled(params),
        CalculatorKind::CreatinineClearance => renal::creatinine_clearance(params),
        CalculatorKind::Mdrd => renal::mdrd(params),
        CalculatorKind::CkdEpi => renal::ckd_epi(params),
        CalculatorKind::PediatricDosingWeight => pediatric::pediatric_dosing(params),
        CalculatorKind::Sofa => critical_care::sofa(params),
        CalculatorKind::Qsofa => critical_care::qsofa(params),
        CalculatorKind::Wells => pulmonary::wells(params),
        CalculatorKind::Curb65 => pulmonary::curb65(params),
        CalculatorKind::ChildPugh => hepatic::child_pugh(params),
        CalculatorKind::Meld => hepatic::meld(params),
        CalculatorKind::AnionGap => metabolic::anion_gap(params),
        CalculatorKind::QtcCorrection => cardiac::qtc(params),
        CalculatorKind::GlasgowComaScale => critical_care::glasgow_coma_scale(params),
        CalculatorKind::ParklandFormula => critical_care::parkland(params),
    }
}

/// Catalog entry for `kind`.
pub fn spec(kind: CalculatorKind) -> &'static CalculatorSpec {
    catalog::spec(kind)
}

/// JSON Schema for `kind`'s parameter bag.
pub fn input_schema(kind: CalculatorKind) -> Value {
    catalog::spec(kind).input_schema()
}

pub fn all_specs() -> impl Iterator<Item = &'static CalculatorSpec> {
    catalog::all()
}

#[cfg(test)]
pub(crate) mod test_support {
    use medcalc_contracts::params::Parameters;

    pub fn params(value: serde_json::Value) -> Parameters {
        Parameters::from_json(value).unwrap()
    }

    pub fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }
}
