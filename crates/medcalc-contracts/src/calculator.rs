//! The closed set of calculator kinds.
//!
//! Every calculator the runtime knows about is a variant of `CalculatorKind`.
//! Dispatch elsewhere in the workspace is an exhaustive `match` over this
//! enum, so adding a calculator is a compile error until every dispatch site
//! handles it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// Identifier for one registered clinical calculator.
///
/// Serialized as its stable registry key (e.g. `"creatinine-clearance"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CalculatorKind {
    Bmi,
    Bsa,
    Ibw,
    Cha2ds2Vasc,
    HasBled,
    CreatinineClearance,
    Mdrd,
    CkdEpi,
    PediatricDosingWeight,
    Sofa,
    Qsofa,
    Wells,
    Curb65,
    ChildPugh,
    Meld,
    AnionGap,
    QtcCorrection,
    GlasgowComaScale,
    ParklandFormula,
}

impl CalculatorKind {
    /// Every registered calculator, in registry order.
    pub const ALL: [CalculatorKind; 19] = [
        CalculatorKind::Bmi,
        CalculatorKind::Bsa,
        CalculatorKind::Ibw,
        CalculatorKind::Cha2ds2Vasc,
        CalculatorKind::HasBled,
        CalculatorKind::CreatinineClearance,
        CalculatorKind::Mdrd,
        CalculatorKind::CkdEpi,
        CalculatorKind::PediatricDosingWeight,
        CalculatorKind::Sofa,
        CalculatorKind::Qsofa,
        CalculatorKind::Wells,
        CalculatorKind::Curb65,
        CalculatorKind::ChildPugh,
        CalculatorKind::Meld,
        CalculatorKind::AnionGap,
        CalculatorKind::QtcCorrection,
        CalculatorKind::GlasgowComaScale,
        CalculatorKind::ParklandFormula,
    ];

    /// The stable registry key for this calculator.
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorKind::Bmi => "bmi",
            CalculatorKind::Bsa => "bsa",
            CalculatorKind::Ibw => "ibw",
            CalculatorKind::Cha2ds2Vasc => "chads2-vasc",
            CalculatorKind::HasBled => "has-bled",
            CalculatorKind::CreatinineClearance => "creatinine-clearance",
            CalculatorKind::Mdrd => "mdrd",
            CalculatorKind::CkdEpi => "ckd-epi",
            CalculatorKind::PediatricDosingWeight => "pediatric-dosing-weight",
            CalculatorKind::Sofa => "sofa",
            CalculatorKind::Qsofa => "qsofa",
            CalculatorKind::Wells => "wells",
            CalculatorKind::Curb65 => "curb65",
            CalculatorKind::ChildPugh => "child-pugh",
            CalculatorKind::Meld => "meld",
            CalculatorKind::AnionGap => "anion-gap",
            CalculatorKind::QtcCorrection => "qtc-correction",
            CalculatorKind::GlasgowComaScale => "glasgow-coma-scale",
            CalculatorKind::ParklandFormula => "parkland-formula",
        }
    }

    /// True for calculators whose output is a dose or a volume to administer.
    ///
    /// Dosing calculators carry the extended safety disclaimer.
    pub fn is_dosing(&self) -> bool {
        matches!(
            self,
            CalculatorKind::PediatricDosingWeight | CalculatorKind::ParklandFormula
        )
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculatorKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalculatorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CalcError::UnknownCalculator { name: s.to_string() })
    }
}

impl TryFrom<String> for CalculatorKind {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalculatorKind> for String {
    fn from(kind: CalculatorKind) -> Self {
        kind.as_str().to_string()
    }
}
