//! Per-calculator parameter catalog.
//!
//! Each calculator declares its inputs once. The declaration drives both
//! the human-readable listing and the JSON Schema a dispatch server
//! advertises for the calculator.

use serde_json::{json, Map, Value};

use medcalc_contracts::calculator::CalculatorKind;

/// The type of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Number,
    Boolean,
    Text,
    Choice(&'static [&'static str]),
}

/// One declared parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn number(name: &'static str, description: &'static str) -> Self {
        Self { name, kind: ParamType::Number, required: true, description }
    }

    pub const fn optional_number(name: &'static str, description: &'static str) -> Self {
        Self { name, kind: ParamType::Number, required: false, description }
    }

    pub const fn flag(name: &'static str, description: &'static str) -> Self {
        Self { name, kind: ParamType::Boolean, required: false, description }
    }

    pub const fn optional_text(name: &'static str, description: &'static str) -> Self {
        Self { name, kind: ParamType::Text, required: false, description }
    }

    pub const fn choice(
        name: &'static str,
        options: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self { name, kind: ParamType::Choice(options), required: true, description }
    }

    pub const fn optional_choice(
        name: &'static str,
        options: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self { name, kind: ParamType::Choice(options), required: false, description }
    }

    fn schema(&self) -> Value {
        match self.kind {
            ParamType::Number => json!({ "type": "number", "description": self.description }),
            ParamType::Boolean => json!({ "type": "boolean", "description": self.description }),
            ParamType::Text => json!({ "type": "string", "description": self.description }),
            ParamType::Choice(options) => json!({
                "type": "string",
                "enum": options,
                "description": self.description
            }),
        }
    }
}

/// A registered calculator's public description.
#[derive(Debug)]
pub struct CalculatorSpec {
    pub kind: CalculatorKind,
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl CalculatorSpec {
    /// JSON Schema for this calculator's parameter bag.
    ///
    /// Unknown keys are permitted; the formulas ignore them.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "title": self.kind.as_str(),
            "description": self.description,
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.required)
    }
}

/// The catalog entry for `kind`.
pub fn spec(kind: CalculatorKind) -> &'static CalculatorSpec {
    use crate::{anthropometric, cardiac, critical_care, hepatic, metabolic, pediatric, pulmonary, renal};

    match kind {
        CalculatorKind::Bmi => &anthropometric::BMI_SPEC,
        CalculatorKind::Bsa => &anthropometric::BSA_SPEC,
        CalculatorKind::Ibw => &anthropometric::IBW_SPEC,
        CalculatorKind::Cha2ds2Vasc => &cardiac::CHA2DS2_VASC_SPEC,
        CalculatorKind::HasBled => &cardiac::HAS_BLED_SPEC,
        CalculatorKind::CreatinineClearance => &renal::CREATININE_CLEARANCE_SPEC,
        CalculatorKind::Mdrd => &renal::MDRD_SPEC,
        CalculatorKind::CkdEpi => &renal::CKD_EPI_SPEC,
        CalculatorKind::PediatricDosingWeight => &pediatric::PEDIATRIC_DOSING_SPEC,
        CalculatorKind::Sofa => &critical_care::SOFA_SPEC,
        CalculatorKind::Qsofa => &critical_care::QSOFA_SPEC,
        CalculatorKind::Wells => &pulmonary::WELLS_SPEC,
        CalculatorKind::Curb65 => &pulmonary::CURB65_SPEC,
        CalculatorKind::ChildPugh => &hepatic::CHILD_PUGH_SPEC,
        CalculatorKind::Meld => &hepatic::MELD_SPEC,
        CalculatorKind::AnionGap => &metabolic::ANION_GAP_SPEC,
        CalculatorKind::QtcCorrection => &cardiac::QTC_SPEC,
        CalculatorKind::GlasgowComaScale => &critical_care::GCS_SPEC,
        CalculatorKind::ParklandFormula => &critical_care::PARKLAND_SPEC,
    }
}

/// Every catalog entry, in registry order.
pub fn all() -> impl Iterator<Item = &'static CalculatorSpec> {
    CalculatorKind::ALL.into_iter().map(spec)
}
