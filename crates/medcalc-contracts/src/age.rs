//! Pediatric life-stage bands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of five life-stage bands partitioning the age axis.
///
/// Boundaries: 28 days (neonate/infant), then 1, 13 and 18 years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBand {
    Neonate,
    Infant,
    Child,
    Adolescent,
    Adult,
}

impl AgeBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBand::Neonate => "neonate",
            AgeBand::Infant => "infant",
            AgeBand::Child => "child",
            AgeBand::Adolescent => "adolescent",
            AgeBand::Adult => "adult",
        }
    }

    /// Textual age range covered by the band.
    pub fn age_range(&self) -> &'static str {
        match self {
            AgeBand::Neonate => "0-28 days",
            AgeBand::Infant => "29 days - 1 year",
            AgeBand::Child => "1-12 years",
            AgeBand::Adolescent => "13-17 years",
            AgeBand::Adult => "18+ years",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AgeBand::Neonate => "Newborn; immature hepatic and renal clearance",
            AgeBand::Infant => "Rapidly maturing organ function; weight-based dosing essential",
            AgeBand::Child => "Weight-based dosing; adult maximums may apply at higher weights",
            AgeBand::Adolescent => "Approaching adult pharmacokinetics; cap at adult doses",
            AgeBand::Adult => "Standard adult dosing applies",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
