//! Canonical planning scenarios: Conservative (floor), Base and Growth (stretch).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{DriverSet, FinancialResult, PriceAssumptions};
use crate::projection::compute_financials_with;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioName {
    Floor,
    Base,
    Stretch,
}

impl ScenarioName {
    /// Report column order
    pub const ALL: [ScenarioName; 3] = [ScenarioName::Floor, ScenarioName::Base, ScenarioName::Stretch];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioName::Floor => "floor",
            ScenarioName::Base => "base",
            ScenarioName::Stretch => "stretch",
        }
    }

    /// Display label used for columns and tabs
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioName::Floor => "Conservative",
            ScenarioName::Base => "Base Case",
            ScenarioName::Stretch => "Growth",
        }
    }

    /// The fixed driver preset for this scenario
    pub const fn drivers(&self) -> DriverSet {
        match self {
            ScenarioName::Floor => DriverSet::new(30.0, 20.0, 1.0, 80.0, 15.0, 10.0),
            ScenarioName::Base => DriverSet::new(50.0, 30.0, 2.0, 120.0, 25.0, 15.0),
            ScenarioName::Stretch => DriverSet::new(75.0, 45.0, 3.0, 180.0, 40.0, 25.0),
        }
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor" | "conservative" => Ok(ScenarioName::Floor),
            "base" => Ok(ScenarioName::Base),
            "stretch" | "growth" => Ok(ScenarioName::Stretch),
            other => Err(format!(
                "unknown scenario '{other}' (expected floor, base or stretch)"
            )),
        }
    }
}

/// A named preset bound to its projected financials
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: ScenarioName,
    pub drivers: DriverSet,
    pub result: FinancialResult,
}

impl Scenario {
    /// Evaluate the preset under the default assumptions
    pub fn new(name: ScenarioName) -> Self {
        Self::with_assumptions(name, &PriceAssumptions::default())
    }

    pub fn with_assumptions(name: ScenarioName, assumptions: &PriceAssumptions) -> Self {
        let drivers = name.drivers();
        Self {
            name,
            drivers,
            result: compute_financials_with(&drivers, assumptions),
        }
    }

    /// All three scenarios in report order
    pub fn all(assumptions: &PriceAssumptions) -> [Scenario; 3] {
        ScenarioName::ALL.map(|name| Scenario::with_assumptions(name, assumptions))
    }
}

/// Projected financials for a named preset under the default assumptions
pub fn get_scenario_result(name: ScenarioName) -> FinancialResult {
    Scenario::new(name).result
}
