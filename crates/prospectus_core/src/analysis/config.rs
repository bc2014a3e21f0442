//! Configuration types for sensitivity sweeps and tornado ranking.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::model::{DriverKey, DriverRange, DriverSet, PriceAssumptions};
use crate::scenarios::ScenarioName;

/// Default number of points in a sweep
pub const DEFAULT_SWEEP_STEPS: usize = 11;
/// Default sweep band, in percent either side of the base value
pub const DEFAULT_SWEEP_RANGE: f64 = 20.0;

/// Everything the engine needs for one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelInputs {
    pub drivers: DriverSet,
    pub assumptions: PriceAssumptions,
}

impl ModelInputs {
    pub fn new(drivers: DriverSet, assumptions: PriceAssumptions) -> Self {
        Self {
            drivers,
            assumptions,
        }
    }

    /// Inputs for a preset scenario
    pub fn scenario(name: ScenarioName, assumptions: PriceAssumptions) -> Self {
        Self::new(name.drivers(), assumptions)
    }
}

/// A lever the sensitivity analysis can move: one of the six drivers or
/// one of the two headline prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKey {
    Training,
    Retrofit,
    Retail,
    Consulting,
    Maintenance,
    Affiliate,
    TrainingPrice,
    RetrofitPrice,
}

impl VariableKey {
    pub const ALL: [VariableKey; 8] = [
        VariableKey::Training,
        VariableKey::Retrofit,
        VariableKey::Retail,
        VariableKey::Consulting,
        VariableKey::Maintenance,
        VariableKey::Affiliate,
        VariableKey::TrainingPrice,
        VariableKey::RetrofitPrice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKey::TrainingPrice => "training_price",
            VariableKey::RetrofitPrice => "retrofit_price",
            other => other.driver().map_or("", |key| key.as_str()),
        }
    }

    /// The driver this key moves, if it is not a price lever
    pub fn driver(&self) -> Option<DriverKey> {
        match self {
            VariableKey::Training => Some(DriverKey::Training),
            VariableKey::Retrofit => Some(DriverKey::Retrofit),
            VariableKey::Retail => Some(DriverKey::Retail),
            VariableKey::Consulting => Some(DriverKey::Consulting),
            VariableKey::Maintenance => Some(DriverKey::Maintenance),
            VariableKey::Affiliate => Some(DriverKey::Affiliate),
            VariableKey::TrainingPrice | VariableKey::RetrofitPrice => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VariableKey::Training => "Training Seats/Quarter",
            VariableKey::Retrofit => "Retrofit Projects/Year",
            VariableKey::Retail => "Retail Locations",
            VariableKey::Consulting => "Consulting Hours/Month",
            VariableKey::Maintenance => "Maintenance Contracts",
            VariableKey::Affiliate => "Affiliate Partnerships",
            VariableKey::TrainingPrice => "Avg Training Price",
            VariableKey::RetrofitPrice => "Avg Retrofit Price",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            VariableKey::Training => "seats",
            VariableKey::Retrofit => "projects",
            VariableKey::Retail => "locations",
            VariableKey::Consulting => "hours",
            VariableKey::Maintenance => "contracts",
            VariableKey::Affiliate => "partnerships",
            VariableKey::TrainingPrice | VariableKey::RetrofitPrice => "$",
        }
    }

    pub fn default_range(&self) -> DriverRange {
        match self {
            VariableKey::TrainingPrice => DriverRange::new(2_500.0, 5_000.0, 100.0),
            VariableKey::RetrofitPrice => DriverRange::new(8_000.0, 18_000.0, 500.0),
            other => other
                .driver()
                .map_or(DriverRange::new(0.0, 0.0, 1.0), |key| key.range()),
        }
    }

    /// Read this lever's current value from `inputs`
    pub fn value_in(&self, inputs: &ModelInputs) -> f64 {
        match self {
            VariableKey::TrainingPrice => inputs.assumptions.training_price_per_seat,
            VariableKey::RetrofitPrice => inputs.assumptions.retrofit_price_per_project,
            other => other
                .driver()
                .map_or(0.0, |key| inputs.drivers.get(key)),
        }
    }

    /// Copy of `inputs` with only this lever replaced
    #[must_use]
    pub fn substitute(&self, inputs: &ModelInputs, value: f64) -> ModelInputs {
        let mut out = *inputs;
        match self {
            VariableKey::TrainingPrice => out.assumptions.training_price_per_seat = value,
            VariableKey::RetrofitPrice => out.assumptions.retrofit_price_per_project = value,
            other => {
                if let Some(key) = other.driver() {
                    out.drivers.set(key, value);
                }
            }
        }
        out
    }
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        VariableKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = VariableKey::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown variable '{s}' (expected one of {})", known.join(", "))
            })
    }
}

/// A lever together with its base value and permitted band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityVariable {
    pub key: VariableKey,
    pub base: f64,
    pub range: DriverRange,
}

impl SensitivityVariable {
    /// Variable for `key` using its default range and the base value found in `inputs`
    pub fn from_inputs(key: VariableKey, inputs: &ModelInputs) -> Self {
        Self {
            key,
            base: key.value_in(inputs),
            range: key.default_range(),
        }
    }

    /// All eight levers, based on `inputs`
    pub fn defaults(inputs: &ModelInputs) -> Vec<SensitivityVariable> {
        VariableKey::ALL
            .into_iter()
            .map(|key| Self::from_inputs(key, inputs))
            .collect()
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let DriverRange { min, max, step } = self.range;
        let invalid = |reason| AnalysisError::InvalidVariable {
            key: self.key,
            reason,
        };
        if !(min.is_finite() && max.is_finite() && step.is_finite() && self.base.is_finite()) {
            return Err(invalid("bounds must be finite"));
        }
        if min > max {
            return Err(invalid("min exceeds max"));
        }
        if step <= 0.0 {
            return Err(invalid("step must be positive"));
        }
        Ok(())
    }
}
