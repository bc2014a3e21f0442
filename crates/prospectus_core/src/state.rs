//! Live model state owned by the calling UI layer.
//!
//! The engine never sees this type; callers pass `drivers` and `assumptions`
//! into [`compute_financials_with`] explicitly.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::model::{DriverKey, DriverSet, FinancialResult, PriceAssumptions};
use crate::projection::compute_financials_with;
use crate::scenarios::ScenarioName;

/// Which preset the live drivers came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveScenario {
    Preset(ScenarioName),
    /// At least one driver was edited after the last preset was applied
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    pub active: ActiveScenario,
    pub drivers: DriverSet,
    pub assumptions: PriceAssumptions,
}

impl Default for ModelState {
    fn default() -> Self {
        Self::from_scenario(ScenarioName::Base, PriceAssumptions::default())
    }
}

impl ModelState {
    pub fn from_scenario(name: ScenarioName, assumptions: PriceAssumptions) -> Self {
        Self {
            active: ActiveScenario::Preset(name),
            drivers: name.drivers(),
            assumptions,
        }
    }

    /// Replace every live driver with the preset's values
    pub fn apply_scenario(&mut self, name: ScenarioName) {
        self.drivers = name.drivers();
        self.active = ActiveScenario::Preset(name);
    }

    /// Set one driver from user input.
    ///
    /// The value is clamped to the driver's range and snapped to its step.
    /// Returns the value actually stored.
    pub fn set_driver(&mut self, key: DriverKey, value: f64) -> Result<f64, InputError> {
        if !value.is_finite() {
            return Err(InputError::NonFiniteValue {
                field: key.as_str(),
            });
        }
        if value < 0.0 {
            return Err(InputError::NegativeValue {
                field: key.as_str(),
                value,
            });
        }
        let snapped = key.range().snap(value);
        self.drivers.set(key, snapped);
        self.active = ActiveScenario::Custom;
        Ok(snapped)
    }

    pub fn financials(&self) -> FinancialResult {
        compute_financials_with(&self.drivers, &self.assumptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_scenario_overwrites_every_driver() {
        let mut state = ModelState::default();
        for key in DriverKey::ALL {
            state.drivers.set(key, 999.0);
        }

        state.apply_scenario(ScenarioName::Floor);

        assert_eq!(state.drivers, ScenarioName::Floor.drivers());
        assert_eq!(state.active, ActiveScenario::Preset(ScenarioName::Floor));
        for (_, value) in state.drivers.iter() {
            assert_ne!(value, 999.0);
        }
    }

    #[test]
    fn test_set_driver_snaps_and_marks_custom() {
        let mut state = ModelState::default();
        let stored = state.set_driver(DriverKey::Consulting, 137.0).unwrap();
        assert_eq!(stored, 140.0);
        assert_eq!(state.drivers.consulting_hours, 140.0);
        assert_eq!(state.active, ActiveScenario::Custom);

        let stored = state.set_driver(DriverKey::Retail, 12.0).unwrap();
        assert_eq!(stored, 5.0);
    }

    #[test]
    fn test_set_driver_rejects_negative() {
        let mut state = ModelState::default();
        let before = state.clone();
        assert!(state.set_driver(DriverKey::Training, -5.0).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_financials_follow_live_drivers() {
        let mut state = ModelState::default();
        let base = state.financials();
        state.apply_scenario(ScenarioName::Stretch);
        assert!(state.financials().revenue > base.revenue);
    }
}
