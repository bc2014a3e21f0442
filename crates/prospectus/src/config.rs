//! YAML configuration for the prospectus CLI.
//!
//! ```yaml
//! active_scenario: base
//! drivers:
//!   training: 60
//!   consulting: 140
//! sensitivity_range: 25
//! assumptions:
//!   interest_rate: 0.0875
//! report:
//!   property_appraisal: 875000
//! ```
//!
//! Every field is optional. Driver entries override individual drivers of the
//! active scenario; they are clamped to the driver's range like slider input.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use prospectus_core::report::ReportOptions;
use prospectus_core::state::ModelState;
use prospectus_core::{DriverKey, PriceAssumptions, ScenarioName};
use serde::{Deserialize, Serialize};

/// Allowed band for the default sweep range, in percent
pub const SENSITIVITY_RANGE_BOUNDS: (f64, f64) = (10.0, 50.0);

/// Error types for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Serialize(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub active_scenario: ScenarioName,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub drivers: HashMap<DriverKey, f64>,
    pub sensitivity_range: f64,
    pub assumptions: PriceAssumptions,
    pub report: ReportOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            active_scenario: ScenarioName::Base,
            drivers: HashMap::new(),
            sensitivity_range: prospectus_core::analysis::DEFAULT_SWEEP_RANGE,
            assumptions: PriceAssumptions::default(),
            report: ReportOptions::default(),
        }
    }
}

impl AppConfig {
    /// Get the default config path (~/.prospectus/config.yaml)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".prospectus")
            .join("config.yaml")
    }

    /// Load and validate a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to nothing; treat it as all defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_saphyr::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_saphyr::to_string(self)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize config: {}", e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.assumptions
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        validate_sensitivity_range(self.sensitivity_range)?;
        // Driver overrides go through the same checks as interactive edits
        self.model_state().map(|_| ())
    }

    /// Live model state: the active preset with driver overrides applied
    pub fn model_state(&self) -> Result<ModelState, ConfigError> {
        let mut state = ModelState::from_scenario(self.active_scenario, self.assumptions);
        // Canonical order keeps the result independent of map iteration order
        for key in DriverKey::ALL {
            if let Some(&value) = self.drivers.get(&key) {
                state
                    .set_driver(key, value)
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            }
        }
        Ok(state)
    }
}

pub fn validate_sensitivity_range(range: f64) -> Result<(), ConfigError> {
    let (min, max) = SENSITIVITY_RANGE_BOUNDS;
    if range.is_finite() && (min..=max).contains(&range) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "sensitivity_range must be between {min} and {max} percent (got {range})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospectus_core::state::ActiveScenario;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model_state().unwrap(), ModelState::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "active_scenario: stretch\nassumptions:\n  interest_rate: 0.0875\n";
        let config = AppConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.active_scenario, ScenarioName::Stretch);
        assert_eq!(config.assumptions.interest_rate, 0.0875);
        assert_eq!(config.assumptions.loan_principal, 640_000.0);
        assert_eq!(config.sensitivity_range, 20.0);
    }

    #[test]
    fn test_driver_overrides_apply_on_top_of_scenario() {
        let yaml = "active_scenario: floor\ndrivers:\n  training: 62\n  retail: 9\n";
        let config = AppConfig::from_yaml(yaml).unwrap();
        let state = config.model_state().unwrap();

        assert_eq!(state.active, ActiveScenario::Custom);
        assert_eq!(state.drivers.training_seats, 60.0);
        assert_eq!(state.drivers.retail_locations, 5.0);
        assert_eq!(
            state.drivers.consulting_hours,
            ScenarioName::Floor.drivers().consulting_hours
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let negative = "drivers:\n  maintenance: -5\n";
        assert!(matches!(
            AppConfig::from_yaml(negative),
            Err(ConfigError::Invalid(_))
        ));

        let range = "sensitivity_range: 75\n";
        assert!(matches!(
            AppConfig::from_yaml(range),
            Err(ConfigError::Invalid(_))
        ));

        let rate = "assumptions:\n  variable_cost_rate: 1.2\n";
        assert!(matches!(
            AppConfig::from_yaml(rate),
            Err(ConfigError::Invalid(_))
        ));

        assert!(matches!(
            AppConfig::from_yaml("active_scenario: [1, 2]\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = AppConfig::default();
        config.drivers.insert(DriverKey::Affiliate, 20.0);
        config.report.property_appraisal = 900_000.0;

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, config.to_yaml().unwrap()).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }
}
