//! Business drivers: the independent inputs of the projection model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Valid input band for a driver or lever, used for clamping slider input
/// and perturbed sweep values. The engine itself does not enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl DriverRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamp `value` into `[min, max]`, then snap it to the nearest multiple of `step`.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        if self.step > 0.0 {
            (clamped / self.step).round() * self.step
        } else {
            clamped
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Identifies one of the six business drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKey {
    /// Training seats sold per quarter
    Training,
    /// Retrofit projects per year
    Retrofit,
    /// Active retail locations
    Retail,
    /// Consulting hours sold per month
    Consulting,
    /// Active maintenance contracts
    Maintenance,
    /// Active affiliate partnerships
    Affiliate,
}

impl DriverKey {
    pub const ALL: [DriverKey; 6] = [
        DriverKey::Training,
        DriverKey::Retrofit,
        DriverKey::Retail,
        DriverKey::Consulting,
        DriverKey::Maintenance,
        DriverKey::Affiliate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DriverKey::Training => "training",
            DriverKey::Retrofit => "retrofit",
            DriverKey::Retail => "retail",
            DriverKey::Consulting => "consulting",
            DriverKey::Maintenance => "maintenance",
            DriverKey::Affiliate => "affiliate",
        }
    }

    /// Row label used in tables and the scenario report
    pub fn label(&self) -> &'static str {
        match self {
            DriverKey::Training => "Training Seats per Quarter",
            DriverKey::Retrofit => "Retrofit Projects per Year",
            DriverKey::Retail => "Retail Locations",
            DriverKey::Consulting => "Consulting Hours per Month",
            DriverKey::Maintenance => "Maintenance Contracts",
            DriverKey::Affiliate => "Affiliate Partnerships",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            DriverKey::Training => "seats/quarter",
            DriverKey::Retrofit => "projects/year",
            DriverKey::Retail => "locations",
            DriverKey::Consulting => "hours/month",
            DriverKey::Maintenance => "contracts",
            DriverKey::Affiliate => "partnerships",
        }
    }

    /// Slider range for this driver
    pub fn range(&self) -> DriverRange {
        match self {
            DriverKey::Training => DriverRange::new(10.0, 100.0, 5.0),
            DriverKey::Retrofit => DriverRange::new(5.0, 60.0, 5.0),
            DriverKey::Retail => DriverRange::new(1.0, 5.0, 1.0),
            DriverKey::Consulting => DriverRange::new(40.0, 240.0, 10.0),
            DriverKey::Maintenance => DriverRange::new(5.0, 50.0, 5.0),
            DriverKey::Affiliate => DriverRange::new(5.0, 30.0, 5.0),
        }
    }
}

impl fmt::Display for DriverKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DriverKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown driver '{s}'"))
    }
}

/// The six driver quantities fed into the projection engine.
///
/// Values are counts but stored as `f64` so sweeps can carry perturbed
/// values without conversion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSet {
    pub training_seats: f64,
    pub retrofit_projects: f64,
    pub retail_locations: f64,
    pub consulting_hours: f64,
    pub maintenance_contracts: f64,
    pub affiliate_deals: f64,
}

impl DriverSet {
    pub const fn new(
        training_seats: f64,
        retrofit_projects: f64,
        retail_locations: f64,
        consulting_hours: f64,
        maintenance_contracts: f64,
        affiliate_deals: f64,
    ) -> Self {
        Self {
            training_seats,
            retrofit_projects,
            retail_locations,
            consulting_hours,
            maintenance_contracts,
            affiliate_deals,
        }
    }

    pub fn get(&self, key: DriverKey) -> f64 {
        match key {
            DriverKey::Training => self.training_seats,
            DriverKey::Retrofit => self.retrofit_projects,
            DriverKey::Retail => self.retail_locations,
            DriverKey::Consulting => self.consulting_hours,
            DriverKey::Maintenance => self.maintenance_contracts,
            DriverKey::Affiliate => self.affiliate_deals,
        }
    }

    pub fn set(&mut self, key: DriverKey, value: f64) {
        let slot = match key {
            DriverKey::Training => &mut self.training_seats,
            DriverKey::Retrofit => &mut self.retrofit_projects,
            DriverKey::Retail => &mut self.retail_locations,
            DriverKey::Consulting => &mut self.consulting_hours,
            DriverKey::Maintenance => &mut self.maintenance_contracts,
            DriverKey::Affiliate => &mut self.affiliate_deals,
        };
        *slot = value;
    }

    /// Copy of this set with a single driver replaced
    #[must_use]
    pub fn with(mut self, key: DriverKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Iterate `(key, value)` pairs in canonical driver order
    pub fn iter(&self) -> impl Iterator<Item = (DriverKey, f64)> + '_ {
        DriverKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    /// Reject negative or non-finite driver values
    pub fn validate(&self) -> Result<(), InputError> {
        for (key, value) in self.iter() {
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
        }
        Ok(())
    }

    /// Copy with every negative or non-finite driver replaced by zero
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut out = *self;
        for (key, value) in self.iter() {
            if !value.is_finite() || value < 0.0 {
                out.set(key, 0.0);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_clamps_then_rounds_to_step() {
        let range = DriverKey::Training.range();
        assert_eq!(range.snap(52.4), 50.0);
        assert_eq!(range.snap(52.6), 55.0);
        assert_eq!(range.snap(3.0), 10.0);
        assert_eq!(range.snap(250.0), 100.0);
    }

    #[test]
    fn test_key_round_trips_through_str() {
        for key in DriverKey::ALL {
            assert_eq!(key.as_str().parse::<DriverKey>(), Ok(key));
        }
        assert!("seats".parse::<DriverKey>().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let negative = DriverSet::default().with(DriverKey::Retail, -1.0);
        assert_eq!(
            negative.validate(),
            Err(InputError::NegativeValue {
                field: "retail",
                value: -1.0
            })
        );

        let nan = DriverSet::default().with(DriverKey::Consulting, f64::NAN);
        assert_eq!(
            nan.validate(),
            Err(InputError::NonFiniteValue {
                field: "consulting"
            })
        );

        assert!(DriverSet::default().validate().is_ok());
    }

    #[test]
    fn test_sanitized_zeroes_invalid_values_only() {
        let drivers = DriverSet::new(50.0, -3.0, 2.0, f64::INFINITY, 25.0, f64::NAN);
        let clean = drivers.sanitized();
        assert_eq!(clean, DriverSet::new(50.0, 0.0, 2.0, 0.0, 25.0, 0.0));
    }

    #[test]
    fn test_with_replaces_single_driver() {
        let base = DriverSet::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let changed = base.with(DriverKey::Maintenance, 40.0);
        assert_eq!(changed.maintenance_contracts, 40.0);
        assert_eq!(changed.training_seats, 1.0);
        assert_eq!(changed.affiliate_deals, 6.0);
        assert_eq!(base.maintenance_contracts, 5.0);
    }
}
