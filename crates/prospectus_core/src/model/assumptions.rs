//! Pricing, cost and financing constants the projection engine closes over.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Fixed model assumptions.
///
/// Defaults reproduce the published SBA 7(a) prospectus: $3,500 training
/// seats over four cohorts, $12,000 retrofits, $180,000 per retail location,
/// $150/hr consulting, $1,200/mo maintenance, $800/mo affiliate deals, and a
/// $640,000 loan at 9.5%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceAssumptions {
    pub training_price_per_seat: f64,
    pub training_cohorts_per_year: f64,
    pub retrofit_price_per_project: f64,
    pub retail_revenue_per_location: f64,
    pub consulting_hourly_rate: f64,
    pub maintenance_monthly_fee: f64,
    pub affiliate_monthly_fee: f64,

    pub retrofit_cogs_rate: f64,
    pub retail_cogs_rate: f64,
    pub affiliate_cogs_rate: f64,

    pub fixed_annual_cost: f64,
    /// Variable operating cost as a fraction of total revenue
    pub variable_cost_rate: f64,

    pub loan_principal: f64,
    pub interest_rate: f64,
}

impl Default for PriceAssumptions {
    fn default() -> Self {
        Self {
            training_price_per_seat: 3_500.0,
            training_cohorts_per_year: 4.0,
            retrofit_price_per_project: 12_000.0,
            retail_revenue_per_location: 180_000.0,
            consulting_hourly_rate: 150.0,
            maintenance_monthly_fee: 1_200.0,
            affiliate_monthly_fee: 800.0,
            retrofit_cogs_rate: 0.35,
            retail_cogs_rate: 0.45,
            affiliate_cogs_rate: 0.15,
            fixed_annual_cost: 180_000.0,
            variable_cost_rate: 0.12,
            loan_principal: 640_000.0,
            interest_rate: 0.095,
        }
    }
}

impl PriceAssumptions {
    /// Annual debt service: interest-only payment on the loan principal
    pub fn debt_service(&self) -> f64 {
        self.loan_principal * self.interest_rate
    }

    pub fn validate(&self) -> Result<(), InputError> {
        let amounts = [
            ("training_price_per_seat", self.training_price_per_seat),
            ("training_cohorts_per_year", self.training_cohorts_per_year),
            ("retrofit_price_per_project", self.retrofit_price_per_project),
            ("retail_revenue_per_location", self.retail_revenue_per_location),
            ("consulting_hourly_rate", self.consulting_hourly_rate),
            ("maintenance_monthly_fee", self.maintenance_monthly_fee),
            ("affiliate_monthly_fee", self.affiliate_monthly_fee),
            ("fixed_annual_cost", self.fixed_annual_cost),
        ];
        for (field, value) in amounts {
            check_finite(field, value)?;
            if value < 0.0 {
                return Err(InputError::NegativeValue { field, value });
            }
        }

        let rates = [
            ("retrofit_cogs_rate", self.retrofit_cogs_rate),
            ("retail_cogs_rate", self.retail_cogs_rate),
            ("affiliate_cogs_rate", self.affiliate_cogs_rate),
            ("variable_cost_rate", self.variable_cost_rate),
        ];
        for (field, value) in rates {
            check_finite(field, value)?;
            if !(0.0..=1.0).contains(&value) {
                return Err(InputError::RateOutOfRange { field, value });
            }
        }

        // Debt service must stay positive so DSCR is always defined
        for (field, value) in [
            ("loan_principal", self.loan_principal),
            ("interest_rate", self.interest_rate),
        ] {
            check_finite(field, value)?;
            if value <= 0.0 {
                return Err(InputError::NonPositive { field, value });
            }
        }

        Ok(())
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NonFiniteValue { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_debt_service() {
        let assumptions = PriceAssumptions::default();
        assert!((assumptions.debt_service() - 60_800.0).abs() < 1e-6);
        assert!(assumptions.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_rates_and_zero_loan() {
        let rate = PriceAssumptions {
            retail_cogs_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            rate.validate(),
            Err(InputError::RateOutOfRange {
                field: "retail_cogs_rate",
                ..
            })
        ));

        let loan = PriceAssumptions {
            loan_principal: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            loan.validate(),
            Err(InputError::NonPositive {
                field: "loan_principal",
                ..
            })
        ));

        let price = PriceAssumptions {
            consulting_hourly_rate: -150.0,
            ..Default::default()
        };
        assert!(matches!(
            price.validate(),
            Err(InputError::NegativeValue {
                field: "consulting_hourly_rate",
                ..
            })
        ));
    }
}
