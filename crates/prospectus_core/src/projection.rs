//! Projection engine: drivers in, income statement out.
//!
//! Every call is a closed-form evaluation with no retained state, so the
//! same inputs always produce a bit-identical [`FinancialResult`].

use crate::model::{DriverSet, FinancialResult, PriceAssumptions, RevenueByStream};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Project annual financials using the default [`PriceAssumptions`].
pub fn compute_financials(drivers: &DriverSet) -> FinancialResult {
    compute_financials_with(drivers, &PriceAssumptions::default())
}

/// Project annual financials for `drivers` under the given assumptions.
///
/// Negative or non-finite drivers are treated as zero. Ratios that divide
/// by revenue resolve to `0.0` when revenue is zero.
pub fn compute_financials_with(
    drivers: &DriverSet,
    assumptions: &PriceAssumptions,
) -> FinancialResult {
    let d = drivers.sanitized();
    let a = assumptions;

    let revenue_by_stream = RevenueByStream {
        training: d.training_seats * a.training_price_per_seat * a.training_cohorts_per_year,
        retrofit: d.retrofit_projects * a.retrofit_price_per_project,
        retail: d.retail_locations * a.retail_revenue_per_location,
        consulting: d.consulting_hours * a.consulting_hourly_rate * MONTHS_PER_YEAR,
        maintenance: d.maintenance_contracts * a.maintenance_monthly_fee * MONTHS_PER_YEAR,
        affiliate: d.affiliate_deals * a.affiliate_monthly_fee * MONTHS_PER_YEAR,
    };
    let revenue = revenue_by_stream.total();

    let cogs = revenue_by_stream.retrofit * a.retrofit_cogs_rate
        + revenue_by_stream.retail * a.retail_cogs_rate
        + revenue_by_stream.affiliate * a.affiliate_cogs_rate;
    let gross_profit = revenue - cogs;
    let gross_margin = percent_of_revenue(gross_profit, revenue);

    let fixed_costs = a.fixed_annual_cost;
    let variable_costs = revenue * a.variable_cost_rate;
    let total_expenses = fixed_costs + variable_costs + cogs;

    let noi = revenue - total_expenses;
    let debt_service = a.debt_service();
    let dscr = if debt_service > 0.0 {
        noi / debt_service
    } else {
        0.0
    };

    FinancialResult {
        revenue,
        revenue_by_stream,
        cogs,
        gross_profit,
        gross_margin,
        fixed_costs,
        variable_costs,
        total_expenses,
        noi,
        debt_service,
        dscr,
        break_even: break_even_revenue(fixed_costs + debt_service, variable_costs + cogs, revenue),
        net_margin: percent_of_revenue(noi, revenue),
    }
}

fn percent_of_revenue(amount: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        amount / revenue * 100.0
    } else {
        0.0
    }
}

/// Revenue needed to cover fixed costs and debt service at the current
/// contribution margin. Zero when undefined.
fn break_even_revenue(fixed_obligations: f64, scaling_costs: f64, revenue: f64) -> f64 {
    if revenue <= 0.0 {
        return 0.0;
    }
    let contribution_margin = 1.0 - scaling_costs / revenue;
    if contribution_margin <= 0.0 {
        return 0.0;
    }
    fixed_obligations / contribution_margin
}
