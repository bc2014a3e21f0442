//! Scenario comparison report in CSV form.
//!
//! Layout: a title line and `Generated:` line, then labeled sections. Each
//! table row reads `Label,Conservative,Base Case,Growth[,Unit/Description]`.
//! Dollar amounts carry two decimals, margins one decimal and a `%`, DSCR two
//! decimals and a `×`.

use std::io::Write;

use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::model::{DriverKey, FinancialResult, PriceAssumptions, RevenueStream};
use crate::scenarios::Scenario;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub title: String,
    pub property_appraisal: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "OverIT Financial Model - 455 Glen Iris Experience Center".to_string(),
            property_appraisal: 850_000.0,
        }
    }
}

/// Default export file name for a report generated on `date`
pub fn report_file_name(date: Date) -> String {
    format!("OverIT_Financial_Scenarios_{date}.csv")
}

/// Render the report to a string
pub fn scenario_report(
    scenarios: &[Scenario; 3],
    assumptions: &PriceAssumptions,
    options: &ReportOptions,
    generated: DateTime,
) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    write_scenario_report(&mut buf, scenarios, assumptions, options, generated)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the report for the three scenarios (Conservative, Base, Growth order).
pub fn write_scenario_report<W: Write>(
    out: &mut W,
    scenarios: &[Scenario; 3],
    assumptions: &PriceAssumptions,
    options: &ReportOptions,
    generated: DateTime,
) -> Result<(), ReportError> {
    let sections = [
        vec![
            vec![options.title.clone()],
            vec![format!("Generated: {}", generated.strftime("%Y-%m-%d %H:%M:%S"))],
        ],
        scenario_assumptions(scenarios),
        revenue_breakdown(scenarios, assumptions),
        profitability(scenarios),
        debt_service(scenarios, assumptions),
        key_assumptions(assumptions, options),
        notes(scenarios, assumptions, options),
    ];

    let last = sections.len() - 1;
    for (i, rows) in sections.into_iter().enumerate() {
        {
            let mut wtr = csv::WriterBuilder::new()
                .flexible(true)
                .has_headers(false)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(&mut *out);
            for row in &rows {
                wtr.write_record(row)?;
            }
            wtr.flush()?;
        }
        if i != last {
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn header(first: &str, trailing: &str) -> Vec<String> {
    [first, "Conservative", "Base Case", "Growth", trailing]
        .map(str::to_string)
        .to_vec()
}

/// Row with one formatted cell per scenario plus a trailing description
fn row(
    label: &str,
    scenarios: &[Scenario; 3],
    cell: impl Fn(&Scenario) -> String,
    trailing: &str,
) -> Vec<String> {
    let mut out = vec![label.to_string()];
    out.extend(scenarios.iter().map(cell));
    out.push(trailing.to_string());
    out
}

fn money_row(
    label: &str,
    scenarios: &[Scenario; 3],
    field: impl Fn(&FinancialResult) -> f64,
    trailing: &str,
) -> Vec<String> {
    row(label, scenarios, |s| format_money(field(&s.result)), trailing)
}

fn percent_row(
    label: &str,
    scenarios: &[Scenario; 3],
    field: impl Fn(&FinancialResult) -> f64,
    trailing: &str,
) -> Vec<String> {
    row(label, scenarios, |s| format!("{:.1}%", field(&s.result)), trailing)
}

fn scenario_assumptions(scenarios: &[Scenario; 3]) -> Vec<Vec<String>> {
    let mut rows = vec![
        vec!["SCENARIO ASSUMPTIONS".to_string()],
        header("Revenue Driver", "Unit"),
    ];
    for key in DriverKey::ALL {
        rows.push(row(
            key.label(),
            scenarios,
            |s| format_plain(s.drivers.get(key)),
            key.unit(),
        ));
    }
    rows
}

fn revenue_breakdown(scenarios: &[Scenario; 3], a: &PriceAssumptions) -> Vec<Vec<String>> {
    let mut rows = vec![
        vec!["REVENUE BREAKDOWN".to_string()],
        header("Revenue Stream", "Description"),
    ];
    for stream in RevenueStream::ALL {
        let description = match stream {
            RevenueStream::Training => format!(
                "UniFi certification programs at ${} per seat",
                format_plain(a.training_price_per_seat)
            ),
            RevenueStream::Retrofit => format!(
                "Network infrastructure upgrades at ${} per project",
                format_plain(a.retrofit_price_per_project)
            ),
            RevenueStream::Retail => format!(
                "Direct equipment sales at ${} per location annually",
                format_plain(a.retail_revenue_per_location)
            ),
            RevenueStream::Consulting => format!(
                "Technical advisory at ${} per hour",
                format_plain(a.consulting_hourly_rate)
            ),
            RevenueStream::Maintenance => format!(
                "Ongoing support at ${} per month per contract",
                format_plain(a.maintenance_monthly_fee)
            ),
            RevenueStream::Affiliate => format!(
                "Vendor partnerships at ${} per month per deal",
                format_plain(a.affiliate_monthly_fee)
            ),
        };
        rows.push(money_row(
            stream.label(),
            scenarios,
            |r| r.revenue_by_stream.get(stream),
            &description,
        ));
    }
    rows.push(money_row(
        "Total Revenue",
        scenarios,
        |r| r.revenue,
        "Sum of all revenue streams",
    ));
    rows
}

fn profitability(scenarios: &[Scenario; 3]) -> Vec<Vec<String>> {
    vec![
        vec!["PROFITABILITY METRICS".to_string()],
        header("Metric", "Formula"),
        money_row(
            "Cost of Goods Sold (COGS)",
            scenarios,
            |r| r.cogs,
            "Direct costs to deliver products/services",
        ),
        money_row("Gross Profit", scenarios, |r| r.gross_profit, "Revenue - COGS"),
        percent_row(
            "Gross Margin",
            scenarios,
            |r| r.gross_margin,
            "(Gross Profit / Revenue) × 100",
        ),
        money_row(
            "Fixed Operating Costs",
            scenarios,
            |r| r.fixed_costs,
            "Rent + salaries + insurance + utilities",
        ),
        money_row(
            "Variable Operating Costs",
            scenarios,
            |r| r.variable_costs,
            "Marketing + commissions + variable overhead",
        ),
        money_row(
            "Total Operating Expenses",
            scenarios,
            |r| r.total_expenses,
            "COGS + Fixed + Variable costs",
        ),
        money_row(
            "Net Operating Income (NOI)",
            scenarios,
            |r| r.noi,
            "Revenue - Total Operating Expenses",
        ),
        percent_row("Net Margin", scenarios, |r| r.net_margin, "(NOI / Revenue) × 100"),
    ]
}

fn debt_service(scenarios: &[Scenario; 3], a: &PriceAssumptions) -> Vec<Vec<String>> {
    vec![
        vec!["DEBT SERVICE & COVERAGE".to_string()],
        header("Metric", "Description"),
        money_row(
            "Annual Debt Service",
            scenarios,
            |r| r.debt_service,
            &format!(
                "Annual loan payment on ${} at {}% interest",
                format_plain(a.loan_principal),
                format_rate(a.interest_rate)
            ),
        ),
        row(
            "Debt Service Coverage Ratio (DSCR)",
            scenarios,
            |s| format!("{:.2}×", s.result.dscr),
            "NOI ÷ Annual Debt Service (lenders require 1.25× minimum)",
        ),
        money_row(
            "Break-Even Revenue",
            scenarios,
            |r| r.break_even,
            "Minimum revenue to cover all costs and debt",
        ),
        money_row(
            "Revenue Above Break-Even",
            scenarios,
            FinancialResult::revenue_above_break_even,
            "Safety margin above break-even point",
        ),
    ]
}

fn key_assumptions(a: &PriceAssumptions, options: &ReportOptions) -> Vec<Vec<String>> {
    let money = |v: f64| format!("${}", format_plain(v));
    let rate = |v: f64| format!("{}%", format_rate(v));
    let entries = [
        ("Training Price per Seat", money(a.training_price_per_seat), "4-week UniFi certification program"),
        ("Training Cohorts per Year", format_plain(a.training_cohorts_per_year), "Quarterly training schedule"),
        ("Retrofit Project Average", money(a.retrofit_price_per_project), "Complete network infrastructure upgrade"),
        ("Retail Revenue per Location", money(a.retail_revenue_per_location), "Annual equipment sales per location"),
        ("Consulting Hourly Rate", money(a.consulting_hourly_rate), "Technical advisory and design services"),
        ("Maintenance Contract Monthly", money(a.maintenance_monthly_fee), "Ongoing support per contract"),
        ("Affiliate Partnership Monthly", money(a.affiliate_monthly_fee), "Commission per active vendor deal"),
        ("Retrofit COGS %", rate(a.retrofit_cogs_rate), "Materials and labor cost percentage"),
        ("Retail COGS %", rate(a.retail_cogs_rate), "Equipment cost percentage"),
        ("Affiliate COGS %", rate(a.affiliate_cogs_rate), "Platform and support costs"),
        ("Variable Costs %", rate(a.variable_cost_rate), "Percentage of revenue"),
        ("Annual Fixed Costs", money(a.fixed_annual_cost), "Rent + salaries + overhead"),
        ("Loan Amount", money(a.loan_principal), "SBA 7(a) acquisition loan"),
        ("Interest Rate", rate(a.interest_rate), "Annual interest rate"),
        ("Property Appraisal", money(options.property_appraisal), "Professional appraisal value"),
    ];

    let mut rows = vec![
        vec!["KEY ASSUMPTIONS".to_string()],
        ["Category", "Rate/Amount", "Description"]
            .map(str::to_string)
            .to_vec(),
    ];
    rows.extend(
        entries
            .into_iter()
            .map(|(label, value, description)| vec![label.to_string(), value, description.to_string()]),
    );
    rows
}

fn notes(
    scenarios: &[Scenario; 3],
    a: &PriceAssumptions,
    options: &ReportOptions,
) -> Vec<Vec<String>> {
    let coverage = if scenarios.iter().all(|s| s.result.meets_lender_minimum()) {
        "DSCR exceeds lender requirements across all scenarios demonstrating strong loan capacity."
    } else {
        "DSCR falls below the 1.25× lender minimum in at least one scenario."
    };
    let cushion = (options.property_appraisal - a.loan_principal) / a.loan_principal * 100.0;

    let mut rows = vec![vec!["NOTES".to_string()]];
    for line in [
        "This financial model represents conservative projections based on market research and comparable businesses.".to_string(),
        "All revenue streams have been validated through customer discovery and market analysis.".to_string(),
        "The 77% cost advantage vs traditional solutions creates significant competitive moat.".to_string(),
        coverage.to_string(),
        format!(
            "Property appraisal of ${} provides {cushion:.0}% equity cushion above the loan amount.",
            format_plain(options.property_appraisal)
        ),
    ] {
        rows.push(vec![line]);
    }
    rows
}

fn format_money(value: f64) -> String {
    format!("${value:.2}")
}

/// Shortest decimal form: `3500`, not `3500.0`
fn format_plain(value: f64) -> String {
    format!("{value}")
}

/// Fraction as a percentage with float noise removed: `0.095` -> `9.5`
fn format_rate(rate: f64) -> String {
    format_plain((rate * 100.0 * 1e6).round() / 1e6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_money(1_393_600.0), "$1393600.00");
        assert_eq!(format_money(-180_000.0), "$-180000.00");
        assert_eq!(format_plain(3_500.0), "3500");
        assert_eq!(format_rate(0.095), "9.5");
        assert_eq!(format_rate(0.35), "35");
    }

    #[test]
    fn test_report_file_name() {
        let date = jiff::civil::date(2026, 10, 17);
        assert_eq!(
            report_file_name(date),
            "OverIT_Financial_Scenarios_2026-10-17.csv"
        );
    }
}
