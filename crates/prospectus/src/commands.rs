//! Command implementations. Each renders to a `String` so `main` only prints.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use jiff::civil::DateTime;
use prospectus_core::analysis::{
    ModelInputs, SensitivityPoint, SensitivityVariable, TornadoEntry, VariableKey, sweep, tornado,
};
use prospectus_core::report::{report_file_name, write_scenario_report};
use prospectus_core::state::{ActiveScenario, ModelState};
use prospectus_core::{
    DriverKey, FinancialResult, LENDER_MIN_DSCR, PriceAssumptions, RevenueStream, Scenario,
    ScenarioName,
};
use serde::Serialize;

use crate::config::AppConfig;
use crate::util::format::{
    format_compact_currency, format_currency, format_currency_short, format_percent, format_ratio,
    format_signed_percent,
};
use crate::util::io::atomic_write;

const LABEL_WIDTH: usize = 36;

fn scenario_label(active: ActiveScenario) -> &'static str {
    match active {
        ActiveScenario::Preset(name) => name.label(),
        ActiveScenario::Custom => "Custom",
    }
}

fn coverage_flag(result: &FinancialResult) -> &'static str {
    if result.meets_lender_minimum() {
        "meets lender minimum"
    } else {
        "BELOW lender minimum"
    }
}

fn to_json<T: Serialize>(value: &T) -> color_eyre::Result<String> {
    serde_json::to_string_pretty(value).wrap_err("Failed to serialize output")
}

#[derive(Serialize)]
struct ProjectionOutput<'a> {
    scenario: ActiveScenario,
    drivers: &'a prospectus_core::DriverSet,
    result: &'a FinancialResult,
}

/// Income statement for the live driver set
pub fn project(state: &ModelState, json: bool) -> color_eyre::Result<String> {
    let result = state.financials();
    tracing::debug!(noi = result.noi, dscr = result.dscr, "Projected live drivers");

    if json {
        return to_json(&ProjectionOutput {
            scenario: state.active,
            drivers: &state.drivers,
            result: &result,
        });
    }

    let mut out = String::new();
    writeln!(out, "Scenario: {}", scenario_label(state.active))?;
    writeln!(out)?;
    writeln!(out, "Drivers")?;
    for (key, value) in state.drivers.iter() {
        writeln!(out, "  {:<w$}{:>12} {}", key.label(), value, key.unit(), w = LABEL_WIDTH)?;
    }
    writeln!(out)?;
    writeln!(out, "Revenue")?;
    for (stream, amount) in result.revenue_by_stream.iter() {
        writeln!(out, "  {:<w$}{:>16}", stream.label(), format_currency(amount), w = LABEL_WIDTH)?;
    }
    let lines = [
        ("Total Revenue", format_currency(result.revenue)),
        ("Cost of Goods Sold", format_currency(result.cogs)),
        ("Gross Profit", format_currency(result.gross_profit)),
        ("Gross Margin", format_percent(result.gross_margin)),
        ("Fixed Operating Costs", format_currency(result.fixed_costs)),
        ("Variable Operating Costs", format_currency(result.variable_costs)),
        ("Total Operating Expenses", format_currency(result.total_expenses)),
        ("Net Operating Income", format_currency(result.noi)),
        ("Net Margin", format_percent(result.net_margin)),
        ("Annual Debt Service", format_currency(result.debt_service)),
        ("DSCR", format_ratio(result.dscr)),
        ("Break-Even Revenue", format_currency(result.break_even)),
        (
            "Revenue Above Break-Even",
            format_currency(result.revenue_above_break_even()),
        ),
    ];
    writeln!(out)?;
    for (label, value) in lines {
        writeln!(out, "  {:<w$}{:>16}", label, value, w = LABEL_WIDTH)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Coverage {} {} ({} required)",
        format_ratio(result.dscr),
        coverage_flag(&result),
        format_ratio(LENDER_MIN_DSCR)
    )?;
    Ok(out)
}

/// Conservative / Base / Growth side by side
pub fn scenarios(assumptions: &PriceAssumptions, json: bool) -> color_eyre::Result<String> {
    let all = Scenario::all(assumptions);
    if json {
        return to_json(&all);
    }

    let mut out = String::new();
    write!(out, "{:<w$}", "", w = LABEL_WIDTH)?;
    for scenario in &all {
        write!(out, "{:>16}", scenario.name.label())?;
    }
    writeln!(out)?;

    let mut line = |label: &str, cell: &dyn Fn(&Scenario) -> String| -> std::fmt::Result {
        write!(out, "{:<w$}", label, w = LABEL_WIDTH)?;
        for scenario in &all {
            write!(out, "{:>16}", cell(scenario))?;
        }
        writeln!(out)
    };

    for key in DriverKey::ALL {
        line(key.label(), &|s: &Scenario| s.drivers.get(key).to_string())?;
    }
    for stream in RevenueStream::ALL {
        line(stream.label(), &|s: &Scenario| {
            format_compact_currency(s.result.revenue_by_stream.get(stream))
        })?;
    }
    line("Total Revenue", &|s: &Scenario| format_compact_currency(s.result.revenue))?;
    line("Gross Margin", &|s: &Scenario| format_percent(s.result.gross_margin))?;
    line("NOI", &|s: &Scenario| format_compact_currency(s.result.noi))?;
    line("Net Margin", &|s: &Scenario| format_percent(s.result.net_margin))?;
    line("DSCR", &|s: &Scenario| format_ratio(s.result.dscr))?;
    line("Break-Even Revenue", &|s: &Scenario| {
        format_compact_currency(s.result.break_even)
    })?;
    Ok(out)
}

#[derive(Serialize)]
struct SweepOutput<'a> {
    variable: &'a SensitivityVariable,
    range_percent: f64,
    points: &'a [SensitivityPoint],
}

/// One-variable sweep around `base`, with worst and best case called out
pub fn sensitivity(
    base: &ModelInputs,
    key: VariableKey,
    range_percent: f64,
    steps: usize,
    json: bool,
) -> color_eyre::Result<String> {
    let variable = SensitivityVariable::from_inputs(key, base);
    let points = sweep(base, &variable, range_percent, steps)
        .wrap_err_with(|| format!("Sensitivity sweep for {key} failed"))?;
    tracing::debug!(%key, range_percent, steps, "Computed sensitivity sweep");

    if json {
        return to_json(&SweepOutput {
            variable: &variable,
            range_percent,
            points: &points,
        });
    }

    let (worst, best) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(eyre!("sweep produced no points")),
    };

    let mut out = String::new();
    writeln!(
        out,
        "Sensitivity: {} (base {} {}, range ±{}%)",
        key.label(),
        variable.base,
        key.unit(),
        range_percent
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{:>8}{:>10}{:>12}{:>12}{:>10}{:>11}{:>11}",
        "Change", "Value", "Revenue", "NOI", "DSCR", "ΔRevenue", "ΔNOI"
    )?;
    for point in &points {
        writeln!(
            out,
            "{:>8}{:>10}{:>12}{:>12}{:>10}{:>11}{:>11}",
            format!("{:+.0}%", point.offset_percent),
            point.value,
            format_compact_currency(point.revenue),
            format_compact_currency(point.noi),
            format_ratio(point.dscr),
            format_signed_percent(point.revenue_change_percent),
            format_signed_percent(point.noi_change_percent),
        )?;
    }
    writeln!(out)?;
    for (label, point) in [("Worst case", worst), ("Best case", best)] {
        writeln!(
            out,
            "{label} ({:+.0}%): NOI {}, DSCR {}",
            point.offset_percent,
            format_currency(point.noi),
            format_ratio(point.dscr)
        )?;
    }
    Ok(out)
}

/// Default levers ranked by NOI swing
pub fn tornado_ranking(base: &ModelInputs, json: bool) -> color_eyre::Result<String> {
    let variables = SensitivityVariable::defaults(base);
    let entries: Vec<TornadoEntry> =
        tornado(base, &variables).wrap_err("Tornado ranking failed")?;

    if json {
        return to_json(&entries);
    }

    let mut out = String::new();
    writeln!(
        out,
        "{:>4}  {:<26}{:>18}{:>14}{:>14}{:>10}{:>8}",
        "#", "Variable", "Range", "NOI Swing", "Avg NOI", "Avg DSCR", "Impact"
    )?;
    for (rank, entry) in entries.iter().enumerate() {
        let range = variables
            .iter()
            .find(|v| v.key == entry.key)
            .map(|v| format!("{}-{}", v.range.min, v.range.max))
            .unwrap_or_default();
        writeln!(
            out,
            "{:>4}  {:<26}{:>18}{:>14}{:>14}{:>10}{:>8}",
            rank + 1,
            entry.key.label(),
            range,
            format_currency_short(entry.swing),
            format_currency_short(entry.noi),
            format_ratio(entry.dscr),
            entry.impact.as_str(),
        )?;
    }
    Ok(out)
}

/// Write the three-scenario CSV report and return the path written.
///
/// Without `output`, the report lands in the current directory under its
/// dated default name.
pub fn export(
    config: &AppConfig,
    output: Option<&Path>,
    generated: DateTime,
) -> color_eyre::Result<PathBuf> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(report_file_name(generated.date())));

    let scenarios = Scenario::all(&config.assumptions);
    let mut buf = Vec::new();
    write_scenario_report(
        &mut buf,
        &scenarios,
        &config.assumptions,
        &config.report,
        generated,
    )
    .wrap_err("Failed to build scenario report")?;

    atomic_write(&path, &buf).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = buf.len(), "Exported scenario report");
    Ok(path)
}

/// Base inputs for sweep and tornado.
///
/// An explicit preset wins. Otherwise the configured model state is used,
/// the same starting point `project` uses.
pub fn analysis_base(
    config: &AppConfig,
    scenario: Option<ScenarioName>,
) -> color_eyre::Result<ModelInputs> {
    let state = match scenario {
        Some(name) => ModelState::from_scenario(name, config.assumptions),
        None => config.model_state()?,
    };
    Ok(ModelInputs::new(state.drivers, state.assumptions))
}

/// Effective configuration as YAML
pub fn show_config(config: &AppConfig) -> color_eyre::Result<String> {
    Ok(config.to_yaml()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn generated() -> DateTime {
        jiff::civil::date(2026, 10, 17).at(12, 0, 0, 0)
    }

    #[test]
    fn test_project_table_reports_base_case() {
        let out = project(&ModelState::default(), false).unwrap();
        assert!(out.starts_with("Scenario: Base Case"));
        assert!(out.contains("$2,140,000.00"));
        assert!(out.contains("$1,393,600.00"));
        assert!(out.contains("22.92×"));
        assert!(out.contains("meets lender minimum"));
    }

    #[test]
    fn test_project_json_has_result_fields() {
        let out = project(&ModelState::default(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["scenario"]["preset"], "base");
        assert!((value["result"]["debt_service"].as_f64().unwrap() - 60_800.0).abs() < 1e-6);
        assert_eq!(
            value["result"]["revenue_by_stream"]
                .as_object()
                .unwrap()
                .len(),
            6
        );
    }

    #[test]
    fn test_scenarios_table_has_three_columns() {
        let out = scenarios(&PriceAssumptions::default(), false).unwrap();
        let header = out.lines().next().unwrap();
        assert!(header.contains("Conservative"));
        assert!(header.contains("Base Case"));
        assert!(header.contains("Growth"));
        assert!(out.contains("$2.1M"));
    }

    #[test]
    fn test_sensitivity_calls_out_extremes() {
        let config = AppConfig::default();
        let base = analysis_base(&config, None).unwrap();
        let out = sensitivity(&base, VariableKey::Training, 20.0, 11, false).unwrap();
        assert!(out.contains("Worst case (-20%)"));
        assert!(out.contains("Best case (+20%)"));
        assert_eq!(out.lines().filter(|l| l.trim_end().ends_with('%')).count(), 11);
    }

    #[test]
    fn test_sensitivity_rejects_single_step() {
        let base = analysis_base(&AppConfig::default(), None).unwrap();
        assert!(sensitivity(&base, VariableKey::Retail, 20.0, 1, false).is_err());
        assert!(sensitivity(&base, VariableKey::Retail, 20.0, usize::MAX, false).is_err());
    }

    #[test]
    fn test_tornado_json_is_sorted() {
        let base = analysis_base(&AppConfig::default(), None).unwrap();
        let out = tornado_ranking(&base, true).unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(entries[0]["key"], "training");
        let swings: Vec<f64> = entries
            .iter()
            .map(|e| e["swing"].as_f64().unwrap())
            .collect();
        assert!(swings.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_tornado_table_shows_whole_dollar_swing() {
        let base = analysis_base(&AppConfig::default(), None).unwrap();
        let out = tornado_ranking(&base, false).unwrap();
        let top = out.lines().nth(1).unwrap();
        assert!(top.contains("Training Seats per Quarter"));
        assert!(top.contains("$1,108,800"));
        assert!(top.trim_end().ends_with("high"));
    }

    #[test]
    fn test_analysis_base_follows_configured_state() {
        let yaml = "active_scenario: stretch\ndrivers:\n  retail: 4\n";
        let config = AppConfig::from_yaml(yaml).unwrap();

        let base = analysis_base(&config, None).unwrap();
        let stretch = ScenarioName::Stretch.drivers();
        assert_eq!(base.drivers.training_seats, stretch.training_seats);
        assert_eq!(base.drivers.retail_locations, 4.0);

        let explicit = analysis_base(&config, Some(ScenarioName::Floor)).unwrap();
        assert_eq!(explicit.drivers, ScenarioName::Floor.drivers());
        assert_eq!(explicit.assumptions, config.assumptions);
    }

    #[test]
    fn test_show_config_round_trips() {
        let mut config = AppConfig::default();
        config.active_scenario = ScenarioName::Floor;
        let yaml = show_config(&config).unwrap();
        assert_eq!(AppConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_export_writes_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenarios.csv");
        let written = export(&AppConfig::default(), Some(&path), generated()).unwrap();

        assert_eq!(written, path);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("OverIT Financial Model"));
        assert!(content.contains("Generated: 2026-10-17 12:00:00"));
        assert!(content.contains("REVENUE BREAKDOWN"));
    }
}
