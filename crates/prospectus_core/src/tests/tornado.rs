//! Tests for tornado ranking

use super::assert_close;
use crate::analysis::{ImpactLevel, ModelInputs, SensitivityVariable, VariableKey, tornado};
use crate::model::{DriverRange, PriceAssumptions};
use crate::scenarios::ScenarioName;

fn base_inputs() -> ModelInputs {
    ModelInputs::scenario(ScenarioName::Base, PriceAssumptions::default())
}

#[test]
fn test_tornado_sorted_descending_by_swing() {
    let base = base_inputs();
    let entries = tornado(&base, &SensitivityVariable::defaults(&base)).unwrap();

    assert_eq!(entries.len(), VariableKey::ALL.len());
    assert!(entries.windows(2).all(|w| w[0].swing >= w[1].swing));
    let top = entries[0].swing;
    assert!(entries.iter().all(|e| top >= e.swing));
}

/// Per-unit NOI contribution of each lever under default assumptions:
/// training seat 14,000 * 0.88, maintenance contract 14,400 * 0.88,
/// training price $1 * 200 seats-per-year * 0.88, retrofit project 12,000 * 0.53.
#[test]
fn test_tornado_ranking_for_base_case() {
    let base = base_inputs();
    let entries = tornado(&base, &SensitivityVariable::defaults(&base)).unwrap();

    let order: Vec<VariableKey> = entries.iter().map(|e| e.key).collect();
    assert_eq!(
        order,
        vec![
            VariableKey::Training,
            VariableKey::Maintenance,
            VariableKey::TrainingPrice,
            VariableKey::Retrofit,
            VariableKey::Consulting,
            VariableKey::Retail,
            VariableKey::Affiliate,
            VariableKey::RetrofitPrice,
        ]
    );

    // Training spans 10..100 seats
    assert_close(entries[0].swing, 90.0 * 14_000.0 * 0.88, "training swing");
    assert_close(entries[1].swing, 45.0 * 14_400.0 * 0.88, "maintenance swing");
    assert_eq!(entries[0].impact, ImpactLevel::High);
}

#[test]
fn test_tornado_entry_averages_extremes() {
    let base = base_inputs();
    let retail = SensitivityVariable::from_inputs(VariableKey::Retail, &base);
    let entries = tornado(&base, &[retail]).unwrap();
    let entry = entries[0];

    assert_close(entry.noi, (entry.noi_at_min + entry.noi_at_max) / 2.0, "avg noi");
    assert_close(entry.swing, (entry.noi_at_max - entry.noi_at_min).abs(), "swing");

    // Retail location contributes 180,000 * (1 - 0.45 - 0.12) = 77,400 NOI.
    // Base 2 locations: min 1 is -77,400 and max 5 is +232,200 from base.
    assert_close(entry.avg_impact, (77_400.0 + 232_200.0) / 2.0, "avg impact");
}

#[test]
fn test_tornado_impact_measured_from_variable_base() {
    let base = base_inputs();
    let from_scenario = SensitivityVariable::from_inputs(VariableKey::Retail, &base);
    let from_zero = SensitivityVariable {
        base: 0.0,
        ..from_scenario
    };
    let entries = tornado(&base, &[from_zero]).unwrap();
    let entry = entries[0];

    // Zero locations sits below the 1..5 band: 1 and 5 locations are
    // 77,400 and 387,000 above it
    assert_close(entry.avg_impact, (77_400.0 + 387_000.0) / 2.0, "avg impact");
    assert_eq!(entry.impact, ImpactLevel::High);

    // Extremes do not depend on the variable base
    let scenario_entry = tornado(&base, &[from_scenario]).unwrap()[0];
    assert_close(entry.swing, scenario_entry.swing, "swing");
    assert!(entry.avg_impact > scenario_entry.avg_impact);
}

#[test]
fn test_narrow_range_rates_low() {
    let base = base_inputs();
    let pinned = SensitivityVariable {
        key: VariableKey::Retail,
        base: 2.0,
        range: DriverRange::new(2.0, 2.0, 1.0),
    };
    let small = SensitivityVariable {
        key: VariableKey::Consulting,
        base: 120.0,
        range: DriverRange::new(100.0, 140.0, 10.0),
    };
    let entries = tornado(&base, &[pinned, small]).unwrap();

    assert_eq!(entries[0].key, VariableKey::Consulting);
    // 20 hours * 1,800 * 0.88 = 31,680 either side
    assert_eq!(entries[0].impact, ImpactLevel::Medium);
    assert_eq!(entries[1].swing, 0.0);
    assert_eq!(entries[1].impact, ImpactLevel::Low);
}

#[test]
fn test_tornado_does_not_mutate_inputs() {
    let base = base_inputs();
    let variables = SensitivityVariable::defaults(&base);
    let snapshot = (base, variables.clone());

    tornado(&base, &variables).unwrap();

    assert_eq!(snapshot, (base, variables));
}

#[test]
fn test_tornado_empty_input() {
    let base = base_inputs();
    assert!(tornado(&base, &[]).unwrap().is_empty());
}
