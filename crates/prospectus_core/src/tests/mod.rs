//! Integration tests for the projection engine and the analysis built on it
//!
//! Tests are organized by topic:
//! - `projection` - Income statement formulas, identities and zero-input guards
//! - `scenarios` - Preset evaluation and scenario switching
//! - `sensitivity` - Sweep point generation against direct engine evaluation
//! - `tornado` - Ranking order and impact buckets
//! - `report` - CSV report layout and formatting

mod tornado;

/// Tolerance for comparing dollar amounts built from several float products
pub(crate) const EPSILON: f64 = 1e-6;

pub(crate) fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "{what}: expected {expected}, got {actual}"
    );
}
