//! Financial projection library for the SBA loan prospectus
//!
//! This crate turns six business-driver counts into a full annual income
//! statement and builds lender-facing analysis on top of it:
//! - Projection engine: revenue by stream, COGS, margins, NOI, DSCR, break-even
//! - Fixed Conservative / Base / Growth scenario presets
//! - One-variable sensitivity sweeps and tornado ranking of levers by NOI swing
//! - CSV scenario comparison report
//!
//! All computation is pure. Live driver state belongs to the caller
//! (see [`state::ModelState`]) and is passed in explicitly.
//!
//! ```ignore
//! use prospectus_core::{DriverSet, ScenarioName, compute_financials, get_scenario_result};
//!
//! let base = get_scenario_result(ScenarioName::Base);
//! assert!(base.meets_lender_minimum());
//!
//! let custom = compute_financials(&DriverSet::new(40.0, 25.0, 2.0, 100.0, 20.0, 10.0));
//! println!("NOI {:.0}, DSCR {:.2}", custom.noi, custom.dscr);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod projection;
pub mod report;
pub mod scenarios;
pub mod state;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use model::{
    DriverKey, DriverRange, DriverSet, FinancialResult, LENDER_MIN_DSCR, PriceAssumptions,
    RevenueByStream, RevenueStream,
};
pub use projection::{compute_financials, compute_financials_with};
pub use scenarios::{Scenario, ScenarioName, get_scenario_result};
