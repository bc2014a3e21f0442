//! Sensitivity analysis built on the projection engine.
//!
//! Two routines, both stateless:
//!
//! - [`sweep`] moves one lever across a symmetric percentage band around its
//!   base value and records revenue, NOI and DSCR at each point.
//! - [`tornado`] evaluates every lever at its min and max with all others at
//!   base, and ranks levers by the resulting NOI swing.
//!
//! ```ignore
//! use prospectus_core::analysis::{ModelInputs, SensitivityVariable, VariableKey, sweep, tornado};
//!
//! let base = ModelInputs::scenario(ScenarioName::Base, PriceAssumptions::default());
//! let training = SensitivityVariable::from_inputs(VariableKey::Training, &base);
//! let points = sweep(&base, &training, 20.0, 11)?;
//! let ranking = tornado(&base, &SensitivityVariable::defaults(&base))?;
//! ```

mod config;
mod sweep;
mod tornado;

pub use config::*;
pub use sweep::*;
pub use tornado::*;
