//! Data model for the projection engine.
//!
//! - `drivers` - The six business-driver inputs and their valid ranges
//! - `assumptions` - Prices, cost rates and loan terms
//! - `results` - The derived income statement

mod assumptions;
mod drivers;
mod results;

pub use assumptions::*;
pub use drivers::*;
pub use results::*;
