//! Command-line front end for the SBA loan prospectus financial model
//!
//! Plays the role of the UI layer: it owns the live driver state (from
//! presets, flags and the config file), calls into `prospectus_core` for
//! every figure, and renders tables, JSON or the CSV scenario report.

pub mod commands;
pub mod config;
pub mod logging;
pub mod util;

pub use config::AppConfig;
pub use logging::init_logging;
