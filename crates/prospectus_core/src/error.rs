use std::fmt;

use crate::analysis::VariableKey;

/// Errors raised when validating driver values or price assumptions
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    NegativeValue { field: &'static str, value: f64 },
    NonFiniteValue { field: &'static str },
    /// Rates are fractions and must lie in [0, 1]
    RateOutOfRange { field: &'static str, value: f64 },
    /// Loan principal and interest rate must be strictly positive
    NonPositive { field: &'static str, value: f64 },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NegativeValue { field, value } => {
                write!(f, "{field} must not be negative (got {value})")
            }
            InputError::NonFiniteValue { field } => write!(f, "{field} must be a finite number"),
            InputError::RateOutOfRange { field, value } => {
                write!(f, "{field} must be between 0 and 1 (got {value})")
            }
            InputError::NonPositive { field, value } => {
                write!(f, "{field} must be greater than zero (got {value})")
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Errors related to sensitivity sweep and tornado configuration
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A sweep needs at least two points to span -R..+R
    TooFewSteps(usize),
    /// Sweeps are capped at [`MAX_SWEEP_STEPS`](crate::analysis::MAX_SWEEP_STEPS) points
    TooManySteps(usize),
    /// The percentage range must be finite and non-negative
    InvalidRange(f64),
    InvalidVariable {
        key: VariableKey,
        reason: &'static str,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::TooFewSteps(steps) => {
                write!(f, "sweep requires at least 2 steps (got {steps})")
            }
            AnalysisError::TooManySteps(steps) => write!(
                f,
                "sweep allows at most {} steps (got {steps})",
                crate::analysis::MAX_SWEEP_STEPS
            ),
            AnalysisError::InvalidRange(range) => {
                write!(f, "sweep range must be a non-negative percentage (got {range})")
            }
            AnalysisError::InvalidVariable { key, reason } => {
                write!(f, "invalid sensitivity variable {key}: {reason}")
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Errors raised while writing the scenario report
#[derive(Debug)]
pub enum ReportError {
    Csv(csv::Error),
    Io(std::io::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Csv(e) => write!(f, "failed to write report row: {e}"),
            ReportError::Io(e) => write!(f, "failed to write report: {e}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Csv(e) => Some(e),
            ReportError::Io(e) => Some(e),
        }
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::Csv(err)
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Io(err)
    }
}
