//! One-variable sensitivity sweep.

use serde::{Deserialize, Serialize};

use super::config::{ModelInputs, SensitivityVariable};
use crate::error::AnalysisError;
use crate::projection::compute_financials_with;

/// One row of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    /// Offset from the base value, in percent
    pub offset_percent: f64,
    /// Lever value after clamping and snapping to its step
    pub value: f64,
    pub revenue: f64,
    pub noi: f64,
    pub dscr: f64,
    /// Revenue change versus the unperturbed base, in percent
    pub revenue_change_percent: f64,
    /// NOI change versus the unperturbed base, in percent
    pub noi_change_percent: f64,
}

/// Upper bound on points per sweep
pub const MAX_SWEEP_STEPS: usize = 501;

/// Evenly spaced offsets from `-range` to `+range` inclusive, ascending
pub fn sweep_offsets(range_percent: f64, steps: usize) -> Result<Vec<f64>, AnalysisError> {
    if steps < 2 {
        return Err(AnalysisError::TooFewSteps(steps));
    }
    if steps > MAX_SWEEP_STEPS {
        return Err(AnalysisError::TooManySteps(steps));
    }
    if !range_percent.is_finite() || range_percent < 0.0 {
        return Err(AnalysisError::InvalidRange(range_percent));
    }
    let step_size = 2.0 * range_percent / (steps - 1) as f64;
    Ok((0..steps)
        .map(|i| -range_percent + step_size * i as f64)
        .collect())
}

/// Re-evaluate the engine with `variable` perturbed across `±range_percent`.
///
/// The lever itself starts from `variable.base`, and both the perturbed points
/// and the reference for the percent deltas use that value. All other levers
/// stay at their values in `base`. The first point is the worst case and the
/// last point the best case of the band.
pub fn sweep(
    base: &ModelInputs,
    variable: &SensitivityVariable,
    range_percent: f64,
    steps: usize,
) -> Result<Vec<SensitivityPoint>, AnalysisError> {
    variable.validate()?;
    let offsets = sweep_offsets(range_percent, steps)?;
    let anchored = variable.key.substitute(base, variable.base);
    let reference = compute_financials_with(&anchored.drivers, &anchored.assumptions);

    let points = offsets
        .into_iter()
        .map(|offset_percent| {
            let value = variable
                .range
                .snap(variable.base * (1.0 + offset_percent / 100.0));
            let inputs = variable.key.substitute(&anchored, value);
            let result = compute_financials_with(&inputs.drivers, &inputs.assumptions);
            SensitivityPoint {
                offset_percent,
                value,
                revenue: result.revenue,
                noi: result.noi,
                dscr: result.dscr,
                revenue_change_percent: percent_change(result.revenue, reference.revenue),
                noi_change_percent: percent_change(result.noi, reference.noi),
            }
        })
        .collect();
    Ok(points)
}

/// Percent change from `base`; zero when `base` is zero
fn percent_change(value: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        (value - base) / base * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_for_default_band() {
        let offsets = sweep_offsets(20.0, 11).unwrap();
        assert_eq!(offsets.len(), 11);
        assert_eq!(offsets[0], -20.0);
        assert!((offsets[5]).abs() < 1e-12);
        assert!((offsets[10] - 20.0).abs() < 1e-12);
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_offsets_reject_bad_config() {
        assert_eq!(sweep_offsets(20.0, 1), Err(AnalysisError::TooFewSteps(1)));
        assert_eq!(
            sweep_offsets(20.0, usize::MAX),
            Err(AnalysisError::TooManySteps(usize::MAX))
        );
        assert_eq!(
            sweep_offsets(20.0, MAX_SWEEP_STEPS + 1),
            Err(AnalysisError::TooManySteps(MAX_SWEEP_STEPS + 1))
        );
        assert_eq!(sweep_offsets(20.0, MAX_SWEEP_STEPS).unwrap().len(), MAX_SWEEP_STEPS);
        assert!(matches!(
            sweep_offsets(-5.0, 11),
            Err(AnalysisError::InvalidRange(_))
        ));
        assert!(matches!(
            sweep_offsets(f64::NAN, 11),
            Err(AnalysisError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_percent_change_guards_zero_base() {
        assert_eq!(percent_change(10.0, 0.0), 0.0);
        assert_eq!(percent_change(110.0, 100.0), 10.0);
        assert_eq!(percent_change(90.0, 100.0), -10.0);
    }
}
