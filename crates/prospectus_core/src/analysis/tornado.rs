//! Tornado ranking: which lever swings NOI the most across its range.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::{ModelInputs, SensitivityVariable, VariableKey};
use crate::error::AnalysisError;
use crate::projection::compute_financials_with;

/// Average NOI impact above which a lever is rated high
pub const HIGH_IMPACT_THRESHOLD: f64 = 50_000.0;
/// Average NOI impact above which a lever is rated medium
pub const MEDIUM_IMPACT_THRESHOLD: f64 = 20_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

impl ImpactLevel {
    /// Bucket an average absolute NOI delta (dollars)
    pub fn from_avg_impact(avg_impact: f64) -> Self {
        if avg_impact > HIGH_IMPACT_THRESHOLD {
            ImpactLevel::High
        } else if avg_impact > MEDIUM_IMPACT_THRESHOLD {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::High => "high",
            ImpactLevel::Medium => "medium",
            ImpactLevel::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TornadoEntry {
    pub key: VariableKey,
    /// `|noi(max) - noi(min)|`
    pub swing: f64,
    pub noi_at_min: f64,
    pub noi_at_max: f64,
    /// Mean of the min and max evaluations
    pub revenue: f64,
    pub noi: f64,
    pub dscr: f64,
    /// Mean absolute NOI delta of the two extremes from base
    pub avg_impact: f64,
    pub impact: ImpactLevel,
}

/// Evaluate each variable at its min and max with everything else at `base`,
/// and rank by NOI swing, largest first.
///
/// Each variable's impact is measured against `base` with that lever set to
/// `variable.base`.
pub fn tornado(
    base: &ModelInputs,
    variables: &[SensitivityVariable],
) -> Result<Vec<TornadoEntry>, AnalysisError> {
    for variable in variables {
        variable.validate()?;
    }

    #[cfg(feature = "parallel")]
    let mut entries: Vec<TornadoEntry> = variables
        .par_iter()
        .map(|variable| evaluate_extremes(base, variable))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let mut entries: Vec<TornadoEntry> = variables
        .iter()
        .map(|variable| evaluate_extremes(base, variable))
        .collect();

    entries.sort_by(|a, b| b.swing.total_cmp(&a.swing));
    Ok(entries)
}

fn evaluate_extremes(base: &ModelInputs, variable: &SensitivityVariable) -> TornadoEntry {
    let anchored = variable.key.substitute(base, variable.base);
    let base_noi = compute_financials_with(&anchored.drivers, &anchored.assumptions).noi;
    let evaluate = |value: f64| {
        let inputs = variable.key.substitute(&anchored, value);
        compute_financials_with(&inputs.drivers, &inputs.assumptions)
    };
    let high = evaluate(variable.range.max);
    let low = evaluate(variable.range.min);

    let avg_impact = ((high.noi - base_noi).abs() + (low.noi - base_noi).abs()) / 2.0;

    TornadoEntry {
        key: variable.key,
        swing: (high.noi - low.noi).abs(),
        noi_at_min: low.noi,
        noi_at_max: high.noi,
        revenue: (high.revenue + low.revenue) / 2.0,
        noi: (high.noi + low.noi) / 2.0,
        dscr: (high.dscr + low.dscr) / 2.0,
        avg_impact,
        impact: ImpactLevel::from_avg_impact(avg_impact),
    }
}
