//! Output records of the projection engine.

use serde::{Deserialize, Serialize};

/// Minimum DSCR SBA lenders accept
pub const LENDER_MIN_DSCR: f64 = 1.25;

/// The six revenue streams, in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueStream {
    Training,
    Retrofit,
    Retail,
    Consulting,
    Maintenance,
    Affiliate,
}

impl RevenueStream {
    pub const ALL: [RevenueStream; 6] = [
        RevenueStream::Training,
        RevenueStream::Retrofit,
        RevenueStream::Retail,
        RevenueStream::Consulting,
        RevenueStream::Maintenance,
        RevenueStream::Affiliate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RevenueStream::Training => "Training Revenue",
            RevenueStream::Retrofit => "Retrofit Revenue",
            RevenueStream::Retail => "Retail Revenue",
            RevenueStream::Consulting => "Consulting Revenue",
            RevenueStream::Maintenance => "Maintenance Revenue",
            RevenueStream::Affiliate => "Affiliate Revenue",
        }
    }
}

/// Annual revenue per stream
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RevenueByStream {
    pub training: f64,
    pub retrofit: f64,
    pub retail: f64,
    pub consulting: f64,
    pub maintenance: f64,
    pub affiliate: f64,
}

impl RevenueByStream {
    pub fn get(&self, stream: RevenueStream) -> f64 {
        match stream {
            RevenueStream::Training => self.training,
            RevenueStream::Retrofit => self.retrofit,
            RevenueStream::Retail => self.retail,
            RevenueStream::Consulting => self.consulting,
            RevenueStream::Maintenance => self.maintenance,
            RevenueStream::Affiliate => self.affiliate,
        }
    }

    /// Iterate streams in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (RevenueStream, f64)> + '_ {
        RevenueStream::ALL
            .into_iter()
            .map(|stream| (stream, self.get(stream)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, amount)| amount).sum()
    }
}

/// Full annual income statement derived from one driver set.
///
/// Percentages (`gross_margin`, `net_margin`) are expressed as 0-100.
/// `break_even` is `0.0` when it is undefined: no revenue, or costs that
/// scale with revenue consume all of it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialResult {
    pub revenue: f64,
    pub revenue_by_stream: RevenueByStream,
    pub cogs: f64,
    pub gross_profit: f64,
    pub gross_margin: f64,
    pub fixed_costs: f64,
    pub variable_costs: f64,
    pub total_expenses: f64,
    pub noi: f64,
    pub debt_service: f64,
    pub dscr: f64,
    pub break_even: f64,
    pub net_margin: f64,
}

impl FinancialResult {
    /// Whether coverage clears the lender's minimum DSCR
    pub fn meets_lender_minimum(&self) -> bool {
        self.dscr >= LENDER_MIN_DSCR
    }

    /// Safety margin of revenue above the break-even point
    pub fn revenue_above_break_even(&self) -> f64 {
        self.revenue - self.break_even
    }
}
