//! Result structures for projection output

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::flows::{CashFlowResults, IncomeResults};
use super::state::PortfolioValues;
use crate::growth::RateSource;
use crate::money::round_currency;

/// Audit metadata for one projected year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearMetadata {
    pub year: i32,

    pub total_inflows: Decimal,

    pub total_outflows: Decimal,

    pub total_income: Decimal,

    pub ending_retirement_portfolio: Decimal,

    /// Which rate branch fired per asset id
    pub growth_sources: BTreeMap<u32, RateSource>,
}

/// Full results of one projected year
///
/// Immutable once produced; the ending portfolio becomes the next year's
/// starting portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyCalculationResult {
    pub year: i32,

    /// Portfolio before this year's flows and growth
    pub starting_portfolio: PortfolioValues,

    pub cash_flows: CashFlowResults,

    pub income: IncomeResults,

    /// Portfolio after flows, growth, and liability interest
    pub ending_portfolio: PortfolioValues,

    pub metadata: YearMetadata,
}

/// Whole-run summary statistics, rounded for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,

    pub first_year: i32,

    pub final_year: i32,

    pub starting_net_worth: Decimal,

    pub final_net_worth: Decimal,

    pub final_retirement_portfolio: Decimal,

    pub total_inflows: Decimal,

    pub total_outflows: Decimal,

    pub total_income: Decimal,
}

impl ProjectionSummary {
    /// Summarize an ordered projection. Values are rounded to currency here,
    /// at the output boundary.
    pub fn from_results(results: &[YearlyCalculationResult]) -> Option<Self> {
        let first = results.first()?;
        let last = results.last()?;

        let total_inflows: Decimal = results.iter().map(|r| r.cash_flows.total_inflows).sum();
        let total_outflows: Decimal = results.iter().map(|r| r.cash_flows.total_outflows).sum();
        let total_income: Decimal = results.iter().map(|r| r.income.total_income).sum();

        Some(Self {
            years: results.len() as u32,
            first_year: first.year,
            final_year: last.year,
            starting_net_worth: round_currency(first.starting_portfolio.total_net_worth),
            final_net_worth: round_currency(last.ending_portfolio.total_net_worth),
            final_retirement_portfolio: round_currency(
                last.ending_portfolio.retirement_portfolio_value,
            ),
            total_inflows: round_currency(total_inflows),
            total_outflows: round_currency(total_outflows),
            total_income: round_currency(total_income),
        })
    }
}

impl YearMetadata {
    pub(crate) fn new(
        year: i32,
        cash_flows: &CashFlowResults,
        income: &IncomeResults,
        ending: &PortfolioValues,
        growth_sources: BTreeMap<u32, RateSource>,
    ) -> Self {
        Self {
            year,
            total_inflows: cash_flows.total_inflows,
            total_outflows: cash_flows.total_outflows,
            total_income: income.total_income,
            ending_retirement_portfolio: ending.retirement_portfolio_value,
            growth_sources,
        }
    }
}
