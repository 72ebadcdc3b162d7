//! Core projection engine for yearly base-facts projections
//!
//! One transition per calendar year, in strict order: carry forward the
//! prior ending portfolio (or seed from raw facts), apply cash flows and
//! retirement income to the retirement portfolio, grow every asset through
//! the rate resolver, accrue liability interest, then recompute all derived
//! totals. Year N+1 cannot be computed without year N's ending state.

use std::collections::BTreeMap;

use log::debug;

use super::flows::{CashFlowEngine, CashFlowResults, IncomeResults};
use super::results::{YearMetadata, YearlyCalculationResult};
use super::state::PortfolioValues;
use crate::error::EngineError;
use crate::facts::{validate_base_facts, BaseFacts};
use crate::growth::{liability_interest, GrowthRateResolver, GrowthResult};

/// Per-run projection engine over a household's base facts
///
/// Stateless between calls; safe to share across threads or rebuild per run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseFactsProjector {
    resolver: GrowthRateResolver,
    flow_engine: CashFlowEngine,
}

impl BaseFactsProjector {
    pub fn new() -> Self {
        Self {
            resolver: GrowthRateResolver::new(),
            flow_engine: CashFlowEngine::new(),
        }
    }

    /// Run the complete projection from plan inception to the final year.
    ///
    /// Validates the whole fact set up front; any failure aborts before the
    /// first year is computed and a partial timeline is never returned.
    pub fn generate_projection(
        &self,
        facts: &BaseFacts,
    ) -> Result<Vec<YearlyCalculationResult>, EngineError> {
        validate_base_facts(facts)?;

        debug!(
            "projecting {} years ({}..={})",
            facts.projection_years(),
            facts.start_year,
            facts.end_year
        );

        let mut results: Vec<YearlyCalculationResult> =
            Vec::with_capacity(facts.projection_years() as usize);
        for year in facts.start_year..=facts.end_year {
            let result = self.calculate_year(year, facts, results.last())?;
            results.push(result);
        }

        Ok(results)
    }

    /// Compute a single projection year.
    ///
    /// The first year seeds its starting portfolio from raw fact values;
    /// later years deep-copy the prior ending portfolio. Years before plan
    /// inception are rejected.
    pub fn calculate_year(
        &self,
        year: i32,
        facts: &BaseFacts,
        prior_result: Option<&YearlyCalculationResult>,
    ) -> Result<YearlyCalculationResult, EngineError> {
        if year < facts.start_year {
            return Err(EngineError::YearBeforePlanStart {
                year,
                start_year: facts.start_year,
            });
        }

        let starting_portfolio = match prior_result {
            Some(prior) => prior.ending_portfolio.clone(),
            None => PortfolioValues::from_facts(facts),
        };

        let cash_flows = self.process_cash_flows(year, facts);
        let income = self.process_retirement_income(year, facts);

        let mut portfolio = starting_portfolio.clone();

        // flows and income land in the retirement portfolio before growth
        portfolio.retirement_cash += cash_flows.nest_egg_net_flow + income.nest_egg_income;

        let growth = self.apply_growth(&mut portfolio, year, facts);
        self.apply_liability_interest(&mut portfolio, facts);
        portfolio.recompute_totals(facts);

        let growth_sources = growth
            .into_iter()
            .map(|(asset_id, result)| (asset_id, result.source))
            .collect();
        let metadata = YearMetadata::new(year, &cash_flows, &income, &portfolio, growth_sources);

        Ok(YearlyCalculationResult {
            year,
            starting_portfolio,
            cash_flows,
            income,
            ending_portfolio: portfolio,
            metadata,
        })
    }

    /// Evaluate every discrete cash flow for a year.
    pub fn process_cash_flows(&self, year: i32, facts: &BaseFacts) -> CashFlowResults {
        self.flow_engine.process_flows(
            &facts.cash_flows,
            year,
            facts.assumptions.inflation_rate,
            facts.start_year,
        )
    }

    /// Evaluate every retirement income stream for a year.
    pub fn process_retirement_income(&self, year: i32, facts: &BaseFacts) -> IncomeResults {
        self.flow_engine.process_income(
            &facts.retirement_income,
            year,
            facts.assumptions.inflation_rate,
            facts.start_year,
        )
    }

    /// Compound every asset by its resolved rate for the year.
    ///
    /// Assets are independent; ordering does not affect the outcome.
    pub fn apply_growth(
        &self,
        portfolio: &mut PortfolioValues,
        year: i32,
        facts: &BaseFacts,
    ) -> BTreeMap<u32, GrowthResult> {
        let mut applied = BTreeMap::new();
        for asset in &facts.assets {
            let value = portfolio.asset_value(asset.asset_id);
            let result = self.resolver.apply_growth(
                value,
                &asset.growth_rates,
                year,
                facts.assumptions.default_growth_rate,
            );
            debug!(
                "asset {} year {}: {:?} rate {}",
                asset.asset_id, year, result.source, result.applied_rate
            );
            portfolio
                .asset_values
                .insert(asset.asset_id, result.final_value);
            applied.insert(asset.asset_id, result);
        }
        applied
    }

    /// Accrue one year of interest on liabilities that carry a rate;
    /// the rest pass through unchanged.
    pub fn apply_liability_interest(&self, portfolio: &mut PortfolioValues, facts: &BaseFacts) {
        for liability in &facts.liabilities {
            let value = portfolio.liability_value(liability.liability_id);
            portfolio
                .liability_values
                .insert(liability.liability_id, liability_interest(value, liability.interest_rate));
        }
    }
}
