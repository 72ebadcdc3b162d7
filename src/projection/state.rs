//! Portfolio state for a single projection year

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::facts::BaseFacts;

/// Snapshot of every tracked value at a point in the projection
///
/// Derived totals are always recomputed from the id-keyed maps by full
/// re-summation, never patched incrementally. Maps are ordered so that
/// iteration, serialization, and therefore whole projections are
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValues {
    /// Current value per asset id
    pub asset_values: BTreeMap<u32, Decimal>,

    /// Current balance per liability id
    pub liability_values: BTreeMap<u32, Decimal>,

    /// Asset totals per category id (derived)
    pub asset_category_totals: BTreeMap<u32, Decimal>,

    /// Liability totals per category id (derived)
    pub liability_category_totals: BTreeMap<u32, Decimal>,

    /// Cumulative cash-flow and income contributions held outside any asset
    /// bucket; feeds the retirement portfolio but never compounds
    pub retirement_cash: Decimal,

    /// Nest-egg assets minus nest-egg liabilities, plus retirement cash
    /// (derived)
    pub retirement_portfolio_value: Decimal,

    /// All assets minus all liabilities (derived)
    pub total_net_worth: Decimal,
}

impl PortfolioValues {
    /// Seed a portfolio from raw fact values, with no growth applied.
    pub fn from_facts(facts: &BaseFacts) -> Self {
        let mut portfolio = Self {
            asset_values: facts
                .assets
                .iter()
                .map(|a| (a.asset_id, a.value))
                .collect(),
            liability_values: facts
                .liabilities
                .iter()
                .map(|l| (l.liability_id, l.value))
                .collect(),
            asset_category_totals: BTreeMap::new(),
            liability_category_totals: BTreeMap::new(),
            retirement_cash: Decimal::ZERO,
            retirement_portfolio_value: Decimal::ZERO,
            total_net_worth: Decimal::ZERO,
        };
        portfolio.recompute_totals(facts);
        portfolio
    }

    /// Recompute every derived total by full re-summation of the maps.
    pub fn recompute_totals(&mut self, facts: &BaseFacts) {
        self.asset_category_totals.clear();
        for asset in &facts.assets {
            let value = self.asset_value(asset.asset_id);
            *self
                .asset_category_totals
                .entry(asset.category_id)
                .or_insert(Decimal::ZERO) += value;
        }

        self.liability_category_totals.clear();
        for liability in &facts.liabilities {
            let value = self.liability_value(liability.liability_id);
            *self
                .liability_category_totals
                .entry(liability.category_id)
                .or_insert(Decimal::ZERO) += value;
        }

        let total_assets: Decimal = self.asset_values.values().copied().sum();
        let total_liabilities: Decimal = self.liability_values.values().copied().sum();
        self.total_net_worth = total_assets - total_liabilities;

        let nest_egg_assets: Decimal = facts
            .assets
            .iter()
            .filter(|a| a.include_in_nest_egg)
            .map(|a| self.asset_value(a.asset_id))
            .sum();
        let nest_egg_liabilities: Decimal = facts
            .liabilities
            .iter()
            .filter(|l| l.include_in_nest_egg)
            .map(|l| self.liability_value(l.liability_id))
            .sum();
        self.retirement_portfolio_value = nest_egg_assets - nest_egg_liabilities + self.retirement_cash;
    }

    /// Current value for an asset id, zero if untracked.
    pub fn asset_value(&self, asset_id: u32) -> Decimal {
        self.asset_values.get(&asset_id).copied().unwrap_or(Decimal::ZERO)
    }

    /// Current balance for a liability id, zero if untracked.
    pub fn liability_value(&self, liability_id: u32) -> Decimal {
        self.liability_values
            .get(&liability_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
