//! Effective growth rate selection and compounding
//!
//! One resolver serves every asset: given the asset's ordered rate configs,
//! a year, and the plan default, it picks the effective annual rate and
//! reports which branch fired so results can carry audit metadata.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::facts::{GrowthRateConfiguration, RateKind};
use crate::money::apply_annual_rate;

/// Which precedence branch produced the effective rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// A stepwise period containing the year
    Stepwise,
    /// The single override rate
    Override,
    /// The plan default rate
    Default,
}

/// Outcome of rate resolution for one (configs, year) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRate {
    pub rate: Decimal,

    pub source: RateSource,

    /// The stepwise period that fired, when the source is stepwise
    pub period: Option<(i32, Option<i32>)>,
}

/// One year of growth applied to a value, with audit detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthResult {
    pub final_value: Decimal,

    pub growth_amount: Decimal,

    pub applied_rate: Decimal,

    pub source: RateSource,

    pub period: Option<(i32, Option<i32>)>,
}

/// Stateless, per-run rate resolution service
#[derive(Debug, Clone, Copy, Default)]
pub struct GrowthRateResolver;

impl GrowthRateResolver {
    pub fn new() -> Self {
        Self
    }

    /// Pick the effective annual rate for a year. Precedence, first match
    /// wins:
    ///
    /// 1. a stepwise config whose period contains the year (overlaps are
    ///    rejected at validation time; if one slips through, the first in
    ///    input order wins rather than aborting the run),
    /// 2. the single override config, for all years regardless of its own
    ///    bounds,
    /// 3. the plan default rate.
    pub fn resolve(
        &self,
        configs: &[GrowthRateConfiguration],
        year: i32,
        default_rate: Decimal,
    ) -> ResolvedRate {
        if let Some(config) = configs
            .iter()
            .filter(|c| c.kind == RateKind::Stepwise)
            .find(|c| c.contains_year(year))
        {
            return ResolvedRate {
                rate: config.rate,
                source: RateSource::Stepwise,
                period: Some((config.start_year, config.end_year)),
            };
        }

        if let Some(config) = configs.iter().find(|c| c.kind == RateKind::Override) {
            return ResolvedRate {
                rate: config.rate,
                source: RateSource::Override,
                period: None,
            };
        }

        ResolvedRate {
            rate: default_rate,
            source: RateSource::Default,
            period: None,
        }
    }

    /// Resolve the rate and compound the value by one whole year.
    pub fn apply_growth(
        &self,
        value: Decimal,
        configs: &[GrowthRateConfiguration],
        year: i32,
        default_rate: Decimal,
    ) -> GrowthResult {
        let resolved = self.resolve(configs, year, default_rate);
        let final_value = apply_annual_rate(value, resolved.rate);
        GrowthResult {
            final_value,
            growth_amount: final_value - value,
            applied_rate: resolved.rate,
            source: resolved.source,
            period: resolved.period,
        }
    }
}

/// Degenerate variant for liabilities: one optional interest rate, no
/// hierarchy. A liability without a rate is carried forward unchanged,
/// never defaulted.
pub fn liability_interest(value: Decimal, interest_rate: Option<Decimal>) -> Decimal {
    match interest_rate {
        Some(rate) => apply_annual_rate(value, rate),
        None => value,
    }
}
