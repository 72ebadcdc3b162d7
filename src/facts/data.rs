//! Plan fact structures matching the upstream plan-storage format
//!
//! Facts arrive already field-validated from the persistence layer and are
//! treated as read-only for the duration of a projection run. Evolving
//! values live in `PortfolioValues`, never here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time::year_for_age;

fn default_include_in_nest_egg() -> bool {
    true
}

/// Owner of a fact within the household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    Person1,
    Person2,
    Joint,
}

/// Direction of a scheduled cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    Inflow,
    Outflow,
}

/// Kind of growth rate configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateKind {
    /// Marker row meaning "use the plan default rate"
    Default,
    /// Single fixed rate replacing the default for all years
    Override,
    /// Bounded period with its own fixed rate
    Stepwise,
}

/// What a growth rate configuration applies to; exactly one target per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateTarget {
    Asset(u32),
    Income(u32),
    Scenario(u32),
}

/// A single growth rate rule for an asset, income stream, or scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRateConfiguration {
    pub config_id: u32,

    pub target: RateTarget,

    pub kind: RateKind,

    /// First year the rule applies (inclusive)
    pub start_year: i32,

    /// Last year the rule applies (inclusive); None = open-ended
    #[serde(default)]
    pub end_year: Option<i32>,

    /// Signed annual rate (0.05 = 5%, negative rates allowed)
    pub rate: Decimal,
}

impl GrowthRateConfiguration {
    /// Whether this rule's period contains the given year.
    ///
    /// An open-ended period contains every year from its start onward.
    pub fn contains_year(&self, year: i32) -> bool {
        self.start_year <= year && self.end_year.map_or(true, |end| end >= year)
    }

    /// Convenience constructor for a stepwise period targeting an asset.
    pub fn stepwise_for_asset(
        config_id: u32,
        asset_id: u32,
        start_year: i32,
        end_year: Option<i32>,
        rate: Decimal,
    ) -> Self {
        Self {
            config_id,
            target: RateTarget::Asset(asset_id),
            kind: RateKind::Stepwise,
            start_year,
            end_year,
            rate,
        }
    }

    /// Convenience constructor for an override rate targeting an asset.
    pub fn override_for_asset(config_id: u32, asset_id: u32, start_year: i32, rate: Decimal) -> Self {
        Self {
            config_id,
            target: RateTarget::Asset(asset_id),
            kind: RateKind::Override,
            start_year,
            end_year: None,
            rate,
        }
    }
}

/// An asset held by the household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFact {
    pub asset_id: u32,

    pub category_id: u32,

    pub name: String,

    pub owner: Owner,

    /// Value at plan inception; must be strictly positive
    pub value: Decimal,

    /// Whether the asset counts toward the retirement portfolio
    #[serde(default = "default_include_in_nest_egg")]
    pub include_in_nest_egg: bool,

    /// Ordered growth rate rules; empty means the plan default applies
    #[serde(default)]
    pub growth_rates: Vec<GrowthRateConfiguration>,
}

impl AssetFact {
    pub fn new(asset_id: u32, category_id: u32, name: &str, owner: Owner, value: Decimal) -> Self {
        Self {
            asset_id,
            category_id,
            name: name.to_string(),
            owner,
            value,
            include_in_nest_egg: true,
            growth_rates: Vec::new(),
        }
    }

    pub fn with_growth_rates(mut self, growth_rates: Vec<GrowthRateConfiguration>) -> Self {
        self.growth_rates = growth_rates;
        self
    }
}

/// A liability owed by the household
///
/// Liabilities carry at most one interest rate; absence means the balance is
/// carried forward unchanged, never defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityFact {
    pub liability_id: u32,

    pub category_id: u32,

    pub name: String,

    pub owner: Owner,

    /// Balance at plan inception; must be strictly positive
    pub value: Decimal,

    /// Annual interest rate, if the liability accrues interest
    #[serde(default)]
    pub interest_rate: Option<Decimal>,

    /// Whether the liability counts against the retirement portfolio
    #[serde(default = "default_include_in_nest_egg")]
    pub include_in_nest_egg: bool,
}

impl LiabilityFact {
    pub fn new(liability_id: u32, category_id: u32, name: &str, owner: Owner, value: Decimal) -> Self {
        Self {
            liability_id,
            category_id,
            name: name.to_string(),
            owner,
            value,
            interest_rate: None,
            include_in_nest_egg: true,
        }
    }

    pub fn with_interest_rate(mut self, rate: Decimal) -> Self {
        self.interest_rate = Some(rate);
        self
    }
}

/// A discrete scheduled inflow or outflow
///
/// For one-off or bounded events: an inheritance (start = end), college
/// tuition (start < end). Recurring lifetime income belongs in
/// `RetirementIncomeFact` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowFact {
    pub flow_id: u32,

    pub name: String,

    pub flow_type: FlowType,

    pub owner: Owner,

    /// Amount per active year; must be strictly positive
    pub annual_amount: Decimal,

    pub start_year: i32,

    /// Inclusive end year; None means a single-year event
    #[serde(default)]
    pub end_year: Option<i32>,

    #[serde(default)]
    pub apply_inflation: bool,

    /// Whether the flow feeds the retirement portfolio
    #[serde(default = "default_include_in_nest_egg")]
    pub include_in_nest_egg: bool,
}

impl CashFlowFact {
    /// End year with the single-year default applied.
    pub fn effective_end_year(&self) -> i32 {
        self.end_year.unwrap_or(self.start_year)
    }

    /// Active iff `start_year <= year <= effective_end_year`.
    pub fn is_active(&self, year: i32) -> bool {
        self.start_year <= year && year <= self.effective_end_year()
    }
}

/// An age-gated retirement income stream (Social Security, pension, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementIncomeFact {
    pub income_id: u32,

    pub name: String,

    pub owner: Owner,

    /// Amount per active year; must be strictly positive
    pub annual_income: Decimal,

    /// Owner's age at which the stream begins
    pub start_age: u8,

    /// Owner's age at which the stream ends; None = lifetime
    #[serde(default)]
    pub end_age: Option<u8>,

    #[serde(default)]
    pub apply_inflation: bool,

    /// Whether the stream feeds the retirement portfolio
    #[serde(default = "default_include_in_nest_egg")]
    pub include_in_nest_egg: bool,

    /// Owner's date of birth; ages are always derived from this
    pub date_of_birth: NaiveDate,
}

impl RetirementIncomeFact {
    /// Active iff the owner's age in `year` falls in `[start_age, end_age]`,
    /// with a missing end age meaning lifetime.
    pub fn is_active(&self, year: i32) -> bool {
        let age = crate::time::age_at(self.date_of_birth, year);
        i32::from(self.start_age) <= age && self.end_age.map_or(true, |end| age <= i32::from(end))
    }
}

/// Plan-wide assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseAssumptions {
    /// Growth rate applied to assets with no configuration of their own
    pub default_growth_rate: Decimal,

    /// Annual inflation rate for inflation-enabled flows and income
    pub inflation_rate: Decimal,

    /// Primary person's retirement age
    pub retirement_age: u8,

    /// Primary person's final projected age
    pub final_age: u8,

    /// Primary person's date of birth
    pub date_of_birth: NaiveDate,
}

/// The plan's canonical, scenario-independent inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseFacts {
    pub assets: Vec<AssetFact>,

    pub liabilities: Vec<LiabilityFact>,

    pub cash_flows: Vec<CashFlowFact>,

    pub retirement_income: Vec<RetirementIncomeFact>,

    pub assumptions: BaseAssumptions,

    /// Plan inception year; the first projected year
    pub start_year: i32,

    pub retirement_year: i32,

    /// Final projected year (inclusive)
    pub end_year: i32,
}

impl BaseFacts {
    /// Assemble base facts with the timeline derived from the assumptions:
    /// retirement and end years come from the primary DOB and the configured
    /// retirement/final ages.
    pub fn from_plan_inception(
        start_year: i32,
        assumptions: BaseAssumptions,
        assets: Vec<AssetFact>,
        liabilities: Vec<LiabilityFact>,
        cash_flows: Vec<CashFlowFact>,
        retirement_income: Vec<RetirementIncomeFact>,
    ) -> Self {
        let retirement_year = year_for_age(assumptions.date_of_birth, assumptions.retirement_age);
        let end_year = year_for_age(assumptions.date_of_birth, assumptions.final_age);
        Self {
            assets,
            liabilities,
            cash_flows,
            retirement_income,
            assumptions,
            start_year,
            retirement_year,
            end_year,
        }
    }

    /// Number of projected years, inclusive of both endpoints.
    pub fn projection_years(&self) -> u32 {
        crate::time::years_between(self.start_year, self.end_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(1970, 6, 15).unwrap()
    }

    #[test]
    fn test_flow_activation_window() {
        let flow = CashFlowFact {
            flow_id: 1,
            name: "inheritance".to_string(),
            flow_type: FlowType::Inflow,
            owner: Owner::Person1,
            annual_amount: dec!(500000),
            start_year: 2025,
            end_year: None,
            apply_inflation: false,
            include_in_nest_egg: true,
        };

        // end_year defaults to start_year
        assert_eq!(flow.effective_end_year(), 2025);
        assert!(!flow.is_active(2024));
        assert!(flow.is_active(2025));
        assert!(!flow.is_active(2026));
    }

    #[test]
    fn test_income_age_gating() {
        let income = RetirementIncomeFact {
            income_id: 1,
            name: "social security".to_string(),
            owner: Owner::Person1,
            annual_income: dec!(30000),
            start_age: 67,
            end_age: None,
            apply_inflation: true,
            include_in_nest_egg: true,
            date_of_birth: dob(),
        };

        // turns 67 in 2037; lifetime stream never deactivates
        assert!(!income.is_active(2036));
        assert!(income.is_active(2037));
        assert!(income.is_active(2090));

        let bounded = RetirementIncomeFact {
            end_age: Some(75),
            ..income
        };
        assert!(bounded.is_active(2045));
        assert!(!bounded.is_active(2046));
    }

    #[test]
    fn test_config_contains_year() {
        let config =
            GrowthRateConfiguration::stepwise_for_asset(1, 10, 2025, Some(2026), dec!(0.08));
        assert!(config.contains_year(2025));
        assert!(config.contains_year(2026));
        assert!(!config.contains_year(2027));

        let open = GrowthRateConfiguration::stepwise_for_asset(2, 10, 2030, None, dec!(0.04));
        assert!(open.contains_year(2099));
        assert!(!open.contains_year(2029));
    }

    #[test]
    fn test_timeline_derived_from_assumptions() {
        let facts = BaseFacts::from_plan_inception(
            2025,
            BaseAssumptions {
                default_growth_rate: dec!(0.06),
                inflation_rate: dec!(0.03),
                retirement_age: 65,
                final_age: 95,
                date_of_birth: dob(),
            },
            vec![AssetFact::new(1, 1, "401k", Owner::Person1, dec!(450000))],
            vec![],
            vec![],
            vec![],
        );

        assert_eq!(facts.retirement_year, 2035);
        assert_eq!(facts.end_year, 2065);
        assert_eq!(facts.projection_years(), 41);
    }
}
