//! Cash flow and retirement income activation
//!
//! Discrete flows activate on a year window, income streams on an age window
//! derived from the owner's date of birth. Both share one inflation pattern:
//! an active, inflation-enabled item is worth
//! `base * (1 + inflation_rate)^(year - plan_start_year)`, an inactive item
//! contributes zero, and an active item without inflation keeps its base
//! amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::facts::{CashFlowFact, FlowType, RetirementIncomeFact};
use crate::money::inflation_adjusted;
use crate::time::age_at;

/// One evaluated cash flow for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowCalculation {
    pub flow_id: u32,

    pub flow_type: FlowType,

    pub base_amount: Decimal,

    /// Amount contributed this year: zero when inactive
    pub adjusted_amount: Decimal,

    /// Portion of the adjusted amount attributable to inflation
    pub inflation_adjustment: Decimal,

    pub is_active: bool,

    pub include_in_nest_egg: bool,
}

/// One evaluated retirement income stream for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeCalculation {
    pub income_id: u32,

    pub base_amount: Decimal,

    /// Amount contributed this year; zero when inactive
    pub adjusted_amount: Decimal,

    pub inflation_adjustment: Decimal,

    pub is_active: bool,

    pub include_in_nest_egg: bool,

    /// Owner's age in the evaluated year
    pub current_age: i32,
}

/// Aggregated cash flow results for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowResults {
    pub flows: Vec<FlowCalculation>,

    /// Sum of active inflow adjusted amounts
    pub total_inflows: Decimal,

    /// Sum of active outflow adjusted amounts
    pub total_outflows: Decimal,

    /// Inflows minus outflows
    pub net_flow: Decimal,

    /// Net flow restricted to nest-egg flows
    pub nest_egg_net_flow: Decimal,
}

/// Aggregated retirement income results for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeResults {
    pub streams: Vec<IncomeCalculation>,

    /// Sum of active adjusted amounts
    pub total_income: Decimal,

    /// Total restricted to nest-egg streams
    pub nest_egg_income: Decimal,
}

/// Stateless evaluator for flows and income streams
#[derive(Debug, Clone, Copy, Default)]
pub struct CashFlowEngine;

impl CashFlowEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a single discrete flow for one year.
    pub fn flow_amount(
        &self,
        flow: &CashFlowFact,
        year: i32,
        inflation_rate: Decimal,
        plan_start_year: i32,
    ) -> FlowCalculation {
        let is_active = flow.is_active(year);
        let (adjusted_amount, inflation_adjustment) = adjust(
            flow.annual_amount,
            is_active,
            flow.apply_inflation,
            inflation_rate,
            year,
            plan_start_year,
        );

        FlowCalculation {
            flow_id: flow.flow_id,
            flow_type: flow.flow_type,
            base_amount: flow.annual_amount,
            adjusted_amount,
            inflation_adjustment,
            is_active,
            include_in_nest_egg: flow.include_in_nest_egg,
        }
    }

    /// Evaluate a single retirement income stream for one year.
    pub fn income_amount(
        &self,
        income: &RetirementIncomeFact,
        year: i32,
        inflation_rate: Decimal,
        plan_start_year: i32,
    ) -> IncomeCalculation {
        let is_active = income.is_active(year);
        let (adjusted_amount, inflation_adjustment) = adjust(
            income.annual_income,
            is_active,
            income.apply_inflation,
            inflation_rate,
            year,
            plan_start_year,
        );

        IncomeCalculation {
            income_id: income.income_id,
            base_amount: income.annual_income,
            adjusted_amount,
            inflation_adjustment,
            is_active,
            include_in_nest_egg: income.include_in_nest_egg,
            current_age: age_at(income.date_of_birth, year),
        }
    }

    /// Evaluate and aggregate every flow for one year.
    pub fn process_flows(
        &self,
        flows: &[CashFlowFact],
        year: i32,
        inflation_rate: Decimal,
        plan_start_year: i32,
    ) -> CashFlowResults {
        let flows: Vec<FlowCalculation> = flows
            .iter()
            .map(|f| self.flow_amount(f, year, inflation_rate, plan_start_year))
            .collect();

        let mut total_inflows = Decimal::ZERO;
        let mut total_outflows = Decimal::ZERO;
        let mut nest_egg_net_flow = Decimal::ZERO;
        for flow in flows.iter().filter(|f| f.is_active) {
            let signed = match flow.flow_type {
                FlowType::Inflow => {
                    total_inflows += flow.adjusted_amount;
                    flow.adjusted_amount
                }
                FlowType::Outflow => {
                    total_outflows += flow.adjusted_amount;
                    -flow.adjusted_amount
                }
            };
            if flow.include_in_nest_egg {
                nest_egg_net_flow += signed;
            }
        }

        CashFlowResults {
            flows,
            total_inflows,
            total_outflows,
            net_flow: total_inflows - total_outflows,
            nest_egg_net_flow,
        }
    }

    /// Evaluate and aggregate every income stream for one year.
    pub fn process_income(
        &self,
        streams: &[RetirementIncomeFact],
        year: i32,
        inflation_rate: Decimal,
        plan_start_year: i32,
    ) -> IncomeResults {
        let streams: Vec<IncomeCalculation> = streams
            .iter()
            .map(|s| self.income_amount(s, year, inflation_rate, plan_start_year))
            .collect();

        let total_income = streams
            .iter()
            .filter(|s| s.is_active)
            .map(|s| s.adjusted_amount)
            .sum();
        let nest_egg_income = streams
            .iter()
            .filter(|s| s.is_active && s.include_in_nest_egg)
            .map(|s| s.adjusted_amount)
            .sum();

        IncomeResults {
            streams,
            total_income,
            nest_egg_income,
        }
    }
}

/// Shared activation + inflation arithmetic.
///
/// Elapsed years are measured from the plan's start year, not the item's own
/// start year.
fn adjust(
    base_amount: Decimal,
    is_active: bool,
    apply_inflation: bool,
    inflation_rate: Decimal,
    year: i32,
    plan_start_year: i32,
) -> (Decimal, Decimal) {
    if !is_active {
        return (Decimal::ZERO, Decimal::ZERO);
    }
    if !apply_inflation {
        return (base_amount, Decimal::ZERO);
    }
    let elapsed = (year - plan_start_year).max(0) as u32;
    let adjusted = inflation_adjusted(base_amount, inflation_rate, elapsed);
    (adjusted, adjusted - base_amount)
}
