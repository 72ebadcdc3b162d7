//! Pre-flight validation of plan facts
//!
//! Runs once per projection, before any year is computed; every failure is
//! fatal to the whole run. The engine itself never re-checks these
//! conditions lazily.

use rust_decimal::Decimal;

use super::data::{BaseFacts, GrowthRateConfiguration, RateKind};
use crate::error::EngineError;

/// Validate the full fact set ahead of a projection run.
///
/// Checks, in order: the fact set is non-empty, the timeline is ordered,
/// every asset/liability value and flow/income amount is strictly positive,
/// flow and income ranges are chronological, and stepwise growth layouts are
/// well-formed.
pub fn validate_base_facts(facts: &BaseFacts) -> Result<(), EngineError> {
    if facts.assets.is_empty() && facts.liabilities.is_empty() {
        return Err(EngineError::EmptyFactSet);
    }

    validate_timeline(facts.start_year, facts.retirement_year, facts.end_year)?;

    for asset in &facts.assets {
        require_positive_value("asset", asset.asset_id, asset.value)?;
        validate_stepwise_layout(&asset.growth_rates)?;
    }

    for liability in &facts.liabilities {
        require_positive_value("liability", liability.liability_id, liability.value)?;
    }

    for flow in &facts.cash_flows {
        if flow.annual_amount <= Decimal::ZERO {
            return Err(EngineError::NonPositiveAmount {
                kind: "cash flow",
                id: flow.flow_id,
                amount: flow.annual_amount.to_string(),
            });
        }
        if let Some(end_year) = flow.end_year {
            if flow.start_year > end_year {
                return Err(EngineError::InvalidFlowYears {
                    flow_id: flow.flow_id,
                    start_year: flow.start_year,
                    end_year,
                });
            }
        }
    }

    for income in &facts.retirement_income {
        if income.annual_income <= Decimal::ZERO {
            return Err(EngineError::NonPositiveAmount {
                kind: "retirement income",
                id: income.income_id,
                amount: income.annual_income.to_string(),
            });
        }
        if let Some(end_age) = income.end_age {
            if income.start_age > end_age {
                return Err(EngineError::InvalidIncomeAges {
                    income_id: income.income_id,
                    start_age: income.start_age,
                    end_age,
                });
            }
        }
    }

    Ok(())
}

/// Timeline must flow start < retirement < end.
pub fn validate_timeline(start_year: i32, retirement_year: i32, end_year: i32) -> Result<(), EngineError> {
    if start_year < retirement_year && retirement_year < end_year {
        Ok(())
    } else {
        Err(EngineError::InvalidTimeline {
            start_year,
            retirement_year,
            end_year,
        })
    }
}

/// Stepwise periods within one config list must not overlap, and only the
/// last period may be open-ended.
pub fn validate_stepwise_layout(configs: &[GrowthRateConfiguration]) -> Result<(), EngineError> {
    let mut stepwise: Vec<&GrowthRateConfiguration> = configs
        .iter()
        .filter(|c| c.kind == RateKind::Stepwise)
        .collect();
    stepwise.sort_by_key(|c| c.start_year);

    for pair in stepwise.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        match current.end_year {
            None => {
                return Err(EngineError::OpenEndedPeriodNotLast {
                    config_id: current.config_id,
                })
            }
            Some(end) if end >= next.start_year => {
                return Err(EngineError::OverlappingStepwisePeriods {
                    first_start: current.start_year,
                    first_end: end,
                    second_start: next.start_year,
                })
            }
            Some(_) => {}
        }
    }

    Ok(())
}

fn require_positive_value(kind: &'static str, id: u32, value: Decimal) -> Result<(), EngineError> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(EngineError::NonPositiveValue {
            kind,
            id,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::data::{AssetFact, BaseAssumptions, CashFlowFact, FlowType, Owner};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn assumptions() -> BaseAssumptions {
        BaseAssumptions {
            default_growth_rate: dec!(0.06),
            inflation_rate: dec!(0.03),
            retirement_age: 65,
            final_age: 95,
            date_of_birth: NaiveDate::from_ymd_opt(1970, 6, 15).unwrap(),
        }
    }

    fn minimal_facts() -> BaseFacts {
        BaseFacts {
            assets: vec![AssetFact::new(1, 1, "401k", Owner::Person1, dec!(100000))],
            liabilities: vec![],
            cash_flows: vec![],
            retirement_income: vec![],
            assumptions: assumptions(),
            start_year: 2025,
            retirement_year: 2035,
            end_year: 2065,
        }
    }

    #[test]
    fn test_valid_facts_pass() {
        assert!(validate_base_facts(&minimal_facts()).is_ok());
    }

    #[test]
    fn test_empty_fact_set_rejected() {
        let mut facts = minimal_facts();
        facts.assets.clear();
        assert_eq!(validate_base_facts(&facts), Err(EngineError::EmptyFactSet));
    }

    #[test]
    fn test_timeline_ordering_enforced() {
        assert!(validate_timeline(2025, 2035, 2065).is_ok());
        assert!(validate_timeline(2035, 2025, 2065).is_err());
        assert!(validate_timeline(2025, 2065, 2065).is_err());
        assert!(validate_timeline(2025, 2025, 2065).is_err());
    }

    #[test]
    fn test_non_positive_asset_rejected() {
        let mut facts = minimal_facts();
        facts.assets[0].value = dec!(0);
        assert!(matches!(
            validate_base_facts(&facts),
            Err(EngineError::NonPositiveValue { kind: "asset", .. })
        ));
    }

    #[test]
    fn test_inverted_flow_years_rejected() {
        let mut facts = minimal_facts();
        facts.cash_flows.push(CashFlowFact {
            flow_id: 5,
            name: "college".to_string(),
            flow_type: FlowType::Outflow,
            owner: Owner::Joint,
            annual_amount: dec!(20000),
            start_year: 2033,
            end_year: Some(2030),
            apply_inflation: false,
            include_in_nest_egg: true,
        });
        assert_eq!(
            validate_base_facts(&facts),
            Err(EngineError::InvalidFlowYears {
                flow_id: 5,
                start_year: 2033,
                end_year: 2030
            })
        );
    }

    #[test]
    fn test_overlapping_stepwise_rejected() {
        use crate::facts::data::GrowthRateConfiguration as Config;
        let configs = vec![
            Config::stepwise_for_asset(1, 1, 2025, Some(2028), dec!(0.08)),
            Config::stepwise_for_asset(2, 1, 2028, Some(2030), dec!(0.05)),
        ];
        assert!(matches!(
            validate_stepwise_layout(&configs),
            Err(EngineError::OverlappingStepwisePeriods { .. })
        ));
    }

    #[test]
    fn test_open_ended_must_be_last() {
        use crate::facts::data::GrowthRateConfiguration as Config;
        let configs = vec![
            Config::stepwise_for_asset(1, 1, 2025, None, dec!(0.08)),
            Config::stepwise_for_asset(2, 1, 2030, Some(2032), dec!(0.05)),
        ];
        assert_eq!(
            validate_stepwise_layout(&configs),
            Err(EngineError::OpenEndedPeriodNotLast { config_id: 1 })
        );

        // open-ended in last position is fine
        let configs = vec![
            Config::stepwise_for_asset(1, 1, 2025, Some(2028), dec!(0.08)),
            Config::stepwise_for_asset(2, 1, 2029, None, dec!(0.05)),
        ];
        assert!(validate_stepwise_layout(&configs).is_ok());
    }
}
