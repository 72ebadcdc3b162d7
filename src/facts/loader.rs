//! Plan file loading
//!
//! The engine itself performs no I/O; this module is the boundary where a
//! persisted plan (facts, assumptions, scenario definitions) is read from a
//! JSON file into the in-memory fact structures, plus a built-in sample plan
//! for the CLI and tests.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::data::{
    AssetFact, BaseAssumptions, BaseFacts, CashFlowFact, FlowType, GrowthRateConfiguration,
    LiabilityFact, Owner, RetirementIncomeFact,
};
use crate::scenario::{ScenarioAssumptions, ScenarioDefinition};

/// Failure while reading a plan file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read plan file: {0}")]
    Io(#[from] std::io::Error),

    #[error("plan file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk shape of a complete plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanFile {
    pub plan_name: String,

    /// Plan inception year; the first projected year
    pub start_year: i32,

    pub assumptions: BaseAssumptions,

    pub assets: Vec<AssetFact>,

    #[serde(default)]
    pub liabilities: Vec<LiabilityFact>,

    #[serde(default)]
    pub cash_flows: Vec<CashFlowFact>,

    #[serde(default)]
    pub retirement_income: Vec<RetirementIncomeFact>,

    #[serde(default)]
    pub scenarios: Vec<ScenarioDefinition>,
}

impl PlanFile {
    /// Split into engine inputs: base facts plus scenario definitions.
    ///
    /// Retirement and end years are derived from the assumptions' DOB and
    /// ages, the same way the upstream plan layer derives them.
    pub fn into_parts(self) -> (BaseFacts, Vec<ScenarioDefinition>) {
        let facts = BaseFacts::from_plan_inception(
            self.start_year,
            self.assumptions,
            self.assets,
            self.liabilities,
            self.cash_flows,
            self.retirement_income,
        );
        (facts, self.scenarios)
    }
}

/// Load a plan from a JSON file.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<PlanFile, LoadError> {
    let file = File::open(path)?;
    let plan = serde_json::from_reader(BufReader::new(file))?;
    Ok(plan)
}

/// A realistic built-in household plan for demos and tests.
///
/// Household of two, primary born 1970, plan inception 2025, retirement at
/// 65 (2035), horizon at 95 (2065).
pub fn sample_plan() -> PlanFile {
    let dob_primary = NaiveDate::from_ymd_opt(1970, 6, 15).unwrap();
    let dob_partner = NaiveDate::from_ymd_opt(1972, 2, 3).unwrap();

    PlanFile {
        plan_name: "sample household".to_string(),
        start_year: 2025,
        assumptions: BaseAssumptions {
            default_growth_rate: dec!(0.06),
            inflation_rate: dec!(0.03),
            retirement_age: 65,
            final_age: 95,
            date_of_birth: dob_primary,
        },
        assets: vec![
            AssetFact::new(1, 1, "401k", Owner::Person1, dec!(450000)).with_growth_rates(vec![
                // conservative glide from 2030
                GrowthRateConfiguration::stepwise_for_asset(1, 1, 2030, Some(2034), dec!(0.05)),
                GrowthRateConfiguration::stepwise_for_asset(2, 1, 2035, None, dec!(0.04)),
            ]),
            AssetFact::new(2, 1, "brokerage", Owner::Joint, dec!(120000)).with_growth_rates(vec![
                GrowthRateConfiguration::override_for_asset(3, 2, 2025, dec!(0.055)),
            ]),
            AssetFact {
                include_in_nest_egg: false,
                ..AssetFact::new(3, 2, "house", Owner::Joint, dec!(380000))
            },
        ],
        liabilities: vec![
            LiabilityFact::new(1, 1, "mortgage", Owner::Joint, dec!(240000))
                .with_interest_rate(dec!(0.045)),
            LiabilityFact {
                include_in_nest_egg: false,
                ..LiabilityFact::new(2, 2, "car loan", Owner::Person2, dec!(18000))
            },
        ],
        cash_flows: vec![
            CashFlowFact {
                flow_id: 1,
                name: "college tuition".to_string(),
                flow_type: FlowType::Outflow,
                owner: Owner::Joint,
                annual_amount: dec!(28000),
                start_year: 2030,
                end_year: Some(2033),
                apply_inflation: true,
                include_in_nest_egg: true,
            },
            CashFlowFact {
                flow_id: 2,
                name: "inheritance".to_string(),
                flow_type: FlowType::Inflow,
                owner: Owner::Person1,
                annual_amount: dec!(150000),
                start_year: 2032,
                end_year: None,
                apply_inflation: false,
                include_in_nest_egg: true,
            },
        ],
        retirement_income: vec![
            RetirementIncomeFact {
                income_id: 1,
                name: "social security".to_string(),
                owner: Owner::Person1,
                annual_income: dec!(32000),
                start_age: 67,
                end_age: None,
                apply_inflation: true,
                include_in_nest_egg: true,
                date_of_birth: dob_primary,
            },
            RetirementIncomeFact {
                income_id: 2,
                name: "pension".to_string(),
                owner: Owner::Person2,
                annual_income: dec!(18000),
                start_age: 62,
                end_age: Some(80),
                apply_inflation: false,
                include_in_nest_egg: true,
                date_of_birth: dob_partner,
            },
        ],
        scenarios: vec![ScenarioDefinition {
            scenario_id: 1,
            name: "retire at 60".to_string(),
            retirement_spending: dec!(60000),
            assumptions: Some(ScenarioAssumptions {
                retirement_age: Some(60),
                default_growth_rate: None,
                inflation_rate: None,
            }),
            overrides: vec![],
        }],
    }
}
