//! Plan facts: immutable inputs, validation, and loading

mod data;
pub mod loader;
mod validation;

pub use data::{
    AssetFact, BaseAssumptions, BaseFacts, CashFlowFact, FlowType, GrowthRateConfiguration,
    LiabilityFact, Owner, RateKind, RateTarget, RetirementIncomeFact,
};
pub use loader::{load_plan, sample_plan, LoadError, PlanFile};
pub use validation::{validate_base_facts, validate_stepwise_layout, validate_timeline};
