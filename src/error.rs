//! Error taxonomy for the projection engine
//!
//! Every variant is deterministic given fixed input and fatal to the whole
//! run: validation happens once, before any year is computed. Benign absence
//! (no growth config, no liability interest rate, inactive flow) is normal
//! control flow and never surfaces here.

use thiserror::Error;

/// Fatal configuration, timeline, or input problem detected before projection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Two stepwise growth periods for the same target cover the same year.
    #[error("overlapping stepwise growth periods: {first_start}-{first_end} and {second_start} onward")]
    OverlappingStepwisePeriods {
        first_start: i32,
        first_end: i32,
        second_start: i32,
    },

    /// An open-ended stepwise period must be the last period for its target.
    #[error("stepwise growth config {config_id} is open-ended but not the last period")]
    OpenEndedPeriodNotLast { config_id: u32 },

    /// A scenario override that names no asset, liability, flow, or income.
    #[error("scenario override {override_id} has no target")]
    UnboundOverride { override_id: u32 },

    /// A scenario override that names more than one target.
    #[error("scenario override {override_id} binds {target_count} targets, expected exactly one")]
    AmbiguousOverride { override_id: u32, target_count: usize },

    /// A cash flow whose start year falls after its end year.
    #[error("cash flow {flow_id} has start year {start_year} after end year {end_year}")]
    InvalidFlowYears {
        flow_id: u32,
        start_year: i32,
        end_year: i32,
    },

    /// A retirement income stream whose start age falls after its end age.
    #[error("retirement income {income_id} has start age {start_age} after end age {end_age}")]
    InvalidIncomeAges {
        income_id: u32,
        start_age: u8,
        end_age: u8,
    },

    /// Plan years must flow start < retirement < end.
    #[error("timeline must flow start < retirement < end, got {start_year} / {retirement_year} / {end_year}")]
    InvalidTimeline {
        start_year: i32,
        retirement_year: i32,
        end_year: i32,
    },

    /// A year strictly before plan inception was requested.
    #[error("year {year} is before plan inception ({start_year})")]
    YearBeforePlanStart { year: i32, start_year: i32 },

    /// A projection needs at least one asset or liability.
    #[error("at least one asset or liability is required")]
    EmptyFactSet,

    /// Asset and liability values must be strictly positive.
    #[error("{kind} {id} has non-positive value {value}")]
    NonPositiveValue {
        kind: &'static str,
        id: u32,
        value: String,
    },

    /// Flow and income amounts must be strictly positive.
    #[error("{kind} {id} has non-positive amount {amount}")]
    NonPositiveAmount {
        kind: &'static str,
        id: u32,
        amount: String,
    },

    /// Scenario retirement spending cannot be negative.
    #[error("scenario {scenario_id} has negative retirement spending")]
    NegativeSpending { scenario_id: u32 },
}
