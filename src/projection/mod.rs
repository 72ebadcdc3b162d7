//! Year-by-year projection engine and result types

mod engine;
mod flows;
mod results;
mod state;

pub use engine::BaseFactsProjector;
pub use flows::{
    CashFlowEngine, CashFlowResults, FlowCalculation, IncomeCalculation, IncomeResults,
};
pub use results::{ProjectionSummary, YearMetadata, YearlyCalculationResult};
pub use state::PortfolioValues;
