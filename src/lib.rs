//! Planning System - Deterministic household financial projection engine
//!
//! This library provides:
//! - Year-by-year base-facts projections (assets, liabilities, cash flows,
//!   retirement income) from plan inception to a final horizon
//! - Multi-source growth rate resolution with stepwise, override, and
//!   default precedence
//! - Fixed-precision decimal compounding that holds up across decades
//! - Non-destructive what-if scenario overlays with retirement spending
//!   draw-down
//! - Parallel evaluation of independent scenarios over one base projection

pub mod error;
pub mod facts;
pub mod growth;
pub mod money;
pub mod projection;
pub mod scenario;
pub mod time;

// Re-export commonly used types
pub use error::EngineError;
pub use facts::{BaseAssumptions, BaseFacts};
pub use growth::{GrowthRateResolver, RateSource};
pub use projection::{
    BaseFactsProjector, PortfolioValues, ProjectionSummary, YearlyCalculationResult,
};
pub use scenario::{ScenarioCalculationResult, ScenarioCalculator, ScenarioFact, ScenarioRunner};
