//! Growth rate resolution and application

mod resolver;

pub use resolver::{liability_interest, GrowthRateResolver, GrowthResult, RateSource, ResolvedRate};
