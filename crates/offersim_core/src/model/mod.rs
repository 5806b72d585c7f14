//! Data model: parameter bundle, offer specification, usage distributions,
//! and result types.

pub mod offer;
pub mod params;
pub mod results;
pub mod usage;

pub use offer::OfferSpec;
pub use params::ParameterSet;
pub use results::{
    AggregateResult, Histogram, OfferOutcome, PeriodRecord, ReplicateResult, SensitivityRecord,
};
pub use usage::{UsageConfig, UsageDistribution, UsageSegment};
