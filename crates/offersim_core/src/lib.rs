//! Telecom offer profitability simulation library
//!
//! This crate provides a Monte Carlo engine for estimating the profit of a
//! prepaid telecom offer and for searching offer parameter space. It
//! supports:
//! - Stochastic subscriber acquisition from a logistic utility model
//! - Segmented data/voice usage mixtures with configurable distributions
//! - Per-network-type cost modeling and overage revenue
//! - Multi-period renewal dynamics with decaying retention
//! - Risk-adjusted profit, confidence intervals, and convergence tracking
//! - A ten-tier offer ladder derived from an anchor offer
//! - Central-difference sensitivity analysis over model parameters
//! - A tiered black-box search for the most profitable offer
//!
//! # Quick start
//!
//! ```ignore
//! use offersim_core::{simulate_offer, OfferSpec, ParameterSet};
//!
//! let params = ParameterSet::default();
//! let offer = OfferSpec {
//!     data_gb: 2.0,
//!     voice_min: 100.0,
//!     validity_days: 28,
//!     price: 199.0,
//!     label: "Standard".to_string(),
//! };
//! let result = simulate_offer(&offer, &params, 1_000, 42)?;
//! println!("expected profit: {:.2}", result.expected_profit);
//! # Ok::<(), offersim_core::SimError>(())
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod error;
pub mod risk;
pub mod search;
pub mod sensitivity;
pub mod simulation;
pub mod tiers;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use aggregate::{Parallelism, simulate_offer, simulate_offer_with};
pub use error::{DistributionError, SimError, SimResult};
pub use model::{
    AggregateResult, Histogram, OfferOutcome, OfferSpec, ParameterSet, PeriodRecord,
    ReplicateResult, SensitivityRecord, UsageConfig, UsageDistribution, UsageSegment,
};
pub use search::{
    EvaluationBudget, Minimizer, NelderMeadMinimizer, SearchBounds, SearchOutcome,
    search_optimal_offer, search_optimal_offer_with,
};
pub use sensitivity::{SensitivityTarget, compute_sensitivity};
pub use simulation::run_replicate;
pub use tiers::generate_offer_tiers;
