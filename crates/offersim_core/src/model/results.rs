//! Result types produced by simulation, aggregation, sensitivity analysis,
//! and tier comparison.

use serde::{Deserialize, Serialize};

use crate::model::offer::OfferSpec;

/// One validity period of one replicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based period index.
    pub period: usize,
    pub active_users: u64,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    /// Running undiscounted cumulative profit.
    pub cumulative_profit: f64,
}

/// Result of a single replicate: the discounted total profit and the ordered
/// per-period ledger. The ledger may be shorter than the nominal period count
/// when active customers hit zero early.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicateResult {
    pub total_profit: f64,
    pub periods: Vec<PeriodRecord>,
}

/// Fixed-bin histogram of the profit samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, one more than the number of counts.
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

/// Summary statistics over all replicates of one aggregation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub expected_profit: f64,
    pub variance: f64,
    pub std_dev: f64,
    /// 95% confidence half-width, `1.96 * std_dev / sqrt(M)`.
    pub ci_half_width: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub risk_adjusted_profit: f64,
    /// Raw profit samples in replicate index order, truncated for transport.
    pub profit_samples: Vec<f64>,
    pub histogram: Histogram,
    /// Running mean after each replicate, in index order.
    pub convergence: Vec<f64>,
    /// Per-period averages over the replicates that reached each period.
    /// Later periods average over the surviving replicates only.
    pub period_breakdown: Vec<PeriodRecord>,
    /// Longest period ledger observed across replicates.
    pub total_periods: usize,
    pub n_simulations_run: usize,
    pub seed_used: u64,
}

/// Sensitivity of expected profit to one named parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRecord {
    pub parameter: String,
    pub gradient: f64,
    pub abs_gradient: f64,
}

/// The ranking-relevant subset of an offer's aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferOutcome {
    pub label: String,
    pub data_gb: f64,
    pub voice_min: f64,
    pub validity_days: u32,
    pub price: f64,
    pub expected_profit: f64,
    pub risk_adjusted_profit: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl OfferOutcome {
    #[must_use]
    pub fn from_aggregate(offer: &OfferSpec, aggregate: &AggregateResult) -> Self {
        Self {
            label: offer.label.clone(),
            data_gb: offer.data_gb,
            voice_min: offer.voice_min,
            validity_days: offer.validity_days,
            price: offer.price,
            expected_profit: aggregate.expected_profit,
            risk_adjusted_profit: aggregate.risk_adjusted_profit,
            ci_lower: aggregate.ci_lower,
            ci_upper: aggregate.ci_upper,
            variance: aggregate.variance,
            std_dev: aggregate.std_dev,
        }
    }
}
