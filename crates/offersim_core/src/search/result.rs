//! Result types produced by the tiered offer search.

use serde::{Deserialize, Serialize};

use crate::model::{AggregateResult, OfferOutcome, OfferSpec};

/// A single candidate evaluation during the search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEvaluation {
    pub price: f64,
    pub data_gb: f64,
    pub voice_min: f64,
    pub validity_days: u32,
    pub risk_adjusted_profit: f64,
}

/// The evaluation history of one search, in evaluation order, alongside the
/// running best objective.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchTrace {
    pub evaluations: Vec<SearchEvaluation>,
    pub best_so_far: Vec<f64>,
}

impl SearchTrace {
    pub fn record(&mut self, evaluation: SearchEvaluation) {
        let best = match self.best_so_far.last() {
            Some(prev) => prev.max(evaluation.risk_adjusted_profit),
            None => evaluation.risk_adjusted_profit,
        };
        self.best_so_far.push(best);
        self.evaluations.push(evaluation);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }
}

/// The winner of one sub-range of the search space, re-simulated at full
/// resolution.
#[derive(Debug, Clone, Serialize)]
pub struct TierResult {
    pub label: String,
    pub best_offer: OfferSpec,
    pub result: AggregateResult,
    pub trace: SearchTrace,
}

/// A sub-range the search could not explore, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedTier {
    pub label: String,
    pub reason: String,
}

/// Full outcome of a tiered search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Overall winner across all tiers.
    pub best_offer: OfferSpec,
    /// Full-resolution simulation of the winner.
    pub result: AggregateResult,
    /// Running best objective of the winning tier's own search.
    pub best_so_far: Vec<f64>,
    /// Every candidate evaluation across all tiers, in tier order.
    pub evaluation_log: Vec<SearchEvaluation>,
    /// Total candidate evaluations performed.
    pub evaluations: usize,
    /// Tier winners ranked by risk-adjusted profit, best first.
    pub ranked_offers: Vec<OfferOutcome>,
    pub tiers: Vec<TierResult>,
    pub skipped_tiers: Vec<SkippedTier>,
}
