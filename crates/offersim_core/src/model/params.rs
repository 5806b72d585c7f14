//! The immutable market/economic/statistical parameter bundle shared by all
//! replicates of a simulation call.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::model::usage::UsageConfig;

/// Everything that drives the stochastic sub-models. Constructed once by the
/// caller, read-only for the duration of a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    /// Potential customers in the addressable market.
    pub market_size: u64,
    /// Simulation horizon in days.
    pub horizon_days: u32,
    /// Daily discount rate applied to period profits.
    pub discount_rate: f64,

    // Acquisition utility coefficients.
    pub beta_data: f64,
    pub beta_voice: f64,
    pub beta_price: f64,
    pub beta_validity: f64,
    /// Std-dev of the population-level utility noise (one draw per replicate).
    pub utility_noise: f64,

    /// Data/voice consumption model.
    pub usage: UsageConfig,

    /// Operator cost per GB on each network type (3G/4G/5G order).
    pub cost_per_gb: [f64; 3],
    /// Population share per network type, re-normalized before use.
    pub network_shares: [f64; 3],
    /// Operator cost per voice minute.
    pub cost_per_minute: f64,

    /// Overage price charged to the customer per GB beyond the allowance.
    pub overage_price_data: f64,
    /// Overage price charged per minute beyond the allowance.
    pub overage_price_voice: f64,

    // Renewal behavior.
    pub enable_renewal: bool,
    pub base_renewal_rate: f64,
    /// Renewal-rate decay per elapsed period.
    pub renewal_decay: f64,
    /// Lower clamp on the renewal probability. Policy knob, not hard-coded.
    pub renewal_floor: f64,

    /// Risk aversion coefficient lambda.
    pub risk_lambda: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            market_size: 10_000,
            horizon_days: 90,
            discount_rate: 0.01,
            beta_data: 0.5,
            beta_voice: 0.3,
            beta_price: 0.05,
            beta_validity: 0.2,
            utility_noise: 1.0,
            usage: UsageConfig::default(),
            cost_per_gb: [2.0, 5.0, 10.0],
            network_shares: [0.3, 0.5, 0.2],
            cost_per_minute: 0.5,
            overage_price_data: 15.0,
            overage_price_voice: 1.5,
            enable_renewal: true,
            base_renewal_rate: 0.6,
            renewal_decay: 0.05,
            renewal_floor: 0.0,
            risk_lambda: 0.5,
        }
    }
}

impl ParameterSet {
    /// Check the structural invariants that must hold before any replicate
    /// runs: both probability triples must be non-negative and normalizable.
    pub fn validate(&self) -> SimResult<()> {
        normalize_triple(self.usage.weights()).ok_or_else(|| {
            SimError::InvalidParameter(
                "usage segment weights must be non-negative and sum to a positive value"
                    .to_string(),
            )
        })?;
        normalize_triple(self.network_shares).ok_or_else(|| {
            SimError::InvalidParameter(
                "network shares must be non-negative and sum to a positive value".to_string(),
            )
        })?;
        if !self.utility_noise.is_finite() || self.utility_noise < 0.0 {
            return Err(SimError::InvalidParameter(
                "utility noise scale must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Network shares re-normalized to sum to 1. Call `validate` first.
    #[must_use]
    pub(crate) fn normalized_network_shares(&self) -> [f64; 3] {
        normalize_triple(self.network_shares).unwrap_or([0.0; 3])
    }

    /// Usage segment weights re-normalized to sum to 1. Call `validate` first.
    #[must_use]
    pub(crate) fn normalized_segment_weights(&self) -> [f64; 3] {
        normalize_triple(self.usage.weights()).unwrap_or([0.0; 3])
    }
}

/// Re-normalize a probability triple. Returns `None` when any entry is
/// negative/non-finite or the sum is not positive.
pub(crate) fn normalize_triple(triple: [f64; 3]) -> Option<[f64; 3]> {
    if triple.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return None;
    }
    let sum: f64 = triple.iter().sum();
    if sum <= 0.0 {
        return None;
    }
    Some([triple[0] / sum, triple[1] / sum, triple[2] / sum])
}
