//! Sensitivity analysis via central finite differences.
//!
//! Estimates the gradient of expected profit with respect to a fixed list of
//! offer dimensions and model parameters. Both sides of every difference use
//! the same base seed, so the finite-difference noise comes only from the
//! perturbation itself, not from independent sampling.

use crate::aggregate::{Parallelism, simulate_offer_with};
use crate::error::SimResult;
use crate::model::{OfferSpec, ParameterSet, SensitivityRecord};

/// A parameter the sensitivity engine differentiates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitivityTarget {
    Price,
    DataAllowance,
    VoiceAllowance,
    ValidityDays,
    BetaData,
    BetaVoice,
    BetaPrice,
    BetaValidity,
    CostPerGb3g,
    CostPerGb4g,
    CostPerGb5g,
    CostPerMinute,
    BaseRenewalRate,
}

impl SensitivityTarget {
    pub const ALL: [SensitivityTarget; 13] = [
        SensitivityTarget::Price,
        SensitivityTarget::DataAllowance,
        SensitivityTarget::VoiceAllowance,
        SensitivityTarget::ValidityDays,
        SensitivityTarget::BetaData,
        SensitivityTarget::BetaVoice,
        SensitivityTarget::BetaPrice,
        SensitivityTarget::BetaValidity,
        SensitivityTarget::CostPerGb3g,
        SensitivityTarget::CostPerGb4g,
        SensitivityTarget::CostPerGb5g,
        SensitivityTarget::CostPerMinute,
        SensitivityTarget::BaseRenewalRate,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SensitivityTarget::Price => "price",
            SensitivityTarget::DataAllowance => "data_gb",
            SensitivityTarget::VoiceAllowance => "voice_min",
            SensitivityTarget::ValidityDays => "validity_days",
            SensitivityTarget::BetaData => "beta_data",
            SensitivityTarget::BetaVoice => "beta_voice",
            SensitivityTarget::BetaPrice => "beta_price",
            SensitivityTarget::BetaValidity => "beta_validity",
            SensitivityTarget::CostPerGb3g => "cost_per_gb_3g",
            SensitivityTarget::CostPerGb4g => "cost_per_gb_4g",
            SensitivityTarget::CostPerGb5g => "cost_per_gb_5g",
            SensitivityTarget::CostPerMinute => "cost_per_minute",
            SensitivityTarget::BaseRenewalRate => "base_renewal_rate",
        }
    }

    /// Perturbation step. Validity, an integer field, moves by one day.
    #[must_use]
    pub fn step(&self) -> f64 {
        match self {
            SensitivityTarget::Price => 1.0,
            SensitivityTarget::DataAllowance => 0.1,
            SensitivityTarget::VoiceAllowance => 5.0,
            SensitivityTarget::ValidityDays => 1.0,
            SensitivityTarget::BetaData => 0.01,
            SensitivityTarget::BetaVoice => 0.01,
            SensitivityTarget::BetaPrice => 0.005,
            SensitivityTarget::BetaValidity => 0.01,
            SensitivityTarget::CostPerGb3g => 0.5,
            SensitivityTarget::CostPerGb4g => 0.5,
            SensitivityTarget::CostPerGb5g => 0.5,
            SensitivityTarget::CostPerMinute => 0.1,
            SensitivityTarget::BaseRenewalRate => 0.05,
        }
    }

    /// Build the (offer, parameters) pair with this target moved by `delta`.
    /// Continuous offer fields floor at 0.01 on the negative side; validity
    /// floors at one day.
    fn apply(&self, offer: &OfferSpec, params: &ParameterSet, delta: f64) -> (OfferSpec, ParameterSet) {
        let mut offer = offer.clone();
        let mut params = params.clone();
        match self {
            SensitivityTarget::Price => offer.price = perturb_offer_field(offer.price, delta),
            SensitivityTarget::DataAllowance => {
                offer.data_gb = perturb_offer_field(offer.data_gb, delta);
            }
            SensitivityTarget::VoiceAllowance => {
                offer.voice_min = perturb_offer_field(offer.voice_min, delta);
            }
            SensitivityTarget::ValidityDays => {
                let shifted = i64::from(offer.validity_days) + delta.signum() as i64;
                offer.validity_days = shifted.max(1) as u32;
            }
            SensitivityTarget::BetaData => params.beta_data += delta,
            SensitivityTarget::BetaVoice => params.beta_voice += delta,
            SensitivityTarget::BetaPrice => params.beta_price += delta,
            SensitivityTarget::BetaValidity => params.beta_validity += delta,
            SensitivityTarget::CostPerGb3g => params.cost_per_gb[0] += delta,
            SensitivityTarget::CostPerGb4g => params.cost_per_gb[1] += delta,
            SensitivityTarget::CostPerGb5g => params.cost_per_gb[2] += delta,
            SensitivityTarget::CostPerMinute => params.cost_per_minute += delta,
            SensitivityTarget::BaseRenewalRate => params.base_renewal_rate += delta,
        }
        (offer, params)
    }
}

fn perturb_offer_field(value: f64, delta: f64) -> f64 {
    if delta < 0.0 {
        (value + delta).max(0.01)
    } else {
        value + delta
    }
}

/// Estimate `dE[profit]/d(theta)` for every target via central differences,
/// each side re-running the aggregator with the same base seed. Records are
/// sorted by descending absolute gradient.
///
/// `n_replicates` is meant to be smaller than the primary run's count; each
/// evaluation runs sequentially to keep the total cost bounded.
pub fn compute_sensitivity(
    offer: &OfferSpec,
    params: &ParameterSet,
    n_replicates: usize,
    base_seed: u64,
) -> SimResult<Vec<SensitivityRecord>> {
    params.validate()?;
    offer.validate()?;

    let mut records = Vec::with_capacity(SensitivityTarget::ALL.len());
    for target in SensitivityTarget::ALL {
        let step = target.step();

        let (offer_plus, params_plus) = target.apply(offer, params, step);
        let (offer_minus, params_minus) = target.apply(offer, params, -step);

        let e_plus = expected_profit(&offer_plus, &params_plus, n_replicates, base_seed)?;
        let e_minus = expected_profit(&offer_minus, &params_minus, n_replicates, base_seed)?;

        let gradient = (e_plus - e_minus) / (2.0 * step);
        records.push(SensitivityRecord {
            parameter: target.name().to_string(),
            gradient,
            abs_gradient: gradient.abs(),
        });
    }

    records.sort_by(|a, b| {
        b.abs_gradient
            .partial_cmp(&a.abs_gradient)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(records)
}

fn expected_profit(
    offer: &OfferSpec,
    params: &ParameterSet,
    n_replicates: usize,
    base_seed: u64,
) -> SimResult<f64> {
    let aggregate =
        simulate_offer_with(offer, params, n_replicates, base_seed, Parallelism::Sequential)?;
    Ok(aggregate.expected_profit)
}
