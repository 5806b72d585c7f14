//! JSON request shapes for the command-line interface.
//!
//! Every field is defaulted so a request file only needs to name what it
//! changes. An empty object `{}` is a valid request for every command.

use serde::Deserialize;

use offersim_core::model::{OfferSpec, ParameterSet};
use offersim_core::search::{EvaluationBudget, SearchBounds};

fn default_n_simulations() -> usize {
    1_000
}

fn default_seed() -> u64 {
    42
}

/// Shared simulation inputs: an offer, the model parameters, and the run
/// controls.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulateRequest {
    pub offer: OfferSpec,
    pub params: ParameterSet,
    pub n_simulations: usize,
    pub seed: u64,
}

impl Default for SimulateRequest {
    fn default() -> Self {
        Self {
            offer: OfferSpec::default(),
            params: ParameterSet::default(),
            n_simulations: default_n_simulations(),
            seed: default_seed(),
        }
    }
}

/// Tier ladder generation around an anchor offer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TiersRequest {
    pub anchor: OfferSpec,
    pub params: ParameterSet,
    pub n_simulations: usize,
    pub seed: u64,
}

impl Default for TiersRequest {
    fn default() -> Self {
        Self {
            anchor: OfferSpec::default(),
            params: ParameterSet::default(),
            n_simulations: default_n_simulations(),
            seed: default_seed(),
        }
    }
}

fn default_sensitivity_simulations() -> usize {
    200
}

/// Sensitivity analysis around an offer. Uses a smaller default replicate
/// count since every target costs two full aggregations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensitivityRequest {
    pub offer: OfferSpec,
    pub params: ParameterSet,
    pub n_simulations: usize,
    pub seed: u64,
}

impl Default for SensitivityRequest {
    fn default() -> Self {
        Self {
            offer: OfferSpec::default(),
            params: ParameterSet::default(),
            n_simulations: default_sensitivity_simulations(),
            seed: default_seed(),
        }
    }
}

/// Tiered search over offer parameter space.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub params: ParameterSet,
    pub bounds: SearchBounds,
    pub budget: EvaluationBudget,
    pub n_simulations: usize,
    pub seed: u64,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            params: ParameterSet::default(),
            bounds: SearchBounds::default(),
            budget: EvaluationBudget::default(),
            n_simulations: default_n_simulations(),
            seed: default_seed(),
        }
    }
}
