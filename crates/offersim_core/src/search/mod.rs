//! Tiered offer search.
//!
//! Splits each dimension of the search space into three equal sub-ranges
//! (Budget, Standard, Premium) and runs an independent black-box
//! minimization in each. Candidates are scored at reduced replication for
//! speed; each tier winner is then re-simulated at full resolution, and the
//! overall best offer is chosen by full-resolution risk-adjusted profit.

mod minimizer;
mod nelder_mead;
mod result;

pub use minimizer::{DimensionBounds, EvaluationBudget, Minimizer, MinimizerOutcome, Objective};
pub use nelder_mead::NelderMeadMinimizer;
pub use result::{SearchEvaluation, SearchOutcome, SearchTrace, SkippedTier, TierResult};

use crate::aggregate::{simulate_offer_with, Parallelism, SEED_STRIDE};
use crate::error::{SimError, SimResult};
use crate::model::{OfferOutcome, OfferSpec, ParameterSet};

use serde::{Deserialize, Serialize};

/// Outer bounds of the search space, split into tiers per dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBounds {
    pub price: (f64, f64),
    pub data_gb: (f64, f64),
    pub voice_min: (f64, f64),
    pub validity_days: (u32, u32),
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            price: (10.0, 500.0),
            data_gb: (0.1, 50.0),
            voice_min: (0.0, 1000.0),
            validity_days: (1, 90),
        }
    }
}

/// Tier sub-ranges as fractions of each full dimension.
const TIER_FRACTIONS: [(&str, f64, f64); 3] = [
    ("Budget", 0.0, 1.0 / 3.0),
    ("Standard", 1.0 / 3.0, 2.0 / 3.0),
    ("Premium", 2.0 / 3.0, 1.0),
];

/// Search with the default Nelder-Mead minimizer.
pub fn search_optimal_offer(
    params: &ParameterSet,
    bounds: &SearchBounds,
    n_simulations: usize,
    base_seed: u64,
    budget: &EvaluationBudget,
) -> SimResult<SearchOutcome> {
    search_optimal_offer_with(&NelderMeadMinimizer, params, bounds, n_simulations, base_seed, budget)
}

/// Search with a caller-supplied minimizer.
///
/// Tiers whose bounds collapse to an unsearchable range, or whose
/// minimization fails, are skipped and reported in the outcome. If every
/// tier is skipped the search fails with [`SimError::SearchExhausted`].
/// Simulation faults inside a candidate evaluation abort the whole search.
pub fn search_optimal_offer_with(
    minimizer: &dyn Minimizer,
    params: &ParameterSet,
    bounds: &SearchBounds,
    n_simulations: usize,
    base_seed: u64,
    budget: &EvaluationBudget,
) -> SimResult<SearchOutcome> {
    params.validate()?;
    if n_simulations == 0 {
        return Err(SimError::InvalidParameter(
            "n_simulations must be at least 1".to_string(),
        ));
    }

    // Candidates are scored cheaply; winners get the full budget below.
    let candidate_m = (n_simulations / 4).max(1);

    let mut tiers: Vec<TierResult> = Vec::new();
    let mut skipped_tiers: Vec<SkippedTier> = Vec::new();

    for (tier_idx, (label, lo, hi)) in TIER_FRACTIONS.iter().enumerate() {
        let tier_bounds = tier_dimension_bounds(bounds, *lo, *hi);
        if let Some(dim) = tier_bounds.iter().position(DimensionBounds::is_degenerate) {
            skipped_tiers.push(SkippedTier {
                label: (*label).to_string(),
                reason: format!("degenerate bounds in dimension {dim}"),
            });
            continue;
        }

        let mut trace = SearchTrace::default();
        let mut eval_idx: u64 = 0;
        let mut objective = |x: &[f64]| -> SimResult<f64> {
            let offer = candidate_offer(x, label, eval_idx);
            let seed = base_seed.wrapping_add(eval_idx.wrapping_mul(SEED_STRIDE));
            eval_idx += 1;
            let aggregate = simulate_offer_with(
                &offer,
                params,
                candidate_m,
                seed,
                Parallelism::Sequential,
            )?;
            trace.record(SearchEvaluation {
                price: offer.price,
                data_gb: offer.data_gb,
                voice_min: offer.voice_min,
                validity_days: offer.validity_days,
                risk_adjusted_profit: aggregate.risk_adjusted_profit,
            });
            Ok(-aggregate.risk_adjusted_profit)
        };

        let tier_seed = base_seed.wrapping_add(tier_idx as u64);
        let outcome = match minimizer.minimize(&mut objective, &tier_bounds, budget, tier_seed) {
            Ok(outcome) => outcome,
            Err(SimError::OptimizerFault(reason)) => {
                skipped_tiers.push(SkippedTier {
                    label: (*label).to_string(),
                    reason,
                });
                continue;
            }
            Err(other) => return Err(other),
        };

        // Re-simulate the tier winner at full resolution.
        let mut best_offer = candidate_offer(&outcome.best_point, label, eval_idx);
        best_offer.label = (*label).to_string();
        let result = simulate_offer_with(
            &best_offer,
            params,
            n_simulations,
            base_seed,
            Parallelism::Auto,
        )?;
        tiers.push(TierResult {
            label: (*label).to_string(),
            best_offer,
            result,
            trace,
        });
    }

    if tiers.is_empty() {
        return Err(SimError::SearchExhausted);
    }

    let best_idx = tiers
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            a.result
                .risk_adjusted_profit
                .partial_cmp(&b.result.risk_adjusted_profit)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut ranked_offers: Vec<OfferOutcome> = tiers
        .iter()
        .map(|t| OfferOutcome::from_aggregate(&t.best_offer, &t.result))
        .collect();
    ranked_offers.sort_by(|a, b| {
        b.risk_adjusted_profit
            .partial_cmp(&a.risk_adjusted_profit)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let evaluation_log: Vec<SearchEvaluation> = tiers
        .iter()
        .flat_map(|t| t.trace.evaluations.iter().cloned())
        .collect();
    let evaluations = evaluation_log.len();

    let best = &tiers[best_idx];
    Ok(SearchOutcome {
        best_offer: best.best_offer.clone(),
        result: best.result.clone(),
        best_so_far: best.trace.best_so_far.clone(),
        evaluation_log,
        evaluations,
        ranked_offers,
        tiers,
        skipped_tiers,
    })
}

/// The four search dimensions for one tier, in `[price, data, voice,
/// validity]` order.
fn tier_dimension_bounds(bounds: &SearchBounds, lo: f64, hi: f64) -> Vec<DimensionBounds> {
    let lerp = |(min, max): (f64, f64), f: f64| min + f * (max - min);
    let (v_min, v_max) = bounds.validity_days;
    let v_span = f64::from(v_max) - f64::from(v_min);
    vec![
        DimensionBounds::Continuous {
            min: lerp(bounds.price, lo),
            max: lerp(bounds.price, hi),
        },
        DimensionBounds::Continuous {
            min: lerp(bounds.data_gb, lo),
            max: lerp(bounds.data_gb, hi),
        },
        DimensionBounds::Continuous {
            min: lerp(bounds.voice_min, lo),
            max: lerp(bounds.voice_min, hi),
        },
        DimensionBounds::Integer {
            min: (f64::from(v_min) + lo * v_span).round() as i64,
            max: (f64::from(v_min) + hi * v_span).round() as i64,
        },
    ]
}

fn candidate_offer(x: &[f64], tier_label: &str, idx: u64) -> OfferSpec {
    OfferSpec {
        price: x[0],
        data_gb: x[1],
        voice_min: x[2],
        validity_days: (x[3].round() as i64).max(1) as u32,
        label: format!("{tier_label}-{idx}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_bounds_partition_each_dimension() {
        let bounds = SearchBounds {
            price: (0.0, 300.0),
            data_gb: (0.0, 30.0),
            voice_min: (0.0, 900.0),
            validity_days: (1, 91),
        };
        let budget_tier = tier_dimension_bounds(&bounds, 0.0, 1.0 / 3.0);
        let premium_tier = tier_dimension_bounds(&bounds, 2.0 / 3.0, 1.0);

        match budget_tier[0] {
            DimensionBounds::Continuous { min, max } => {
                assert!((min - 0.0).abs() < 1e-9);
                assert!((max - 100.0).abs() < 1e-9);
            }
            DimensionBounds::Integer { .. } => panic!("price dimension is continuous"),
        }
        match premium_tier[3] {
            DimensionBounds::Integer { min, max } => {
                assert_eq!(min, 61);
                assert_eq!(max, 91);
            }
            DimensionBounds::Continuous { .. } => panic!("validity dimension is integer"),
        }
    }

    #[test]
    fn candidate_offer_floors_validity_at_one() {
        let offer = candidate_offer(&[50.0, 2.0, 10.0, 0.2], "Budget", 3);
        assert_eq!(offer.validity_days, 1);
        assert_eq!(offer.label, "Budget-3");
    }
}
