//! Monte Carlo aggregation: run M independent replicates and reduce them
//! into summary statistics, a histogram, a convergence trace, and a
//! per-period breakdown.
//!
//! Replicate seeds derive deterministically from the base seed and the
//! replicate index, so a given (offer, parameters, M, base_seed) tuple
//! produces bit-identical results regardless of execution order or the
//! parallelism setting.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::model::{
    AggregateResult, Histogram, OfferSpec, ParameterSet, PeriodRecord, ReplicateResult,
};
use crate::risk::risk_adjusted;
use crate::simulation::run_replicate;

/// Per-index seed stride. Keeps replicate seeds distinct without collisions
/// between neighboring base seeds.
pub(crate) const SEED_STRIDE: u64 = 997;

/// Cap on the raw sample array carried in the result, for transport size.
const SAMPLE_EXPORT_CAP: usize = 2000;

/// Number of histogram bins over the observed sample range.
const HISTOGRAM_BINS: usize = 50;

/// How replicates are executed. Reduction is identical in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Parallelism {
    /// Run replicates on the calling thread, in index order.
    Sequential,
    /// Bounded worker pool with an explicit thread count.
    Degree(usize),
    /// Use all available cores.
    #[default]
    Auto,
}

pub(crate) fn replicate_seed(base_seed: u64, index: usize) -> u64 {
    base_seed.wrapping_add(index as u64 * SEED_STRIDE)
}

/// Run M replicates and reduce them. See [`simulate_offer_with`] for the
/// parallelism-aware variant; this one uses all available cores.
pub fn simulate_offer(
    offer: &OfferSpec,
    params: &ParameterSet,
    n_replicates: usize,
    base_seed: u64,
) -> SimResult<AggregateResult> {
    simulate_offer_with(offer, params, n_replicates, base_seed, Parallelism::Auto)
}

/// Run M replicates with an explicit execution mode and reduce them into an
/// [`AggregateResult`].
///
/// The call blocks until every replicate completes. Any replicate fault
/// aborts the whole aggregation; partial results are never returned.
pub fn simulate_offer_with(
    offer: &OfferSpec,
    params: &ParameterSet,
    n_replicates: usize,
    base_seed: u64,
    parallelism: Parallelism,
) -> SimResult<AggregateResult> {
    params.validate()?;
    offer.validate()?;
    if n_replicates == 0 {
        return Err(SimError::InvalidParameter(
            "replicate count must be at least 1".to_string(),
        ));
    }

    let replicates = run_all(offer, params, n_replicates, base_seed, parallelism)?;
    Ok(reduce(&replicates, params, n_replicates, base_seed))
}

/// Execute all replicates, preserving index order in the output.
fn run_all(
    offer: &OfferSpec,
    params: &ParameterSet,
    n_replicates: usize,
    base_seed: u64,
    parallelism: Parallelism,
) -> SimResult<Vec<ReplicateResult>> {
    match parallelism {
        Parallelism::Sequential => (0..n_replicates)
            .map(|i| run_replicate(offer, params, replicate_seed(base_seed, i)))
            .collect(),
        Parallelism::Auto => run_all_parallel(offer, params, n_replicates, base_seed),
        Parallelism::Degree(threads) => {
            run_all_with_degree(offer, params, n_replicates, base_seed, threads)
        }
    }
}

#[cfg(feature = "parallel")]
fn run_all_parallel(
    offer: &OfferSpec,
    params: &ParameterSet,
    n_replicates: usize,
    base_seed: u64,
) -> SimResult<Vec<ReplicateResult>> {
    // Parallel collect preserves index order; a failed replicate aborts the
    // whole aggregation.
    (0..n_replicates)
        .into_par_iter()
        .map(|i| run_replicate(offer, params, replicate_seed(base_seed, i)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_all_parallel(
    offer: &OfferSpec,
    params: &ParameterSet,
    n_replicates: usize,
    base_seed: u64,
) -> SimResult<Vec<ReplicateResult>> {
    (0..n_replicates)
        .map(|i| run_replicate(offer, params, replicate_seed(base_seed, i)))
        .collect()
}

#[cfg(feature = "parallel")]
fn run_all_with_degree(
    offer: &OfferSpec,
    params: &ParameterSet,
    n_replicates: usize,
    base_seed: u64,
    threads: usize,
) -> SimResult<Vec<ReplicateResult>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|e| SimError::SimulationFault(format!("worker pool setup failed: {e}")))?;
    pool.install(|| run_all_parallel(offer, params, n_replicates, base_seed))
}

#[cfg(not(feature = "parallel"))]
fn run_all_with_degree(
    offer: &OfferSpec,
    params: &ParameterSet,
    n_replicates: usize,
    base_seed: u64,
    _threads: usize,
) -> SimResult<Vec<ReplicateResult>> {
    run_all_parallel(offer, params, n_replicates, base_seed)
}

/// Deterministic fold over replicate results collected in index order.
fn reduce(
    replicates: &[ReplicateResult],
    params: &ParameterSet,
    n_replicates: usize,
    base_seed: u64,
) -> AggregateResult {
    let samples: Vec<f64> = replicates.iter().map(|r| r.total_profit).collect();
    let m = samples.len() as f64;

    let mean = samples.iter().sum::<f64>() / m;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / m;
    let std_dev = variance.sqrt();
    let ci_half_width = 1.96 * std_dev / m.sqrt();

    let mut convergence = Vec::with_capacity(samples.len());
    let mut running_sum = 0.0;
    for (i, sample) in samples.iter().enumerate() {
        running_sum += sample;
        convergence.push(running_sum / (i + 1) as f64);
    }

    let histogram = build_histogram(&samples);
    let (period_breakdown, total_periods) = average_periods(replicates);

    AggregateResult {
        expected_profit: mean,
        variance,
        std_dev,
        ci_half_width,
        ci_lower: mean - ci_half_width,
        ci_upper: mean + ci_half_width,
        risk_adjusted_profit: risk_adjusted(mean, std_dev, params.risk_lambda),
        profit_samples: samples.iter().copied().take(SAMPLE_EXPORT_CAP).collect(),
        histogram,
        convergence,
        period_breakdown,
        total_periods,
        n_simulations_run: n_replicates,
        seed_used: base_seed,
    }
}

fn build_histogram(samples: &[f64]) -> Histogram {
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Degenerate range (all samples equal): widen by half a unit each way.
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };

    let width = (hi - lo) / HISTOGRAM_BINS as f64;
    let mut counts = vec![0u64; HISTOGRAM_BINS];
    for sample in samples {
        let bin = (((sample - lo) / width) as usize).min(HISTOGRAM_BINS - 1);
        counts[bin] += 1;
    }

    let edges = (0..=HISTOGRAM_BINS)
        .map(|i| lo + width * i as f64)
        .collect();

    Histogram { edges, counts }
}

/// Average each period over the replicates whose ledger reaches it. Missing
/// periods are not zero-filled, so later periods reflect surviving
/// replicates only.
fn average_periods(replicates: &[ReplicateResult]) -> (Vec<PeriodRecord>, usize) {
    let total_periods = replicates
        .iter()
        .map(|r| r.periods.len())
        .max()
        .unwrap_or(0);

    let mut breakdown = Vec::with_capacity(total_periods);
    for p in 0..total_periods {
        let rows: Vec<&PeriodRecord> = replicates.iter().filter_map(|r| r.periods.get(p)).collect();
        if rows.is_empty() {
            continue;
        }
        let count = rows.len() as f64;
        breakdown.push(PeriodRecord {
            period: p + 1,
            // Fractional mean head counts truncate toward zero.
            active_users: (rows.iter().map(|r| r.active_users as f64).sum::<f64>() / count) as u64,
            revenue: rows.iter().map(|r| r.revenue).sum::<f64>() / count,
            cost: rows.iter().map(|r| r.cost).sum::<f64>() / count,
            profit: rows.iter().map(|r| r.profit).sum::<f64>() / count,
            cumulative_profit: rows.iter().map(|r| r.cumulative_profit).sum::<f64>() / count,
        });
    }

    (breakdown, total_periods)
}
