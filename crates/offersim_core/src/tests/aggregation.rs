//! Tests for Monte Carlo aggregation and reproducibility
//!
//! These tests verify that:
//! - The same seed and replicate count yield bit-identical results
//! - Execution mode (sequential, fixed degree, auto) never changes numbers
//! - Confidence interval and convergence bookkeeping are self-consistent
//! - Sample export is capped while the histogram covers every replicate

use crate::aggregate::{Parallelism, simulate_offer, simulate_offer_with};
use crate::model::{OfferSpec, ParameterSet};

fn standard_offer() -> OfferSpec {
    OfferSpec {
        data_gb: 1.0,
        voice_min: 0.0,
        validity_days: 7,
        price: 100.0,
        label: "Standard".to_string(),
    }
}

#[test]
fn same_seed_is_bit_identical() {
    let offer = standard_offer();
    let params = ParameterSet::default();

    let a = simulate_offer(&offer, &params, 50, 42).unwrap();
    let b = simulate_offer(&offer, &params, 50, 42).unwrap();
    assert_eq!(a.expected_profit.to_bits(), b.expected_profit.to_bits());
    assert_eq!(a.variance.to_bits(), b.variance.to_bits());
    assert_eq!(a.profit_samples, b.profit_samples);
    assert_eq!(a.convergence, b.convergence);
}

#[test]
fn execution_mode_does_not_change_results() {
    let offer = standard_offer();
    let params = ParameterSet::default();

    let sequential =
        simulate_offer_with(&offer, &params, 40, 7, Parallelism::Sequential).unwrap();
    let two_threads =
        simulate_offer_with(&offer, &params, 40, 7, Parallelism::Degree(2)).unwrap();
    let auto = simulate_offer_with(&offer, &params, 40, 7, Parallelism::Auto).unwrap();

    assert_eq!(sequential.profit_samples, two_threads.profit_samples);
    assert_eq!(sequential.profit_samples, auto.profit_samples);
    assert_eq!(
        sequential.expected_profit.to_bits(),
        auto.expected_profit.to_bits()
    );
}

#[test]
fn confidence_interval_brackets_the_mean() {
    let offer = standard_offer();
    let params = ParameterSet::default();

    let result = simulate_offer(&offer, &params, 100, 42).unwrap();
    assert!(result.expected_profit.is_finite());
    assert!(result.variance >= 0.0);

    let expected_half = 1.96 * result.std_dev / (100.0_f64).sqrt();
    assert!((result.ci_half_width - expected_half).abs() < 1e-9);
    assert!((result.ci_upper - result.ci_lower - 2.0 * expected_half).abs() < 1e-9);
    assert!(result.ci_lower <= result.expected_profit);
    assert!(result.expected_profit <= result.ci_upper);
}

#[test]
fn convergence_ends_at_the_mean() {
    let offer = standard_offer();
    let params = ParameterSet::default();

    let result = simulate_offer(&offer, &params, 60, 9).unwrap();
    assert_eq!(result.convergence.len(), 60);
    let last = *result.convergence.last().unwrap();
    assert!((last - result.expected_profit).abs() < 1e-9);
}

#[test]
fn risk_adjustment_subtracts_scaled_dispersion() {
    let offer = standard_offer();
    let params = ParameterSet {
        risk_lambda: 0.5,
        ..Default::default()
    };

    let result = simulate_offer(&offer, &params, 80, 11).unwrap();
    let expected = result.expected_profit - 0.5 * result.std_dev;
    assert!((result.risk_adjusted_profit - expected).abs() < 1e-9);
}

#[test]
fn histogram_counts_every_replicate() {
    let offer = standard_offer();
    let params = ParameterSet::default();

    let result = simulate_offer(&offer, &params, 120, 13).unwrap();
    assert_eq!(result.histogram.counts.iter().sum::<u64>(), 120);
    assert_eq!(result.histogram.edges.len(), result.histogram.counts.len() + 1);
}

#[test]
fn sample_export_is_capped() {
    let offer = standard_offer();
    let params = ParameterSet {
        // Tiny market keeps the replicate loop fast.
        market_size: 20,
        ..Default::default()
    };

    let result = simulate_offer(&offer, &params, 2_100, 17).unwrap();
    assert_eq!(result.profit_samples.len(), 2_000);
    assert_eq!(result.n_simulations_run, 2_100);
    assert_eq!(result.convergence.len(), 2_100);
}

#[test]
fn run_metadata_echoes_inputs() {
    let offer = standard_offer();
    let params = ParameterSet::default();

    let result = simulate_offer(&offer, &params, 100, 42).unwrap();
    assert_eq!(result.n_simulations_run, 100);
    assert_eq!(result.seed_used, 42);
    assert_eq!(result.total_periods, result.period_breakdown.len());
    // The 90-day horizon nominally allows 12 periods, but total_periods is
    // the longest observed ledger, and renewal decay usually empties every
    // cohort before the horizon. At this seed the longest survivor reaches
    // 11 periods.
    assert!(result.total_periods <= 12);
}

#[test]
fn invalid_offer_is_rejected_before_simulation() {
    let offer = OfferSpec {
        price: -5.0,
        ..Default::default()
    };
    let params = ParameterSet::default();
    assert!(simulate_offer(&offer, &params, 10, 1).is_err());
}
