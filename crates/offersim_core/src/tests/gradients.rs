//! Tests for sensitivity analysis
//!
//! These tests verify that:
//! - Every differentiation target produces one record
//! - Records arrive sorted by descending absolute gradient
//! - Parameters with no influence on the offer report a zero gradient
//! - The analysis itself is reproducible per seed

use crate::model::{OfferSpec, ParameterSet};
use crate::sensitivity::compute_sensitivity;

fn small_params() -> ParameterSet {
    ParameterSet {
        market_size: 100,
        ..Default::default()
    }
}

#[test]
fn one_record_per_target() {
    let offer = OfferSpec::default();
    let records = compute_sensitivity(&offer, &small_params(), 10, 42).unwrap();
    assert_eq!(records.len(), 13);

    let mut names: Vec<&str> = records.iter().map(|r| r.parameter.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), 13);
}

#[test]
fn records_sorted_by_absolute_gradient() {
    let offer = OfferSpec {
        data_gb: 2.0,
        voice_min: 100.0,
        validity_days: 28,
        price: 200.0,
        label: "Probe".to_string(),
    };
    let records = compute_sensitivity(&offer, &small_params(), 10, 7).unwrap();
    for pair in records.windows(2) {
        assert!(pair[0].abs_gradient >= pair[1].abs_gradient);
    }
    for record in &records {
        assert!((record.abs_gradient - record.gradient.abs()).abs() < 1e-12);
    }
}

#[test]
fn voice_free_offer_has_zero_voice_cost_gradient() {
    // No voice allowance: minutes are never sampled, so perturbing the
    // per-minute cost cannot move the profit.
    let offer = OfferSpec {
        data_gb: 1.0,
        voice_min: 0.0,
        validity_days: 7,
        price: 100.0,
        label: "DataOnly".to_string(),
    };
    let records = compute_sensitivity(&offer, &small_params(), 10, 3).unwrap();
    let voice_cost = records
        .iter()
        .find(|r| r.parameter == "cost_per_minute")
        .unwrap();
    assert_eq!(voice_cost.gradient, 0.0);
}

#[test]
fn analysis_is_deterministic_per_seed() {
    let offer = OfferSpec::default();
    let a = compute_sensitivity(&offer, &small_params(), 10, 42).unwrap();
    let b = compute_sensitivity(&offer, &small_params(), 10, 42).unwrap();
    assert_eq!(a, b);
}
