//! Tests for single-path replicate behavior
//!
//! These tests verify that:
//! - The horizon divides into the expected number of validity periods
//! - An empty market terminates immediately with a terminal zero period
//! - Zero allowances produce pure subscription revenue and zero cost
//! - Period records chain cumulative profit correctly

use crate::model::{OfferSpec, ParameterSet};
use crate::simulation::run_replicate;

fn flat_offer(price: f64) -> OfferSpec {
    OfferSpec {
        data_gb: 0.0,
        voice_min: 0.0,
        validity_days: 7,
        price,
        label: "Flat".to_string(),
    }
}

#[test]
fn horizon_divides_into_validity_periods() {
    // 90 days / 7-day validity = 12 full periods.
    let offer = OfferSpec::default();
    let params = ParameterSet::default();

    let result = run_replicate(&offer, &params, 42).unwrap();
    assert!(result.periods.len() <= 12);
    assert_eq!(result.periods.last().unwrap().period, result.periods.len());
}

#[test]
fn empty_market_yields_single_zero_period() {
    let offer = OfferSpec::default();
    let params = ParameterSet {
        market_size: 0,
        ..Default::default()
    };

    let result = run_replicate(&offer, &params, 7).unwrap();
    assert_eq!(result.total_profit, 0.0);
    assert_eq!(result.periods.len(), 1);

    let terminal = &result.periods[0];
    assert_eq!(terminal.period, 1);
    assert_eq!(terminal.active_users, 0);
    assert_eq!(terminal.revenue, 0.0);
    assert_eq!(terminal.cost, 0.0);
}

#[test]
fn zero_allowances_bill_subscription_only() {
    // No data, no voice: revenue is exactly active * price, cost is zero.
    let offer = flat_offer(120.0);
    let params = ParameterSet::default();

    let result = run_replicate(&offer, &params, 99).unwrap();
    for record in &result.periods {
        let expected_revenue = record.active_users as f64 * 120.0;
        assert!((record.revenue - expected_revenue).abs() < 1e-9);
        assert_eq!(record.cost, 0.0);
    }
}

#[test]
fn flat_offer_profit_is_discounted_subscription_revenue() {
    let offer = flat_offer(50.0);
    let params = ParameterSet::default();

    let result = run_replicate(&offer, &params, 3).unwrap();
    let expected: f64 = result
        .periods
        .iter()
        .filter(|r| r.active_users > 0)
        .map(|r| {
            let days = r.period as u32 * offer.validity_days;
            r.profit / (1.0 + params.discount_rate).powi(days as i32)
        })
        .sum();
    assert!((result.total_profit - expected).abs() < 1e-6);
}

#[test]
fn cumulative_profit_chains_across_periods() {
    let offer = OfferSpec {
        data_gb: 2.0,
        voice_min: 100.0,
        validity_days: 30,
        price: 250.0,
        label: "Monthly".to_string(),
    };
    let params = ParameterSet::default();

    let result = run_replicate(&offer, &params, 21).unwrap();
    let mut running = 0.0;
    for record in &result.periods {
        running += record.profit;
        assert!((record.cumulative_profit - running).abs() < 1e-9);
    }
}

#[test]
fn validity_longer_than_horizon_still_runs_one_period() {
    let offer = OfferSpec {
        validity_days: 365,
        ..Default::default()
    };
    let params = ParameterSet::default();

    let result = run_replicate(&offer, &params, 5).unwrap();
    assert_eq!(result.periods.len(), 1);
}
