//! Single-replicate simulation: acquisition, usage, cost, and renewal
//! sub-models plus the per-period path loop.
//!
//! Model outline:
//! - Acquisition: logistic utility -> Binomial(market_size, p_join)
//! - Data usage: three-segment mixture (or single fallback distribution)
//! - Revenue: active customers x price + data/voice overage
//! - Cost: per-network-type data delivery + per-minute voice
//! - Renewal: Binomial(active, base_rate - decay * period) with clamping
//! - Profit: discounted sum over validity periods

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;

use crate::error::{SimError, SimResult};
use crate::model::{OfferSpec, ParameterSet, PeriodRecord, ReplicateResult};

/// Draw the initial acquired-customer count from the logistic utility model.
///
/// `U = b_data*ln(1+data) + b_voice*ln(1+voice) + b_validity*ln(max(1,validity))
///      - b_price*price + eps`, `p_join = sigmoid(U)` clipped away from 0/1.
/// The noise term is a single population-level draw per replicate.
pub(crate) fn sample_acquisition<R: Rng + ?Sized>(
    offer: &OfferSpec,
    params: &ParameterSet,
    rng: &mut R,
) -> SimResult<u64> {
    let mut utility = params.beta_data * offer.data_gb.ln_1p()
        + params.beta_voice * offer.voice_min.ln_1p()
        + params.beta_validity * f64::from(offer.validity_days.max(1)).ln()
        - params.beta_price * offer.price;

    let noise = rand_distr::Normal::new(0.0, params.utility_noise).map_err(|_| {
        SimError::InvalidParameter("utility noise scale must be non-negative".to_string())
    })?;
    utility += noise.sample(rng);

    let p_join = (1.0 / (1.0 + (-utility).exp())).clamp(0.001, 0.999);
    let binomial = rand_distr::Binomial::new(params.market_size, p_join)
        .map_err(|e| SimError::SimulationFault(format!("acquisition draw failed: {e}")))?;
    Ok(binomial.sample(rng))
}

/// Sample per-customer data usage in GB.
///
/// In mixture mode each customer is stochastically assigned to a segment by
/// the normalized weights, then drawn from that segment's distribution.
pub(crate) fn sample_data_usage<R: Rng + ?Sized>(
    n_customers: usize,
    params: &ParameterSet,
    rng: &mut R,
) -> SimResult<Vec<f64>> {
    if n_customers == 0 {
        return Ok(Vec::new());
    }

    if !params.usage.mixture {
        return Ok(params.usage.fallback().sample_n(n_customers, rng)?);
    }

    let weights = params.normalized_segment_weights();
    let mut usage = Vec::with_capacity(n_customers);
    for _ in 0..n_customers {
        let segment = pick_index(&weights, rng);
        usage.push(params.usage.segments[segment].distribution.sample_one(rng)?);
    }
    Ok(usage)
}

/// Sample per-customer voice usage in minutes.
pub(crate) fn sample_voice_usage<R: Rng + ?Sized>(
    n_customers: usize,
    params: &ParameterSet,
    rng: &mut R,
) -> SimResult<Vec<f64>> {
    Ok(params.usage.voice.sample_n(n_customers, rng)?)
}

/// Operator cost to deliver the sampled data usage. Each value is assigned
/// to one of three network types by the normalized population shares and
/// priced at that type's unit cost. Empty usage costs nothing and draws no
/// randomness.
pub(crate) fn network_data_cost<R: Rng + ?Sized>(
    usage: &[f64],
    params: &ParameterSet,
    rng: &mut R,
) -> f64 {
    if usage.is_empty() {
        return 0.0;
    }
    let shares = params.normalized_network_shares();
    usage
        .iter()
        .map(|gb| gb * params.cost_per_gb[pick_index(&shares, rng)])
        .sum()
}

/// Draw next period's active count. The renewal probability decays per
/// elapsed period and is clamped to `[renewal_floor, 1.0]`.
pub(crate) fn sample_renewal<R: Rng + ?Sized>(
    active: u64,
    period_idx: usize,
    params: &ParameterSet,
    rng: &mut R,
) -> SimResult<u64> {
    let floor = params.renewal_floor.clamp(0.0, 1.0);
    let rate =
        (params.base_renewal_rate - params.renewal_decay * period_idx as f64).clamp(floor, 1.0);
    let binomial = rand_distr::Binomial::new(active, rate)
        .map_err(|e| SimError::SimulationFault(format!("renewal draw failed: {e}")))?;
    Ok(binomial.sample(rng))
}

/// Weighted index pick from normalized probabilities.
fn pick_index<R: Rng + ?Sized>(probabilities: &[f64; 3], rng: &mut R) -> usize {
    let draw = rng.random::<f64>();
    let mut cumulative = 0.0;
    for (i, p) in probabilities.iter().enumerate() {
        cumulative += p;
        if draw < cumulative {
            return i;
        }
    }
    probabilities.len() - 1
}

/// Run one full replicate over the simulation horizon.
///
/// The horizon divides into `max(1, horizon_days / validity_days)` validity
/// periods when renewal is enabled, otherwise exactly one purchase cycle.
/// Period profit is discounted by `(1 + discount_rate)^days_elapsed`. The
/// loop terminates early once no customers remain active: a terminal
/// zero-activity period is recorded, nothing after it.
pub fn run_replicate(
    offer: &OfferSpec,
    params: &ParameterSet,
    seed: u64,
) -> SimResult<ReplicateResult> {
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut active = sample_acquisition(offer, params, &mut rng)?;

    let validity = u64::from(offer.validity_days.max(1));
    let n_periods = if params.enable_renewal {
        (u64::from(params.horizon_days) / validity).max(1)
    } else {
        1
    };

    let mut periods = Vec::with_capacity(n_periods as usize);
    let mut total_discounted = 0.0;
    let mut cumulative = 0.0;

    for period_idx in 0..n_periods {
        if active == 0 {
            periods.push(PeriodRecord {
                period: period_idx as usize + 1,
                active_users: 0,
                revenue: 0.0,
                cost: 0.0,
                profit: 0.0,
                cumulative_profit: cumulative,
            });
            break;
        }

        let (revenue, cost) = run_period(active, offer, params, &mut rng)?;
        let profit = revenue - cost;

        let days_elapsed = (period_idx + 1) * validity;
        let discount = (1.0 + params.discount_rate).powf(days_elapsed as f64);
        total_discounted += profit / discount;
        cumulative += profit;

        periods.push(PeriodRecord {
            period: period_idx as usize + 1,
            active_users: active,
            revenue,
            cost,
            profit,
            cumulative_profit: cumulative,
        });

        if params.enable_renewal && period_idx < n_periods - 1 {
            active = sample_renewal(active, period_idx as usize, params, &mut rng)?;
            if active == 0 {
                break;
            }
        }
    }

    Ok(ReplicateResult {
        total_profit: total_discounted,
        periods,
    })
}

/// Revenue and cost for one validity period with `active > 0` customers.
///
/// A zero allowance on either dimension means customers neither consume nor
/// get billed overage on that dimension.
fn run_period<R: Rng + ?Sized>(
    active: u64,
    offer: &OfferSpec,
    params: &ParameterSet,
    rng: &mut R,
) -> SimResult<(f64, f64)> {
    let n = active as usize;
    let base_revenue = active as f64 * offer.price;

    let data_usage = if offer.data_gb > 0.0 {
        sample_data_usage(n, params, rng)?
    } else {
        Vec::new()
    };
    let data_overage: f64 = data_usage
        .iter()
        .map(|gb| (gb - offer.data_gb).max(0.0))
        .sum();

    let voice_usage = if offer.voice_min > 0.0 {
        sample_voice_usage(n, params, rng)?
    } else {
        Vec::new()
    };
    let voice_overage: f64 = voice_usage
        .iter()
        .map(|min| (min - offer.voice_min).max(0.0))
        .sum();

    let revenue = base_revenue
        + data_overage * params.overage_price_data
        + voice_overage * params.overage_price_voice;

    let data_cost = network_data_cost(&data_usage, params, rng);
    let voice_cost = voice_usage.iter().sum::<f64>() * params.cost_per_minute;

    Ok((revenue, data_cost + voice_cost))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquisition_respects_market_size() {
        let offer = OfferSpec::default();
        let params = ParameterSet {
            market_size: 500,
            ..Default::default()
        };
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..20 {
            let acquired = sample_acquisition(&offer, &params, &mut rng).unwrap();
            assert!(acquired <= 500);
        }
    }

    #[test]
    fn empty_usage_costs_nothing_and_skips_rng() {
        let params = ParameterSet::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let before = rng.clone();
        assert_eq!(network_data_cost(&[], &params, &mut rng), 0.0);

        let mut untouched = before;
        assert_eq!(rng.random::<u64>(), untouched.random::<u64>());
    }

    #[test]
    fn renewal_rate_is_clamped_to_floor() {
        // Decay pushes the rate far below zero; the floor keeps everyone.
        let params = ParameterSet {
            base_renewal_rate: 0.1,
            renewal_decay: 10.0,
            renewal_floor: 1.0,
            ..Default::default()
        };
        let mut rng = SmallRng::seed_from_u64(3);
        let renewed = sample_renewal(1000, 5, &params, &mut rng).unwrap();
        assert_eq!(renewed, 1000);
    }

    #[test]
    fn replicate_is_deterministic_per_seed() {
        let offer = OfferSpec::default();
        let params = ParameterSet::default();
        let a = run_replicate(&offer, &params, 42).unwrap();
        let b = run_replicate(&offer, &params, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn discount_handles_day_counts_beyond_i32() {
        // One period whose validity exceeds i32::MAX days. The discount
        // factor overflows to infinity and the discounted profit collapses
        // to zero rather than being amplified by a wrapped exponent.
        let offer = OfferSpec {
            data_gb: 0.0,
            voice_min: 0.0,
            validity_days: u32::MAX,
            price: 100.0,
            label: "Forever".to_string(),
        };
        let params = ParameterSet {
            horizon_days: u32::MAX,
            ..Default::default()
        };
        let result = run_replicate(&offer, &params, 8).unwrap();
        assert_eq!(result.periods.len(), 1);
        assert!(result.total_profit.abs() < 1e-9);
    }

    #[test]
    fn renewal_disabled_runs_one_period() {
        let offer = OfferSpec::default();
        let params = ParameterSet {
            enable_renewal: false,
            ..Default::default()
        };
        let result = run_replicate(&offer, &params, 1).unwrap();
        assert_eq!(result.periods.len(), 1);
    }
}
