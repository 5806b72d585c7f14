//! Multi-offer tier comparison: a fixed ladder of named variants scaled
//! multiplicatively from an anchor offer, each evaluated through the Monte
//! Carlo aggregator.

use crate::error::SimResult;
use crate::model::{OfferOutcome, OfferSpec, ParameterSet};
use crate::aggregate::simulate_offer;

/// (price, data, voice, validity) multipliers per named tier.
const TIER_DEFINITIONS: [(f64, f64, f64, f64, &str); 10] = [
    (0.40, 0.30, 0.30, 0.5, "Micro"),
    (0.55, 0.50, 0.50, 0.5, "Budget"),
    (0.70, 0.70, 0.70, 1.0, "Economy"),
    (0.85, 0.85, 0.85, 1.0, "Basic"),
    (1.00, 1.00, 1.00, 1.0, "Standard"),
    (1.15, 1.30, 1.30, 1.0, "Plus"),
    (1.35, 1.60, 1.60, 2.0, "Pro"),
    (1.60, 2.00, 2.00, 2.0, "Elite"),
    (2.00, 2.50, 2.50, 4.0, "Premium"),
    (2.50, 3.00, 3.00, 4.0, "Unlimited"),
];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derive the tier ladder around `anchor` and simulate each tier with the
/// same replicate count and base seed. Tiers whose derived price is not
/// positive are skipped. Results are ranked by descending expected profit.
pub fn generate_offer_tiers(
    anchor: &OfferSpec,
    params: &ParameterSet,
    n_replicates: usize,
    base_seed: u64,
) -> SimResult<Vec<OfferOutcome>> {
    params.validate()?;
    anchor.validate()?;

    let mut outcomes = Vec::with_capacity(TIER_DEFINITIONS.len());
    for (price_mult, data_mult, voice_mult, validity_mult, label) in TIER_DEFINITIONS {
        let price = round2(anchor.price * price_mult);
        if price <= 0.0 {
            continue;
        }

        let offer = OfferSpec {
            data_gb: round2(anchor.data_gb * data_mult),
            voice_min: round2(anchor.voice_min * voice_mult),
            validity_days: ((f64::from(anchor.validity_days) * validity_mult) as u32).max(1),
            price,
            label: label.to_string(),
        };

        let aggregate = simulate_offer(&offer, params, n_replicates, base_seed)?;
        outcomes.push(OfferOutcome::from_aggregate(&offer, &aggregate));
    }

    outcomes.sort_by(|a, b| {
        b.expected_profit
            .partial_cmp(&a.expected_profit)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_has_ten_named_tiers() {
        let labels: Vec<&str> = TIER_DEFINITIONS.iter().map(|t| t.4).collect();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0], "Micro");
        assert_eq!(labels[9], "Unlimited");
    }

    #[test]
    fn rounding_is_two_decimals() {
        assert_eq!(round2(3.014), 3.01);
        assert_eq!(round2(0.1 + 0.2), 0.3);
    }
}
