//! Risk adjustment of aggregate profit.

/// Penalize mean profit by a multiple of its dispersion.
///
/// Dispersion is the standard deviation of the profit samples so that the
/// penalty carries the same unit as the mean.
#[must_use]
pub fn risk_adjusted(mean: f64, dispersion: f64, lambda: f64) -> f64 {
    mean - lambda * dispersion
}
