//! Per-customer consumption distributions.
//!
//! Data usage is modeled as a three-segment mixture (light/medium/heavy
//! customers), voice usage as a single distribution. Every variant exposes
//! the same sampling capability and an optional cap that clamps (never
//! resamples) drawn values.

use rand::Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};

use crate::error::DistributionError;

/// A single-variable usage distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UsageDistribution {
    LogNormal {
        mu: f64,
        sigma: f64,
        #[serde(default)]
        cap: Option<f64>,
    },
    Gamma {
        shape: f64,
        scale: f64,
        #[serde(default)]
        cap: Option<f64>,
    },
    Weibull {
        shape: f64,
        scale: f64,
        #[serde(default)]
        cap: Option<f64>,
    },
    Pareto {
        scale: f64,
        alpha: f64,
        #[serde(default)]
        cap: Option<f64>,
    },
    /// Normal clamped to `[min, max]` (clamping, not rejection sampling).
    TruncatedNormal {
        mean: f64,
        std_dev: f64,
        min: f64,
        max: f64,
    },
}

impl UsageDistribution {
    /// Draw one value. Caps are applied after sampling.
    pub fn sample_one<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, DistributionError> {
        match self {
            UsageDistribution::LogNormal { mu, sigma, cap } => {
                let dist = rand_distr::LogNormal::new(*mu, *sigma).map_err(|_| {
                    DistributionError::InvalidParameters {
                        distribution: "LogNormal",
                        reason: "sigma must be positive and finite",
                    }
                })?;
                Ok(apply_cap(dist.sample(rng), *cap))
            }
            UsageDistribution::Gamma { shape, scale, cap } => {
                let dist = rand_distr::Gamma::new(*shape, *scale).map_err(|_| {
                    DistributionError::InvalidParameters {
                        distribution: "Gamma",
                        reason: "shape and scale must be positive and finite",
                    }
                })?;
                Ok(apply_cap(dist.sample(rng), *cap))
            }
            UsageDistribution::Weibull { shape, scale, cap } => {
                let dist = rand_distr::Weibull::new(*scale, *shape).map_err(|_| {
                    DistributionError::InvalidParameters {
                        distribution: "Weibull",
                        reason: "shape and scale must be positive and finite",
                    }
                })?;
                Ok(apply_cap(dist.sample(rng), *cap))
            }
            UsageDistribution::Pareto { scale, alpha, cap } => {
                let dist = rand_distr::Pareto::new(*scale, *alpha).map_err(|_| {
                    DistributionError::InvalidParameters {
                        distribution: "Pareto",
                        reason: "scale and alpha must be positive and finite",
                    }
                })?;
                Ok(apply_cap(dist.sample(rng), *cap))
            }
            UsageDistribution::TruncatedNormal {
                mean,
                std_dev,
                min,
                max,
            } => {
                if max < min {
                    return Err(DistributionError::InvalidParameters {
                        distribution: "TruncatedNormal",
                        reason: "max must not be below min",
                    });
                }
                let dist = rand_distr::Normal::new(*mean, *std_dev).map_err(|_| {
                    DistributionError::InvalidParameters {
                        distribution: "TruncatedNormal",
                        reason: "std_dev must be non-negative and finite",
                    }
                })?;
                Ok(dist.sample(rng).clamp(*min, *max))
            }
        }
    }

    /// Draw `n` values. `n == 0` short-circuits to an empty vector without
    /// touching the random source.
    pub fn sample_n<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>, DistributionError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut values = Vec::with_capacity(n);
        for _ in 0..n {
            values.push(self.sample_one(rng)?);
        }
        Ok(values)
    }
}

fn apply_cap(value: f64, cap: Option<f64>) -> f64 {
    match cap {
        Some(cap) => value.min(cap),
        None => value,
    }
}

/// One segment of the data-usage mixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSegment {
    pub weight: f64,
    pub distribution: UsageDistribution,
}

/// Consumption model configuration: a light/medium/heavy data mixture plus a
/// single voice distribution. When `mixture` is off, the medium segment's
/// distribution serves as the single fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    pub mixture: bool,
    pub segments: [UsageSegment; 3],
    pub voice: UsageDistribution,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            mixture: true,
            segments: [
                UsageSegment {
                    weight: 0.4,
                    distribution: UsageDistribution::LogNormal {
                        mu: -0.5,
                        sigma: 0.5,
                        cap: None,
                    },
                },
                UsageSegment {
                    weight: 0.4,
                    distribution: UsageDistribution::LogNormal {
                        mu: 0.5,
                        sigma: 0.6,
                        cap: None,
                    },
                },
                UsageSegment {
                    weight: 0.2,
                    distribution: UsageDistribution::LogNormal {
                        mu: 1.5,
                        sigma: 0.7,
                        cap: None,
                    },
                },
            ],
            voice: UsageDistribution::LogNormal {
                mu: 3.0,
                sigma: 0.8,
                cap: None,
            },
        }
    }
}

impl UsageConfig {
    /// Segment weights in declaration order.
    #[must_use]
    pub fn weights(&self) -> [f64; 3] {
        [
            self.segments[0].weight,
            self.segments[1].weight,
            self.segments[2].weight,
        ]
    }

    /// The single distribution used when mixture mode is disabled.
    #[must_use]
    pub fn fallback(&self) -> &UsageDistribution {
        &self.segments[1].distribution
    }
}
