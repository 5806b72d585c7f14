//! The black-box minimizer seam.
//!
//! The search orchestrator never depends on a specific optimizer
//! implementation; it hands any [`Minimizer`] an objective over a bounded
//! real/integer vector, an evaluation budget, and a seed.

use serde::{Deserialize, Serialize};

use crate::error::SimResult;

/// Bounds for one search dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DimensionBounds {
    Continuous { min: f64, max: f64 },
    Integer { min: i64, max: i64 },
}

impl DimensionBounds {
    #[must_use]
    pub fn as_f64(&self) -> (f64, f64) {
        match self {
            DimensionBounds::Continuous { min, max } => (*min, *max),
            DimensionBounds::Integer { min, max } => (*min as f64, *max as f64),
        }
    }

    /// A dimension is degenerate when it has no searchable extent.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match self {
            DimensionBounds::Continuous { min, max } => {
                !(max > min) || !min.is_finite() || !max.is_finite()
            }
            DimensionBounds::Integer { min, max } => max < min,
        }
    }

    /// Clamp a raw coordinate into the dimension, rounding integer
    /// dimensions to the nearest step.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        match self {
            DimensionBounds::Continuous { min, max } => value.clamp(*min, *max),
            DimensionBounds::Integer { min, max } => {
                value.round().clamp(*min as f64, *max as f64)
            }
        }
    }
}

/// Total evaluation budget, split into an initial random phase and a guided
/// phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationBudget {
    pub initial_points: usize,
    pub guided_iterations: usize,
}

impl Default for EvaluationBudget {
    fn default() -> Self {
        Self {
            initial_points: 10,
            guided_iterations: 30,
        }
    }
}

/// Best point found by a minimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizerOutcome {
    pub best_point: Vec<f64>,
    pub best_value: f64,
    pub evaluations: usize,
}

/// Objective function over a bounded vector; smaller is better.
pub type Objective<'a> = dyn FnMut(&[f64]) -> SimResult<f64> + 'a;

/// An injected point-suggesting optimization strategy. Implementations own
/// their surrogate/heuristic internals; the orchestrator only sees suggested
/// points and the final best.
pub trait Minimizer {
    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        bounds: &[DimensionBounds],
        budget: &EvaluationBudget,
        seed: u64,
    ) -> SimResult<MinimizerOutcome>;
}
