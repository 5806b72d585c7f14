//! Default black-box minimizer: a seeded random initial phase followed by
//! Nelder-Mead simplex refinement.
//!
//! The Nelder-Mead algorithm is derivative-free and works well for the
//! low-dimensional, noisy objectives the search orchestrator produces. It
//! maintains a simplex of N+1 points and iteratively transforms it toward
//! the minimum. Integer dimensions are handled by rounding at evaluation
//! time.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{SimError, SimResult};

use super::minimizer::{
    DimensionBounds, EvaluationBudget, Minimizer, MinimizerOutcome, Objective,
};

/// Standard Nelder-Mead coefficients.
const REFLECTION_COEF: f64 = 1.0;
const EXPANSION_COEF: f64 = 2.0;
const CONTRACTION_COEF: f64 = 0.5;
const SHRINK_COEF: f64 = 0.5;

/// Simplex-size convergence threshold.
const TOLERANCE: f64 = 1e-6;

/// A point in parameter space with its objective value.
#[derive(Clone)]
struct SimplexVertex {
    values: Vec<f64>,
    objective: f64,
}

/// Seeded random sampling plus Nelder-Mead refinement.
#[derive(Debug, Clone, Copy, Default)]
pub struct NelderMeadMinimizer;

impl Minimizer for NelderMeadMinimizer {
    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        bounds: &[DimensionBounds],
        budget: &EvaluationBudget,
        seed: u64,
    ) -> SimResult<MinimizerOutcome> {
        if bounds.is_empty() {
            return Err(SimError::OptimizerFault(
                "no dimensions to search".to_string(),
            ));
        }
        if let Some(dim) = bounds.iter().position(DimensionBounds::is_degenerate) {
            return Err(SimError::OptimizerFault(format!(
                "degenerate bounds in dimension {dim}"
            )));
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut tracker = BestTracker::new();

        // Initial random phase. At least one point so the simplex has an
        // anchor even with a zero initial budget.
        let n_initial = budget.initial_points.max(1);
        let mut initial_best: Option<SimplexVertex> = None;
        for _ in 0..n_initial {
            let point: Vec<f64> = bounds
                .iter()
                .map(|b| {
                    let (min, max) = b.as_f64();
                    b.snap(min + rng.random::<f64>() * (max - min))
                })
                .collect();
            let value = tracker.evaluate(objective, bounds, &point)?;
            let replace = initial_best
                .as_ref()
                .is_none_or(|best| value < best.objective);
            if replace {
                initial_best = Some(SimplexVertex {
                    values: point,
                    objective: value,
                });
            }
        }
        let anchor = initial_best.expect("at least one initial evaluation");

        // Build the simplex around the best initial point by perturbing each
        // dimension by 10% of its range.
        let n = bounds.len();
        let mut simplex = Vec::with_capacity(n + 1);
        simplex.push(anchor);
        for i in 0..n {
            let mut point = simplex[0].values.clone();
            let (min, max) = bounds[i].as_f64();
            let nudge = 0.1 * (max - min);
            if point[i] + nudge <= max {
                point[i] += nudge;
            } else {
                point[i] -= nudge;
            }
            point[i] = bounds[i].snap(point[i]);
            let value = tracker.evaluate(objective, bounds, &point)?;
            simplex.push(SimplexVertex {
                values: point,
                objective: value,
            });
        }

        // Guided refinement.
        for _ in 0..budget.guided_iterations {
            // Best first, worst last.
            simplex.sort_by(|a, b| {
                a.objective
                    .partial_cmp(&b.objective)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let cent = centroid(&simplex);
            if simplex_size(&simplex, &cent) < TOLERANCE {
                break;
            }

            let best_objective = simplex[0].objective;
            let second_worst_objective = simplex[simplex.len() - 2].objective;
            let worst_idx = simplex.len() - 1;
            let worst_objective = simplex[worst_idx].objective;
            let worst_values = simplex[worst_idx].values.clone();

            let reflected = snap_all(
                reflect(&worst_values, &cent, REFLECTION_COEF),
                bounds,
            );
            let reflected_obj = tracker.evaluate(objective, bounds, &reflected)?;

            if reflected_obj < best_objective {
                // Reflection is the new best; try expanding further.
                let expanded = snap_all(reflect(&worst_values, &cent, EXPANSION_COEF), bounds);
                let expanded_obj = tracker.evaluate(objective, bounds, &expanded)?;
                simplex[worst_idx] = if expanded_obj < reflected_obj {
                    SimplexVertex {
                        values: expanded,
                        objective: expanded_obj,
                    }
                } else {
                    SimplexVertex {
                        values: reflected,
                        objective: reflected_obj,
                    }
                };
            } else if reflected_obj < second_worst_objective {
                simplex[worst_idx] = SimplexVertex {
                    values: reflected,
                    objective: reflected_obj,
                };
            } else {
                let contract_toward = if reflected_obj < worst_objective {
                    &reflected
                } else {
                    &worst_values
                };
                let contracted: Vec<f64> = cent
                    .iter()
                    .zip(contract_toward.iter())
                    .map(|(c, p)| c + CONTRACTION_COEF * (p - c))
                    .collect();
                let contracted = snap_all(contracted, bounds);
                let contracted_obj = tracker.evaluate(objective, bounds, &contracted)?;

                if contracted_obj < worst_objective {
                    simplex[worst_idx] = SimplexVertex {
                        values: contracted,
                        objective: contracted_obj,
                    };
                } else {
                    // Shrink everything toward the current best.
                    let best_values = simplex[0].values.clone();
                    for vertex in simplex.iter_mut().skip(1) {
                        let shrunk: Vec<f64> = best_values
                            .iter()
                            .zip(vertex.values.iter())
                            .map(|(b, v)| b + SHRINK_COEF * (v - b))
                            .collect();
                        let shrunk = snap_all(shrunk, bounds);
                        let shrunk_obj = tracker.evaluate(objective, bounds, &shrunk)?;
                        *vertex = SimplexVertex {
                            values: shrunk,
                            objective: shrunk_obj,
                        };
                    }
                }
            }
        }

        tracker.into_outcome()
    }
}

/// Tracks the best evaluation seen across both phases.
struct BestTracker {
    best_point: Option<Vec<f64>>,
    best_value: f64,
    evaluations: usize,
}

impl BestTracker {
    fn new() -> Self {
        Self {
            best_point: None,
            best_value: f64::INFINITY,
            evaluations: 0,
        }
    }

    fn evaluate(
        &mut self,
        objective: &mut Objective<'_>,
        bounds: &[DimensionBounds],
        point: &[f64],
    ) -> SimResult<f64> {
        let snapped: Vec<f64> = point
            .iter()
            .zip(bounds.iter())
            .map(|(v, b)| b.snap(*v))
            .collect();
        let value = objective(&snapped)?;
        self.evaluations += 1;
        if value < self.best_value || self.best_point.is_none() {
            self.best_value = value;
            self.best_point = Some(snapped);
        }
        Ok(value)
    }

    fn into_outcome(self) -> SimResult<MinimizerOutcome> {
        match self.best_point {
            Some(best_point) => Ok(MinimizerOutcome {
                best_point,
                best_value: self.best_value,
                evaluations: self.evaluations,
            }),
            None => Err(SimError::OptimizerFault(
                "no evaluations performed".to_string(),
            )),
        }
    }
}

/// Centroid of all points except the worst (last).
fn centroid(simplex: &[SimplexVertex]) -> Vec<f64> {
    let n = simplex[0].values.len();
    let mut center = vec![0.0; n];
    for vertex in simplex.iter().take(simplex.len() - 1) {
        for (i, val) in vertex.values.iter().enumerate() {
            center[i] += val;
        }
    }
    let count = (simplex.len() - 1) as f64;
    for val in &mut center {
        *val /= count;
    }
    center
}

/// Reflect a point through the centroid.
fn reflect(point: &[f64], centroid: &[f64], coef: f64) -> Vec<f64> {
    point
        .iter()
        .zip(centroid.iter())
        .map(|(p, c)| c + coef * (c - p))
        .collect()
}

fn snap_all(mut values: Vec<f64>, bounds: &[DimensionBounds]) -> Vec<f64> {
    for (value, bound) in values.iter_mut().zip(bounds.iter()) {
        *value = bound.snap(*value);
    }
    values
}

/// Maximum vertex distance from the centroid.
fn simplex_size(simplex: &[SimplexVertex], centroid: &[f64]) -> f64 {
    simplex
        .iter()
        .map(|v| {
            v.values
                .iter()
                .zip(centroid.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .fold(0.0_f64, f64::max)
}
