//! Particle Swarm Optimization (PSO).
//!
//! Each particle has a position and velocity, updated every iteration by:
//!
//! ```text
//! v = w·v + φp·rp·(p - x) + φg·rg·(g - x)
//! x = clamp(x + v, lower, upper)
//! ```
//!
//! where `p` is the particle's best position so far, `g` the swarm's best,
//! and `rp`, `rg` are uniform draws in `[0, 1)` per particle and dimension.
//!
//! The search stops after `max_iterations`, when an improvement of the swarm
//! best changes the objective by at most `min_func`, when it moves the best
//! position by at most `min_step`, or when the optional wall-clock budget is
//! spent.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bounds::Bounds;
use crate::error::{OptimError, OptimResult};

/// Swarm configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsoOptions {
    /// Number of particles
    pub swarm_size: usize,
    /// Inertia weight ω
    pub inertia: f64,
    /// Attraction to the particle's own best position (φp)
    pub cognitive: f64,
    /// Attraction to the swarm's best position (φg)
    pub social: f64,
    /// Iteration budget after initialization
    pub max_iterations: usize,
    /// Stop when the swarm best moves by at most this distance
    pub min_step: f64,
    /// Stop when the swarm best objective improves by at most this amount
    pub min_func: f64,
    /// Random seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Evaluate particles of one iteration on the rayon pool
    pub parallel: bool,
    /// Optional wall-clock budget in seconds
    pub time_budget_secs: Option<f64>,
}

impl Default for PsoOptions {
    fn default() -> Self {
        Self {
            swarm_size: 100,
            inertia: 0.5,
            cognitive: 0.5,
            social: 0.5,
            max_iterations: 100,
            min_step: 1e-8,
            min_func: 1e-8,
            seed: None,
            parallel: true,
            time_budget_secs: None,
        }
    }
}

/// Why the search stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    MaxIterations,
    ObjectiveStalled,
    StepStalled,
    TimeBudget,
}

/// Outcome of a swarm search.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PsoResult {
    pub best_position: Vec<f64>,
    /// Objective at `best_position`; `+inf` if no finite value was ever seen
    pub best_value: f64,
    /// Completed update iterations (initialization excluded)
    pub iterations: usize,
    /// Objective evaluations, initialization included
    pub evaluations: usize,
    pub termination: Termination,
    /// Swarm best value after initialization and after every iteration
    pub history: Vec<f64>,
}

/// `NaN` never wins a comparison against a real value.
#[inline]
fn rank(value: f64) -> f64 {
    if value.is_nan() { f64::INFINITY } else { value }
}

fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(bi, bv), (i, &v)| {
            if v < bv { (i, v) } else { (bi, bv) }
        })
        .0
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Particle and swarm bookkeeping; lives only for one `minimize` call.
struct Swarm {
    positions: Vec<Vec<f64>>,
    velocities: Vec<Vec<f64>>,
    best_positions: Vec<Vec<f64>>,
    best_values: Vec<f64>,
    global_position: Vec<f64>,
    global_value: f64,
}

/// Box-constrained particle swarm minimizer.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSwarm {
    options: PsoOptions,
}

impl ParticleSwarm {
    pub fn new(options: PsoOptions) -> OptimResult<Self> {
        if options.swarm_size == 0 {
            return Err(OptimError::InvalidArg {
                what: "swarm_size must be positive",
            });
        }
        let coefficients = [options.inertia, options.cognitive, options.social];
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(OptimError::InvalidArg {
                what: "swarm coefficients must be finite",
            });
        }
        if !(options.min_step >= 0.0) || !(options.min_func >= 0.0) {
            return Err(OptimError::InvalidArg {
                what: "stopping thresholds must be non-negative",
            });
        }
        if let Some(budget) = options.time_budget_secs {
            if !(budget >= 0.0) || !budget.is_finite() {
                return Err(OptimError::InvalidArg {
                    what: "time budget must be a non-negative number of seconds",
                });
            }
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &PsoOptions {
        &self.options
    }

    fn evaluate<F>(&self, objective: &F, positions: &[Vec<f64>]) -> Vec<f64>
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        if self.options.parallel {
            positions.par_iter().map(|x| objective(x.as_slice())).collect()
        } else {
            positions.iter().map(|x| objective(x.as_slice())).collect()
        }
    }

    fn initialize<F>(&self, objective: &F, bounds: &Bounds, rng: &mut StdRng) -> Swarm
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        let n = self.options.swarm_size;
        let dim = bounds.dim();

        let mut positions = Vec::with_capacity(n);
        let mut velocities = Vec::with_capacity(n);
        for _ in 0..n {
            let pos: Vec<f64> = (0..dim)
                .map(|d| bounds.lower()[d] + rng.random::<f64>() * bounds.span(d))
                .collect();
            let vel: Vec<f64> = (0..dim)
                .map(|d| {
                    let span = bounds.span(d);
                    -span + rng.random::<f64>() * 2.0 * span
                })
                .collect();
            positions.push(pos);
            velocities.push(vel);
        }

        let best_values: Vec<f64> = self
            .evaluate(objective, &positions)
            .into_iter()
            .map(rank)
            .collect();
        let best_positions = positions.clone();

        let i_min = argmin(&best_values);
        Swarm {
            global_position: best_positions[i_min].clone(),
            global_value: best_values[i_min],
            positions,
            velocities,
            best_positions,
            best_values,
        }
    }

    /// Minimize `objective` inside `bounds`.
    ///
    /// `objective` may return `NaN` or `inf` for unusable candidates; such
    /// values rank below every finite value.
    pub fn minimize<F>(&self, objective: F, bounds: &Bounds) -> OptimResult<PsoResult>
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        let opts = &self.options;
        let started = Instant::now();
        // A budget too large for `Duration` never runs out.
        let budget = opts
            .time_budget_secs
            .and_then(|b| Duration::try_from_secs_f64(b).ok());
        let mut rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut swarm = self.initialize(&objective, bounds, &mut rng);
        let mut evaluations = opts.swarm_size;
        let mut history = vec![swarm.global_value];
        debug!(best = swarm.global_value, "swarm initialized");

        let finish = |swarm: Swarm,
                      iterations: usize,
                      evaluations: usize,
                      termination: Termination,
                      history: Vec<f64>| {
            info!(
                ?termination,
                iterations,
                evaluations,
                best = swarm.global_value,
                "particle swarm finished"
            );
            PsoResult {
                best_position: swarm.global_position,
                best_value: swarm.global_value,
                iterations,
                evaluations,
                termination,
                history,
            }
        };

        for iteration in 1..=opts.max_iterations {
            if budget.is_some_and(|b| started.elapsed() >= b) {
                return Ok(finish(
                    swarm,
                    iteration - 1,
                    evaluations,
                    Termination::TimeBudget,
                    history,
                ));
            }

            // Draws stay serial so seeded runs do not depend on thread count.
            for i in 0..opts.swarm_size {
                let x = &mut swarm.positions[i];
                let v = &mut swarm.velocities[i];
                let p = &swarm.best_positions[i];
                for d in 0..bounds.dim() {
                    let rp: f64 = rng.random();
                    let rg: f64 = rng.random();
                    v[d] = opts.inertia * v[d]
                        + opts.cognitive * rp * (p[d] - x[d])
                        + opts.social * rg * (swarm.global_position[d] - x[d]);
                    x[d] += v[d];
                }
                bounds.clamp(x);
            }

            let values = self.evaluate(&objective, &swarm.positions);
            evaluations += opts.swarm_size;

            for (i, value) in values.into_iter().map(rank).enumerate() {
                if value < swarm.best_values[i] {
                    swarm.best_positions[i].clone_from(&swarm.positions[i]);
                    swarm.best_values[i] = value;
                }
            }

            let i_min = argmin(&swarm.best_values);
            let candidate = swarm.best_values[i_min];
            if candidate < swarm.global_value {
                let step = distance(&swarm.global_position, &swarm.best_positions[i_min]);
                let improvement = (swarm.global_value - candidate).abs();
                swarm.global_position.clone_from(&swarm.best_positions[i_min]);
                swarm.global_value = candidate;
                history.push(candidate);

                if improvement <= opts.min_func {
                    return Ok(finish(
                        swarm,
                        iteration,
                        evaluations,
                        Termination::ObjectiveStalled,
                        history,
                    ));
                }
                if step <= opts.min_step {
                    return Ok(finish(
                        swarm,
                        iteration,
                        evaluations,
                        Termination::StepStalled,
                        history,
                    ));
                }
            } else {
                history.push(swarm.global_value);
            }

            debug!(iteration, best = swarm.global_value, "swarm iteration");
        }

        Ok(finish(
            swarm,
            opts.max_iterations,
            evaluations,
            Termination::MaxIterations,
            history,
        ))
    }
}
