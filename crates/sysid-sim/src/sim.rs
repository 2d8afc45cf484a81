//! Grid-sampled simulation runner and result recording.

use serde::{Deserialize, Serialize};
use sysid_core::Tolerances;

use crate::error::{SimError, SimResult};
use crate::grid::TimeGrid;
use crate::adaptive::{AdaptiveSolver, AdaptiveStats, DEFAULT_ADAPTIVE_TOL};
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::model::TransientModel;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMethod {
    /// Adaptive Dormand-Prince 5(4) (default).
    #[default]
    Adaptive,
    /// 4th-order Runge-Kutta, fixed substeps per grid interval.
    #[serde(rename = "rk4")]
    RK4,
    /// Forward Euler (1st-order), fixed substeps per grid interval.
    ForwardEuler,
}

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Integrator type (default: adaptive)
    pub method: IntegrationMethod,
    /// Error tolerances of the adaptive integrator
    pub tolerances: Tolerances,
    /// Adaptive step limit between two consecutive grid samples
    pub max_steps_per_interval: usize,
    /// Fixed-step methods: steps taken between two grid samples
    pub substeps: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            method: IntegrationMethod::default(),
            tolerances: Tolerances {
                abs: DEFAULT_ADAPTIVE_TOL,
                rel: DEFAULT_ADAPTIVE_TOL,
            },
            max_steps_per_interval: 500,
            substeps: 10,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.tolerances.abs > 0.0) || !(self.tolerances.rel > 0.0) {
            return Err(SimError::InvalidArg {
                what: "tolerances must be positive",
            });
        }
        if self.max_steps_per_interval == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps_per_interval must be positive",
            });
        }
        if self.substeps == 0 {
            return Err(SimError::InvalidArg {
                what: "substeps must be positive",
            });
        }
        Ok(())
    }

    fn adaptive(&self) -> AdaptiveSolver {
        AdaptiveSolver::new(self.tolerances, self.max_steps_per_interval)
    }
}

/// Where and why integration stopped early.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegrationFailure {
    /// Index of the first grid sample that could not be computed
    pub sample: usize,
    pub error: SimError,
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord<S> {
    /// Time points reached (seconds)
    pub t: Vec<f64>,
    /// State snapshots, one per reached time point
    pub x: Vec<S>,
    /// Set when integration stopped before the end of the grid
    pub failure: Option<IntegrationFailure>,
    /// Adaptive step counters (zero for fixed-step methods)
    pub stats: AdaptiveStats,
}

impl<S> SimRecord<S> {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Integrate `model` from its initial state at the first grid sample and
/// record the state at every grid sample.
///
/// Numerical failures do not produce an `Err`: the record stops at the last
/// good sample and `failure` says where integration broke down. `Err` is
/// reserved for invalid options.
pub fn run_on_grid<M: TransientModel>(
    model: &M,
    grid: &TimeGrid,
    opts: &SimOptions,
) -> SimResult<SimRecord<M::State>> {
    opts.validate()?;

    let samples = grid.samples();
    let mut record = SimRecord {
        t: Vec::with_capacity(samples.len()),
        x: Vec::with_capacity(samples.len()),
        failure: None,
        stats: AdaptiveStats::default(),
    };

    let mut x = model.initial_state();
    if model.components(&x).iter().any(|v| !v.is_finite()) {
        record.failure = Some(IntegrationFailure {
            sample: 0,
            error: SimError::NonFinite { t: samples[0] },
        });
        return Ok(record);
    }
    record.t.push(samples[0]);
    record.x.push(x.clone());

    let adaptive = opts.adaptive();

    for (i, w) in samples.windows(2).enumerate() {
        let (t0, t1) = (w[0], w[1]);
        let next = match opts.method {
            IntegrationMethod::Adaptive => {
                adaptive.advance(model, t0, &x, t1, &mut record.stats)
            }
            IntegrationMethod::RK4 => Ok(fixed_steps(&RK4, model, t0, &x, t1, opts.substeps)),
            IntegrationMethod::ForwardEuler => Ok(fixed_steps(
                &ForwardEuler,
                model,
                t0,
                &x,
                t1,
                opts.substeps,
            )),
        }
        .and_then(|next| {
            if model.components(&next).iter().all(|v| v.is_finite()) {
                Ok(next)
            } else {
                Err(SimError::NonFinite { t: t1 })
            }
        });

        match next {
            Ok(next) => {
                x = next;
                record.t.push(t1);
                record.x.push(x.clone());
            }
            Err(error) => {
                record.failure = Some(IntegrationFailure {
                    sample: i + 1,
                    error,
                });
                break;
            }
        }
    }

    Ok(record)
}

fn fixed_steps<I: Integrator, M: TransientModel>(
    integrator: &I,
    model: &M,
    t0: f64,
    x0: &M::State,
    t1: f64,
    substeps: usize,
) -> M::State {
    let dt = (t1 - t0) / substeps as f64;
    let mut x = x0.clone();
    for k in 0..substeps {
        x = integrator.step(model, t0 + k as f64 * dt, &x, dt);
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.method, IntegrationMethod::Adaptive);
        assert_eq!(opts.tolerances.abs, 1.49012e-8);
        assert_eq!(opts.tolerances.rel, 1.49012e-8);
        assert_eq!(opts.max_steps_per_interval, 500);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn sim_options_invalid() {
        let opts = SimOptions {
            substeps: 0,
            ..SimOptions::default()
        };
        assert!(opts.validate().is_err());

        let opts = SimOptions {
            tolerances: Tolerances { abs: 0.0, rel: 1e-6 },
            ..SimOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn adaptive_run_records_every_sample() {
        use crate::third_order::{StateVector, ThirdOrderModel, ThirdOrderParams};

        let model = ThirdOrderModel::new(ThirdOrderParams::from([1.0, 3.0, 3.0, 0.0, 0.0, 0.0]))
            .with_initial_state(StateVector::new(1.0, -1.0, 1.0));
        let grid = TimeGrid::linspace(0.0, 5.0, 11).unwrap();
        let record = run_on_grid(&model, &grid, &SimOptions::default()).unwrap();

        assert!(record.is_complete());
        assert_eq!(record.t, grid.samples());
        assert!(record.stats.accepted_steps >= 10);
        assert!(record.stats.fn_evals > record.stats.accepted_steps);
        let last = record.x.last().unwrap();
        assert!((last[0] - (-5.0f64).exp()).abs() < 1e-7);
    }

    #[test]
    fn adaptive_step_limit_marks_failing_sample() {
        use crate::third_order::{StateVector, ThirdOrderModel, ThirdOrderParams};

        let model = ThirdOrderModel::new(ThirdOrderParams::from([1.0, 3.0, 3.0, 0.0, 0.0, 0.0]))
            .with_initial_state(StateVector::new(1.0, -1.0, 1.0));
        let grid = TimeGrid::linspace(0.0, 50.0, 3).unwrap();
        let opts = SimOptions {
            max_steps_per_interval: 1,
            ..SimOptions::default()
        };
        let record = run_on_grid(&model, &grid, &opts).unwrap();

        let failure = record.failure.expect("one step cannot span 25 seconds");
        assert_eq!(failure.sample, 1);
        assert!(matches!(failure.error, SimError::MaxStepsExceeded { max_steps: 1, .. }));
        assert_eq!(record.x.len(), 1);
    }
}
