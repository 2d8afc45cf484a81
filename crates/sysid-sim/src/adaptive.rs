//! Adaptive integration through `ode_solvers`' Dormand-Prince 5(4) stepper.

use ode_solvers::DVector;
use ode_solvers::dop_shared::{IntegrationError, OutputType, System};
use ode_solvers::dopri5::Dopri5;
use sysid_core::Tolerances;

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;

/// Default absolute/relative tolerance of the adaptive solver.
pub const DEFAULT_ADAPTIVE_TOL: f64 = 1.49012e-8;

type OdeState = DVector<f64>;

/// Step counters accumulated over adaptive calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdaptiveStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub fn_evals: usize,
}

/// Presents a [`TransientModel`] to the library stepper on flat vectors.
struct FlatSystem<'a, M> {
    model: &'a M,
}

impl<M: TransientModel> System<f64, OdeState> for FlatSystem<'_, M> {
    fn system(&self, t: f64, y: &OdeState, dy: &mut OdeState) {
        let x = self.model.from_components(y.as_slice());
        let xdot = self.model.rhs(t, &x);
        dy.copy_from_slice(self.model.components(&xdot));
    }
}

/// Dormand-Prince 5(4) with error control, one call per output interval.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptiveSolver {
    pub tolerances: Tolerances,
    /// Step limit per call to `advance`
    pub max_steps: usize,
}

impl Default for AdaptiveSolver {
    fn default() -> Self {
        Self {
            tolerances: Tolerances {
                abs: DEFAULT_ADAPTIVE_TOL,
                rel: DEFAULT_ADAPTIVE_TOL,
            },
            max_steps: 500,
        }
    }
}

impl AdaptiveSolver {
    pub fn new(tolerances: Tolerances, max_steps: usize) -> Self {
        Self {
            tolerances,
            max_steps,
        }
    }

    /// Integrate from `t0` to `t1` and return the state at `t1`.
    pub fn advance<M: TransientModel>(
        &self,
        model: &M,
        t0: f64,
        x0: &M::State,
        t1: f64,
        stats: &mut AdaptiveStats,
    ) -> SimResult<M::State> {
        let span = t1 - t0;
        if !(span > 0.0) || !span.is_finite() {
            return Err(SimError::InvalidArg {
                what: "integration span must be positive and finite",
            });
        }
        let start = model.components(x0);
        if start.iter().any(|v| !v.is_finite()) {
            return Err(SimError::NonFinite { t: t0 });
        }

        let max_steps = u32::try_from(self.max_steps).unwrap_or(u32::MAX);
        let mut stepper = Dopri5::from_param(
            FlatSystem { model },
            t0,
            t1,
            span,
            OdeState::from_column_slice(start),
            self.tolerances.rel,
            self.tolerances.abs,
            0.9,
            0.04,
            0.2,
            10.0,
            span,
            0.0,
            max_steps,
            1000,
            OutputType::Sparse,
        );

        let run = stepper.integrate().map_err(|e| match e {
            IntegrationError::MaxNumStepReached { x, .. } => SimError::MaxStepsExceeded {
                t: x,
                max_steps: self.max_steps,
            },
            IntegrationError::StepSizeUnderflow { x } => SimError::StepSizeUnderflow { t: x },
            IntegrationError::StiffnessDetected { x } => SimError::StiffnessDetected { t: x },
        })?;
        stats.accepted_steps += run.accepted_steps as usize;
        stats.rejected_steps += run.rejected_steps as usize;
        stats.fn_evals += run.num_eval as usize;

        let end = stepper.y_out().last().ok_or(SimError::InvalidArg {
            what: "adaptive solver produced no output",
        })?;
        if end.iter().any(|v| !v.is_finite()) {
            return Err(SimError::NonFinite { t: t1 });
        }
        Ok(model.from_components(end.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dx/dt = -k x
    struct Decay {
        k: f64,
        x0: f64,
    }

    impl TransientModel for Decay {
        type State = Vec<f64>;

        fn initial_state(&self) -> Self::State {
            vec![self.x0]
        }

        fn rhs(&self, _t: f64, x: &Self::State) -> Self::State {
            vec![-self.k * x[0]]
        }

        fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
            a.iter().zip(b).map(|(x, y)| x + y).collect()
        }

        fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
            a.iter().map(|x| x * scale).collect()
        }

        fn components<'a>(&self, x: &'a Self::State) -> &'a [f64] {
            x
        }

        fn from_components(&self, values: &[f64]) -> Self::State {
            values.to_vec()
        }
    }

    #[test]
    fn meets_tolerance_on_decay() {
        let model = Decay { k: 3.0, x0: 1.0 };
        let mut stats = AdaptiveStats::default();
        let x = AdaptiveSolver::default()
            .advance(&model, 0.0, &model.initial_state(), 2.0, &mut stats)
            .unwrap();
        assert!((x[0] - (-6.0f64).exp()).abs() < 1e-7);
        assert!(stats.accepted_steps > 0);
        assert!(stats.fn_evals > 0);
    }

    #[test]
    fn zero_state_stays_zero() {
        let model = Decay { k: 5.0, x0: 0.0 };
        let mut stats = AdaptiveStats::default();
        let x = AdaptiveSolver::default()
            .advance(&model, 0.0, &model.initial_state(), 0.1, &mut stats)
            .unwrap();
        assert_eq!(x[0], 0.0);
    }

    #[test]
    fn rejects_empty_span() {
        let model = Decay { k: 1.0, x0: 1.0 };
        let mut stats = AdaptiveStats::default();
        let err = AdaptiveSolver::default()
            .advance(&model, 1.0, &model.initial_state(), 1.0, &mut stats)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidArg { .. }));
    }

    #[test]
    fn step_limit_is_reported() {
        let model = Decay { k: 1.0, x0: 1.0 };
        let solver = AdaptiveSolver::new(
            Tolerances {
                abs: 1e-12,
                rel: 1e-12,
            },
            2,
        );
        let mut stats = AdaptiveStats::default();
        let err = solver
            .advance(&model, 0.0, &model.initial_state(), 10.0, &mut stats)
            .unwrap_err();
        assert!(matches!(err, SimError::MaxStepsExceeded { max_steps: 2, .. }));
    }

    #[test]
    fn flags_non_finite_start() {
        let model = Decay {
            k: 1.0,
            x0: f64::NAN,
        };
        let mut stats = AdaptiveStats::default();
        let err = AdaptiveSolver::default()
            .advance(&model, 0.0, &model.initial_state(), 1.0, &mut stats)
            .unwrap_err();
        assert!(matches!(err, SimError::NonFinite { .. }));
    }
}
