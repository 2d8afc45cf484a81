//! Sum-of-squared-errors objective over simulated trajectories.

use sysid_core::{CoreError, CoreResult};
use sysid_sim::{ResponseSimulator, ThirdOrderParams, Trajectory};

/// `Σ (a_i - b_i)²`. `NaN` anywhere propagates to the result.
pub fn sum_squared_error(a: &[f64], b: &[f64]) -> CoreResult<f64> {
    if a.len() != b.len() {
        return Err(CoreError::LengthMismatch {
            what: "trajectory",
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(sse(a, b))
}

fn sse(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Scores candidate coefficients against a fixed reference trajectory.
#[derive(Clone, Debug)]
pub struct SseObjective {
    simulator: ResponseSimulator,
    reference: Trajectory,
}

impl SseObjective {
    pub fn new(simulator: ResponseSimulator, reference: Trajectory) -> CoreResult<Self> {
        if reference.len() != simulator.grid().len() {
            return Err(CoreError::LengthMismatch {
                what: "reference trajectory",
                expected: simulator.grid().len(),
                actual: reference.len(),
            });
        }
        Ok(Self {
            simulator,
            reference,
        })
    }

    /// Simulate `truth` on the simulator's grid and use it as the reference.
    pub fn from_true_params(simulator: ResponseSimulator, truth: &ThirdOrderParams) -> Self {
        let reference = simulator.simulate(truth);
        Self {
            simulator,
            reference,
        }
    }

    pub fn reference(&self) -> &Trajectory {
        &self.reference
    }

    pub fn simulator(&self) -> &ResponseSimulator {
        &self.simulator
    }

    pub fn cost(&self, params: &ThirdOrderParams) -> f64 {
        let simulated = self.simulator.simulate(params);
        sse(self.reference.values(), simulated.values())
    }

    /// Cost of a raw `[a3, a2, a1, b3, b2, b1]` vector; `NaN` if it has the
    /// wrong length.
    pub fn cost_slice(&self, params: &[f64]) -> f64 {
        match ThirdOrderParams::from_slice(params) {
            Ok(p) => self.cost(&p),
            Err(_) => f64::NAN,
        }
    }
}
