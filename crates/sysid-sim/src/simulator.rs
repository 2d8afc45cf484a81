//! Response simulator: third-order output trajectory on a fixed time grid.

use serde::Serialize;
use tracing::debug;

use crate::error::SimResult;
use crate::grid::TimeGrid;
use crate::sim::{SimOptions, run_on_grid};
use crate::third_order::{StateVector, ThirdOrderModel, ThirdOrderParams};

/// Output `y` sampled at every grid point.
///
/// Samples the integrator could not reach are `NaN`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trajectory(Vec<f64>);

impl Trajectory {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every sample is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for Trajectory {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl AsRef<[f64]> for Trajectory {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Simulates the third-order model over a shared grid.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseSimulator {
    grid: TimeGrid,
    initial_state: StateVector,
    options: SimOptions,
}

impl ResponseSimulator {
    /// Simulator starting from rest with default integration options.
    pub fn new(grid: TimeGrid) -> Self {
        Self {
            grid,
            initial_state: StateVector::zeros(),
            options: SimOptions::default(),
        }
    }

    pub fn with_initial_state(mut self, initial_state: StateVector) -> Self {
        self.initial_state = initial_state;
        self
    }

    pub fn with_options(mut self, options: SimOptions) -> SimResult<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn initial_state(&self) -> &StateVector {
        &self.initial_state
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    /// Simulate `params` and return `y` at every grid sample.
    ///
    /// Never fails: if integration breaks down, the failing sample and all
    /// later ones are `NaN`.
    pub fn simulate(&self, params: &ThirdOrderParams) -> Trajectory {
        let model = ThirdOrderModel::new(*params).with_initial_state(self.initial_state);
        let mut values = match run_on_grid(&model, &self.grid, &self.options) {
            Ok(record) => {
                if let Some(failure) = &record.failure {
                    debug!(
                        sample = failure.sample,
                        error = %failure.error,
                        ?params,
                        "integration stopped early"
                    );
                }
                record.x.iter().map(|x| x[0]).collect::<Vec<_>>()
            }
            Err(error) => {
                debug!(%error, "simulation rejected");
                Vec::new()
            }
        };
        values.resize(self.grid.len(), f64::NAN);
        Trajectory(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trajectory_length_matches_grid() {
        let sim = ResponseSimulator::new(TimeGrid::default());
        let y = sim.simulate(&ThirdOrderParams::REFERENCE);
        assert_eq!(y.len(), 100);
        assert!(y.is_finite());
    }

    #[test]
    fn rest_state_stays_at_rest() {
        let sim = ResponseSimulator::new(TimeGrid::default());
        let y = sim.simulate(&ThirdOrderParams::REFERENCE);
        assert!(y.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn invalid_options_rejected() {
        let opts = SimOptions {
            max_steps_per_interval: 0,
            ..SimOptions::default()
        };
        assert!(ResponseSimulator::new(TimeGrid::default()).with_options(opts).is_err());
    }
}
