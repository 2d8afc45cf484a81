//! Impulse and step responses.

use nalgebra::DVector;
use serde::Serialize;
use sysid_core::linspace;
use sysid_sim::{SimOptions, SimRecord, TimeGrid, run_on_grid};
use tracing::debug;

use crate::error::{LtiError, LtiResult};
use crate::state_space::{ForcedResponse, StateSpace};
use crate::transfer_function::TransferFunction;

/// Sample count of the automatic time vector.
pub const DEFAULT_RESPONSE_SAMPLES: usize = 100;

/// Output samples of a time-domain response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeResponse {
    pub t: Vec<f64>,
    pub y: Vec<f64>,
}

/// `n` points on `[0, 7 / r]`, `r` the slowest pole's decay rate.
///
/// `r` falls back to 1 for systems without poles or with a pole on the
/// imaginary axis.
pub fn default_response_times(tf: &TransferFunction, n: usize) -> Vec<f64> {
    let r = tf
        .poles()
        .iter()
        .map(|p| p.re.abs())
        .fold(f64::INFINITY, f64::min);
    let r = if r == 0.0 || !r.is_finite() { 1.0 } else { r };
    linspace(0.0, 7.0 / r, n)
}

/// Response to a unit impulse: zero input from `x(0) = B`.
pub fn impulse_response(tf: &TransferFunction, times: Option<&[f64]>) -> LtiResult<TimeResponse> {
    let sys = tf.to_state_space();
    let x0 = sys.b.clone();
    respond(tf, &sys, times, x0, 0.0)
}

/// Response to a unit step from rest.
pub fn step_response(tf: &TransferFunction, times: Option<&[f64]>) -> LtiResult<TimeResponse> {
    let sys = tf.to_state_space();
    let x0 = DVector::zeros(sys.order());
    respond(tf, &sys, times, x0, 1.0)
}

fn respond(
    tf: &TransferFunction,
    sys: &StateSpace,
    times: Option<&[f64]>,
    x0: DVector<f64>,
    input: f64,
) -> LtiResult<TimeResponse> {
    let t = match times {
        Some(t) => t.to_vec(),
        None => default_response_times(tf, DEFAULT_RESPONSE_SAMPLES),
    };
    let grid = TimeGrid::from_samples(t)?;

    if sys.order() == 0 {
        let y = vec![sys.d * input; grid.len()];
        return Ok(TimeResponse {
            t: grid.samples().to_vec(),
            y,
        });
    }

    let model = ForcedResponse {
        system: sys,
        x0,
        input,
    };
    let record: SimRecord<DVector<f64>> = run_on_grid(&model, &grid, &SimOptions::default())?;
    if let Some(failure) = record.failure {
        debug!(sample = failure.sample, error = %failure.error, "LTI response integration failed");
        return Err(LtiError::Simulation {
            sample: failure.sample,
            source: failure.error,
        });
    }

    let y = record.x.iter().map(|x| sys.output(x, input)).collect();
    Ok(TimeResponse { t: record.t, y })
}
