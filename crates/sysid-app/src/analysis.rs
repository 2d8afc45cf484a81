//! Descriptive analysis of the fixed transfer function.

use nalgebra::Complex;
use serde::Serialize;
use sysid_lti::{
    FrequencyResponse, TimeResponse, TransferFunction, frequency_response, impulse_response,
    step_response,
};
use tracing::info;

use crate::error::AppResult;

/// A point of the complex plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ComplexPoint {
    pub re: f64,
    pub im: f64,
}

impl From<Complex<f64>> for ComplexPoint {
    fn from(z: Complex<f64>) -> Self {
        Self { re: z.re, im: z.im }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoleZeroMap {
    pub poles: Vec<ComplexPoint>,
    pub zeros: Vec<ComplexPoint>,
}

/// Time- and frequency-domain description of one transfer function.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SystemAnalysis {
    pub transfer_function: TransferFunction,
    pub dc_gain: f64,
    pub impulse: TimeResponse,
    pub step: TimeResponse,
    pub pole_zero: PoleZeroMap,
    pub bode: FrequencyResponse,
}

/// Impulse, step, pole-zero and Bode data on automatic time and frequency
/// samples.
pub fn analyze(tf: &TransferFunction) -> AppResult<SystemAnalysis> {
    let pole_zero = PoleZeroMap {
        poles: tf.poles().into_iter().map(ComplexPoint::from).collect(),
        zeros: tf.zeros().into_iter().map(ComplexPoint::from).collect(),
    };
    info!(
        poles = pole_zero.poles.len(),
        zeros = pole_zero.zeros.len(),
        "analysing transfer function"
    );

    Ok(SystemAnalysis {
        transfer_function: tf.clone(),
        dc_gain: tf.dc_gain(),
        impulse: impulse_response(tf, None)?,
        step: step_response(tf, None)?,
        pole_zero,
        bode: frequency_response(tf, None)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_descriptor() {
        let tf = TransferFunction::new(&[13.0, 9.0], &[1.0, 5.0, 17.0, 11.0]).unwrap();
        let analysis = analyze(&tf).unwrap();
        assert_eq!(analysis.pole_zero.poles.len(), 3);
        assert_eq!(analysis.pole_zero.zeros.len(), 1);
        assert_eq!(analysis.impulse.t.len(), 100);
        assert_eq!(analysis.step.t.len(), 100);
        assert_eq!(analysis.bode.w.len(), 10_000);
        assert!((analysis.dc_gain - 9.0 / 11.0).abs() < 1e-15);
    }
}
