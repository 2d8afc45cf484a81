//! Frequency response for Bode plots.

use nalgebra::Complex;
use serde::Serialize;
use sysid_core::logspace;

use crate::error::{LtiError, LtiResult};
use crate::transfer_function::TransferFunction;

/// Sample count of the automatic frequency sweep.
pub const DEFAULT_FREQUENCY_SAMPLES: usize = 10_000;

/// `H(jw)` sampled over angular frequency.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrequencyResponse {
    /// rad/s
    pub w: Vec<f64>,
    pub magnitude_db: Vec<f64>,
    /// Degrees in [-180, 180]
    pub phase_deg: Vec<f64>,
}

/// Log-spaced sweep that brackets the system's poles and zeros.
///
/// Decade limits are taken from the upper-half-plane poles and from zeros
/// with modulus below 1e5, then rounded to whole decades.
pub fn default_frequencies(tf: &TransferFunction, n: usize) -> Vec<f64> {
    let mut poles: Vec<Complex<f64>> = tf.poles();
    if poles.is_empty() {
        poles.push(Complex::new(-1000.0, 0.0));
    }

    let features: Vec<Complex<f64>> = poles
        .into_iter()
        .filter(|p| p.im >= 0.0)
        .chain(
            tf.zeros()
                .into_iter()
                .filter(|z| z.norm() < 1e5 && z.im >= 0.0),
        )
        .collect();

    // Roots at the origin are shifted by one so the logarithm stays finite.
    let shift = |z: &Complex<f64>| if z.norm() < 1e-10 { 1.0 } else { 0.0 };
    let high = features
        .iter()
        .map(|z| 3.0 * (z.re + shift(z)).abs() + 1.5 * z.im)
        .fold(f64::NEG_INFINITY, f64::max);
    let low = features
        .iter()
        .map(|z| (z.re + shift(z)).abs() + 2.0 * z.im)
        .fold(f64::INFINITY, f64::min);

    let high_exp = (high.log10() + 0.5).round_ties_even();
    let low_exp = ((0.1 * low).log10() - 0.5).round_ties_even();
    logspace(low_exp, high_exp, n)
}

/// Evaluate `H(jw)`; `None` uses [`default_frequencies`].
pub fn frequency_response(
    tf: &TransferFunction,
    frequencies: Option<&[f64]>,
) -> LtiResult<FrequencyResponse> {
    let w = match frequencies {
        Some(w) => w.to_vec(),
        None => default_frequencies(tf, DEFAULT_FREQUENCY_SAMPLES),
    };
    if w.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(LtiError::InvalidArg {
            what: "frequencies must be finite and non-negative",
        });
    }

    let (magnitude_db, phase_deg) = w
        .iter()
        .map(|&wi| {
            let h = tf.eval(Complex::new(0.0, wi));
            (20.0 * h.norm().log10(), h.im.atan2(h.re).to_degrees())
        })
        .unzip();

    Ok(FrequencyResponse {
        w,
        magnitude_db,
        phase_deg,
    })
}
