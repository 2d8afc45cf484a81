//! Transfer function descriptor.

use nalgebra::Complex;
use serde::Serialize;
use sysid_core::ensure_all_finite;

use crate::error::{LtiError, LtiResult};
use crate::poly::{polyval, roots, trim_leading_zeros};
use crate::state_space::StateSpace;

/// Proper SISO transfer function `num(s) / den(s)`.
///
/// Coefficients are stored highest power first with leading zeros removed.
/// The zero numerator is stored as `[0.0]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransferFunction {
    num: Vec<f64>,
    den: Vec<f64>,
}

impl TransferFunction {
    pub fn new(num: &[f64], den: &[f64]) -> LtiResult<Self> {
        ensure_all_finite(num, "numerator coefficient")?;
        ensure_all_finite(den, "denominator coefficient")?;

        let den = trim_leading_zeros(den);
        if den.is_empty() {
            return Err(LtiError::ZeroDenominator);
        }
        let num = match trim_leading_zeros(num) {
            [] => vec![0.0],
            coeffs => coeffs.to_vec(),
        };

        let (num_degree, den_degree) = (num.len() - 1, den.len() - 1);
        if num_degree > den_degree {
            return Err(LtiError::Improper {
                num_degree,
                den_degree,
            });
        }

        Ok(Self {
            num,
            den: den.to_vec(),
        })
    }

    pub fn numerator(&self) -> &[f64] {
        &self.num
    }

    pub fn denominator(&self) -> &[f64] {
        &self.den
    }

    pub fn num_degree(&self) -> usize {
        self.num.len() - 1
    }

    /// System order.
    pub fn den_degree(&self) -> usize {
        self.den.len() - 1
    }

    /// `H(s)`.
    pub fn eval(&self, s: Complex<f64>) -> Complex<f64> {
        polyval(&self.num, s) / polyval(&self.den, s)
    }

    pub fn poles(&self) -> Vec<Complex<f64>> {
        roots(&self.den)
    }

    pub fn zeros(&self) -> Vec<Complex<f64>> {
        roots(&self.num)
    }

    /// `H(0)`; infinite when the system has a pole at the origin.
    pub fn dc_gain(&self) -> f64 {
        let n = self.num[self.num.len() - 1];
        let d = self.den[self.den.len() - 1];
        n / d
    }

    /// Controllable canonical realization.
    pub fn to_state_space(&self) -> StateSpace {
        StateSpace::controllable_canonical(&self.num, &self.den)
    }
}
