//! Elementwise box constraints.

use serde::Serialize;
use sysid_core::ensure_all_finite;

use crate::error::{OptimError, OptimResult};

/// Lower/upper limit per dimension, `lower[i] <= upper[i]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> OptimResult<Self> {
        if lower.len() != upper.len() {
            return Err(OptimError::BoundsMismatch {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        if lower.is_empty() {
            return Err(OptimError::InvalidArg {
                what: "bounds must have at least one dimension",
            });
        }
        ensure_all_finite(&lower, "lower bound")?;
        ensure_all_finite(&upper, "upper bound")?;
        if let Some(index) = lower.iter().zip(&upper).position(|(l, u)| l > u) {
            return Err(OptimError::InvalidBounds {
                index,
                lower: lower[index],
                upper: upper[index],
            });
        }
        Ok(Self { lower, upper })
    }

    /// Same `[lower, upper]` interval in every one of `dim` dimensions.
    pub fn uniform(dim: usize, lower: f64, upper: f64) -> OptimResult<Self> {
        Self::new(vec![lower; dim], vec![upper; dim])
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// `upper[i] - lower[i]`
    pub fn span(&self, i: usize) -> f64 {
        self.upper[i] - self.lower[i]
    }

    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.dim()
            && x
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(v, (l, u))| (*l..=*u).contains(v))
    }

    /// Project `x` onto the box in place.
    pub fn clamp(&self, x: &mut [f64]) {
        for ((v, l), u) in x.iter_mut().zip(&self.lower).zip(&self.upper) {
            *v = v.clamp(*l, *u);
        }
    }
}
