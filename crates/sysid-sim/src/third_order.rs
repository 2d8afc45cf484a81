//! Third-order linear ODE in companion form.
//!
//! State `(y, y', y'')`, parameters `(a3, a2, a1, b3, b2, b1)`:
//!
//! ```text
//! y''' = -(a1 y'' + a2 y' + a3 y) + b1 y'' + b2 y' + b3 y
//! ```
//!
//! The `b` terms act on the same state as the `a` terms; there is no
//! separate input signal.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;

/// `(y, y', y'')`
pub type StateVector = Vector3<f64>;

/// Six free coefficients of the third-order model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThirdOrderParams {
    pub a3: f64,
    pub a2: f64,
    pub a1: f64,
    pub b3: f64,
    pub b2: f64,
    pub b1: f64,
}

impl ThirdOrderParams {
    /// Number of free coefficients.
    pub const DIM: usize = 6;

    /// Coefficients used to synthesize the reference response.
    pub const REFERENCE: Self = Self::from_array([1.0, 5.0, 17.0, 11.0, 13.0, 9.0]);

    /// Build from `[a3, a2, a1, b3, b2, b1]`.
    pub const fn from_array(p: [f64; 6]) -> Self {
        Self {
            a3: p[0],
            a2: p[1],
            a1: p[2],
            b3: p[3],
            b2: p[4],
            b1: p[5],
        }
    }

    /// `[a3, a2, a1, b3, b2, b1]`
    pub const fn to_array(&self) -> [f64; 6] {
        [self.a3, self.a2, self.a1, self.b3, self.b2, self.b1]
    }

    pub fn from_slice(p: &[f64]) -> SimResult<Self> {
        let arr: [f64; 6] = p.try_into().map_err(|_| SimError::InvalidArg {
            what: "third-order parameter vector must have 6 elements",
        })?;
        Ok(Self::from_array(arr))
    }
}

impl From<[f64; 6]> for ThirdOrderParams {
    fn from(p: [f64; 6]) -> Self {
        Self::from_array(p)
    }
}

/// Instantaneous state derivative.
#[inline]
pub fn derivative(state: &StateVector, p: &ThirdOrderParams) -> StateVector {
    let (y0, y1, y2) = (state[0], state[1], state[2]);
    Vector3::new(
        y1,
        y2,
        -(p.a1 * y2 + p.a2 * y1 + p.a3 * y0) + p.b1 * y2 + p.b2 * y1 + p.b3 * y0,
    )
}

/// Third-order model bound to one parameter vector and starting state.
#[derive(Clone, Debug, PartialEq)]
pub struct ThirdOrderModel {
    pub params: ThirdOrderParams,
    pub initial_state: StateVector,
}

impl ThirdOrderModel {
    /// Model starting from rest.
    pub fn new(params: ThirdOrderParams) -> Self {
        Self {
            params,
            initial_state: StateVector::zeros(),
        }
    }

    pub fn with_initial_state(mut self, initial_state: StateVector) -> Self {
        self.initial_state = initial_state;
        self
    }
}

impl TransientModel for ThirdOrderModel {
    type State = StateVector;

    fn initial_state(&self) -> Self::State {
        self.initial_state
    }

    fn rhs(&self, _t: f64, x: &Self::State) -> Self::State {
        derivative(x, &self.params)
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        a + b
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        a * scale
    }

    fn components<'a>(&self, x: &'a Self::State) -> &'a [f64] {
        x.as_slice()
    }

    fn from_components(&self, values: &[f64]) -> Self::State {
        StateVector::from_column_slice(values)
    }
}
