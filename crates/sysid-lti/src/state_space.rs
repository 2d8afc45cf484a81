//! State-space realization and its forced simulation model.

use nalgebra::{DMatrix, DVector};
use sysid_sim::TransientModel;

/// `x' = A x + B u`, `y = C x + D u`, single input and output.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSpace {
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
    pub c: DVector<f64>,
    pub d: f64,
}

impl StateSpace {
    /// Realize `num / den` in controllable canonical form.
    ///
    /// Both slices must be trimmed, `den[0] != 0` and
    /// `num.len() <= den.len()`.
    pub(crate) fn controllable_canonical(num: &[f64], den: &[f64]) -> Self {
        let lead = den[0];
        let n = den.len() - 1;
        let den_n: Vec<f64> = den.iter().map(|c| c / lead).collect();
        let mut num_p = vec![0.0; den.len() - num.len()];
        num_p.extend(num.iter().map(|c| c / lead));

        let d = num_p[0];
        let mut a = DMatrix::<f64>::zeros(n, n);
        for j in 0..n {
            a[(0, j)] = -den_n[j + 1];
        }
        for i in 1..n {
            a[(i, i - 1)] = 1.0;
        }
        let mut b = DVector::<f64>::zeros(n);
        if n > 0 {
            b[0] = 1.0;
        }
        let c = DVector::from_iterator(n, (0..n).map(|j| num_p[j + 1] - d * den_n[j + 1]));

        Self { a, b, c, d }
    }

    pub fn order(&self) -> usize {
        self.b.len()
    }

    /// Output for state `x` under constant input `u`.
    pub fn output(&self, x: &DVector<f64>, u: f64) -> f64 {
        self.c.dot(x) + self.d * u
    }
}

/// The realization driven by a constant input from a given initial state.
pub(crate) struct ForcedResponse<'a> {
    pub system: &'a StateSpace,
    pub x0: DVector<f64>,
    pub input: f64,
}

impl TransientModel for ForcedResponse<'_> {
    type State = DVector<f64>;

    fn initial_state(&self) -> Self::State {
        self.x0.clone()
    }

    fn rhs(&self, _t: f64, x: &Self::State) -> Self::State {
        &self.system.a * x + &self.system.b * self.input
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
        DVector::from_column_slice(values)
    }
}
