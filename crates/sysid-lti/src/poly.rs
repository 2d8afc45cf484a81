//! Polynomial helpers, coefficients ordered highest power first.

use nalgebra::{Complex, DMatrix};

/// Drop leading zero coefficients.
pub(crate) fn trim_leading_zeros(coeffs: &[f64]) -> &[f64] {
    let first = coeffs.iter().position(|c| *c != 0.0).unwrap_or(coeffs.len());
    &coeffs[first..]
}

/// Evaluate the polynomial at `s` (Horner).
pub fn polyval(coeffs: &[f64], s: Complex<f64>) -> Complex<f64> {
    coeffs
        .iter()
        .fold(Complex::new(0.0, 0.0), |acc, &c| acc * s + c)
}

/// All complex roots, via eigenvalues of the companion matrix.
///
/// Trailing zero coefficients contribute roots at the origin. The result is
/// sorted by real then imaginary part.
pub fn roots(coeffs: &[f64]) -> Vec<Complex<f64>> {
    let coeffs = trim_leading_zeros(coeffs);
    let trailing = coeffs.iter().rev().take_while(|c| **c == 0.0).count();
    let core = &coeffs[..coeffs.len() - trailing];

    let mut out: Vec<Complex<f64>> = vec![Complex::new(0.0, 0.0); trailing];
    let n = core.len().saturating_sub(1);
    match n {
        0 => {}
        1 => out.push(Complex::new(-core[1] / core[0], 0.0)),
        _ => {
            let mut companion = DMatrix::<f64>::zeros(n, n);
            for j in 0..n {
                companion[(0, j)] = -core[j + 1] / core[0];
            }
            for i in 1..n {
                companion[(i, i - 1)] = 1.0;
            }
            out.extend(companion.complex_eigenvalues().iter().copied());
        }
    }

    out.sort_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Complex<f64>, b: Complex<f64>) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn horner_matches_expansion() {
        let s = Complex::new(0.5, -2.0);
        let got = polyval(&[1.0, 5.0, 17.0, 11.0], s);
        let want = s * s * s + s * s * 5.0 + s * 17.0 + 11.0;
        assert!(close(got, want));
    }

    #[test]
    fn roots_of_linear() {
        let r = roots(&[13.0, 9.0]);
        assert_eq!(r.len(), 1);
        assert!(close(r[0], Complex::new(-9.0 / 13.0, 0.0)));
    }

    #[test]
    fn roots_of_quadratic_pair() {
        // s^2 + 2s + 5 = (s + 1 - 2j)(s + 1 + 2j)
        let r = roots(&[1.0, 2.0, 5.0]);
        assert_eq!(r.len(), 2);
        assert!(close(r[0], Complex::new(-1.0, -2.0)));
        assert!(close(r[1], Complex::new(-1.0, 2.0)));
    }

    #[test]
    fn roots_handle_zero_coefficients() {
        assert!(roots(&[0.0, 0.0, 4.0]).is_empty());
        let r = roots(&[0.0, 1.0, -3.0, 0.0]);
        assert_eq!(r.len(), 2);
        assert!(close(r[0], Complex::new(0.0, 0.0)));
        assert!(close(r[1], Complex::new(3.0, 0.0)));
    }

    #[test]
    fn roots_vanish_polynomial() {
        let den = [1.0, 5.0, 17.0, 11.0];
        for r in roots(&den) {
            assert!(polyval(&den, r).norm() < 1e-9);
        }
    }
}
