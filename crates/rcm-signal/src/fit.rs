//! Polynomial least-squares fitting.

use crate::error::{SignalError, SignalResult};
use nalgebra::{DMatrix, DVector};
use rcm_core::Real;

/// Least-squares polynomial fit via SVD of the Vandermonde matrix.
///
/// Returns coefficients in ascending order: `c[0] + c[1] x + c[2] x^2 ...`
pub fn polyfit(x: &[Real], y: &[Real], degree: usize) -> SignalResult<Vec<Real>> {
    if x.len() != y.len() {
        return Err(SignalError::InvalidArg {
            what: "x and y must have equal length",
        });
    }
    if x.len() < degree + 1 {
        return Err(SignalError::InputTooShort {
            required: degree + 1,
            actual: x.len(),
        });
    }

    let a = DMatrix::from_fn(x.len(), degree + 1, |i, j| x[i].powi(j as i32));
    let b = DVector::from_column_slice(y);
    let solution = a
        .svd(true, true)
        .solve(&b, 1e-14)
        .map_err(|_| SignalError::FitFailed)?;
    Ok(solution.iter().copied().collect())
}

/// Horner evaluation of ascending-order coefficients.
pub fn polyval(coeffs: &[Real], x: Real) -> Real {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcm_core::{Tolerances, nearly_equal};

    #[test]
    fn recovers_line() {
        let x: Vec<Real> = (0..50).map(|i| i as Real * 0.1).collect();
        let y: Vec<Real> = x.iter().map(|v| 3.0 - 0.25 * v).collect();
        let c = polyfit(&x, &y, 1).unwrap();
        let tol = Tolerances {
            abs: 1e-9,
            rel: 1e-9,
        };
        assert!(nearly_equal(c[0], 3.0, tol));
        assert!(nearly_equal(c[1], -0.25, tol));
    }

    #[test]
    fn recovers_quadratic_through_noise_free_points() {
        let x: Vec<Real> = (0..30).map(|i| i as Real - 15.0).collect();
        let y: Vec<Real> = x.iter().map(|v| 1.0 + 2.0 * v + 0.5 * v * v).collect();
        let c = polyfit(&x, &y, 2).unwrap();
        let tol = Tolerances {
            abs: 1e-8,
            rel: 1e-8,
        };
        assert!(nearly_equal(polyval(&c, 4.0), 1.0 + 8.0 + 8.0, tol));
    }

    #[test]
    fn rejects_underdetermined_fit() {
        assert!(matches!(
            polyfit(&[0.0, 1.0], &[0.0, 1.0], 2),
            Err(SignalError::InputTooShort { .. })
        ));
    }

    #[test]
    fn polyval_on_empty_is_zero() {
        assert_eq!(polyval(&[], 3.0), 0.0);
    }
}
