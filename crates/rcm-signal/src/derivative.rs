//! Numerical differentiation of uniformly sampled signals.

use crate::error::{SignalError, SignalResult};
use crate::smooth::moving_average;
use rcm_core::Real;

/// Second-order forward difference, `(-3 y[i] + 4 y[i+1] - y[i+2]) / (2 dt)`,
/// with one-sided differences at the last two samples. Any non-finite
/// result is zeroed.
pub fn derivative(values: &[Real], frequency: Real) -> SignalResult<Vec<Real>> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(SignalError::InvalidArg {
            what: "sampling frequency must be positive and finite",
        });
    }
    let n = values.len();
    if n < 3 {
        return Err(SignalError::InputTooShort {
            required: 3,
            actual: n,
        });
    }

    let mut ddt = vec![0.0; n];
    for i in 0..n - 2 {
        ddt[i] = (-3.0 * values[i] + 4.0 * values[i + 1] - values[i + 2]) * frequency / 2.0;
    }
    ddt[n - 2] = (values[n - 2] - values[n - 3]) * frequency;
    ddt[n - 1] = (values[n - 1] - values[n - 2]) * frequency;

    for d in ddt.iter_mut() {
        if !d.is_finite() {
            *d = 0.0;
        }
    }
    Ok(ddt)
}

/// Derivative followed by moving-average smoothing to suppress
/// differentiation noise.
pub fn smoothed_derivative(values: &[Real], frequency: Real, span: usize) -> SignalResult<Vec<Real>> {
    moving_average(&derivative(values, frequency)?, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcm_core::{Tolerances, nearly_equal};

    #[test]
    fn linear_ramp_gives_constant_slope() {
        let frequency = 1000.0;
        let slope = 7.5;
        let values: Vec<Real> = (0..256).map(|i| slope * i as Real / frequency).collect();
        let ddt = derivative(&values, frequency).unwrap();
        let tol = Tolerances {
            abs: 1e-9,
            rel: 1e-9,
        };
        // slope recovered everywhere, boundaries included
        for &d in &ddt {
            assert!(nearly_equal(d, slope, tol));
        }
    }

    #[test]
    fn rejects_short_input() {
        assert!(matches!(
            derivative(&[1.0, 2.0], 100.0),
            Err(SignalError::InputTooShort { .. })
        ));
    }

    #[test]
    fn rejects_bad_frequency() {
        let values = vec![0.0; 8];
        assert!(derivative(&values, 0.0).is_err());
        assert!(derivative(&values, Real::NAN).is_err());
    }

    #[test]
    fn smoothed_variant_matches_length() {
        let values: Vec<Real> = (0..300).map(|i| (i as Real * 0.02).sin()).collect();
        let out = smoothed_derivative(&values, 50.0, 21).unwrap();
        assert_eq!(out.len(), values.len());
    }
}
