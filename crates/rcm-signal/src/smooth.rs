//! Moving-window smoothing.

use crate::error::{SignalError, SignalResult};
use nalgebra::DMatrix;
use rcm_core::Real;

fn check_window(window: usize, polyorder: Option<usize>, len: usize) -> SignalResult<usize> {
    if window == 0 || window % 2 == 0 {
        return Err(SignalError::BadWindow {
            what: "window width must be odd and non-zero",
        });
    }
    if window > len {
        return Err(SignalError::InputTooShort {
            required: window,
            actual: len,
        });
    }
    if let Some(order) = polyorder {
        if order + 1 >= window {
            return Err(SignalError::BadWindow {
                what: "window width must exceed polynomial order + 1",
            });
        }
    }
    Ok(window / 2)
}

/// Uniform moving average, zero-padded 'same' convolution.
///
/// The leading half-window carries improper zero-padded values and is
/// pinned to the first fully-covered sample.
pub fn moving_average(data: &[Real], span: usize) -> SignalResult<Vec<Real>> {
    let h = check_window(span, None, data.len())?;
    let n = data.len();
    let w = span as Real;

    let mut out = vec![0.0; n];
    let mut sum: Real = data[..=h].iter().sum();
    for i in 0..n {
        out[i] = sum / w;
        if i + h + 1 < n {
            sum += data[i + h + 1];
        }
        if i >= h {
            sum -= data[i - h];
        }
    }
    let pin = out[h];
    for v in out.iter_mut().take(h) {
        *v = pin;
    }
    Ok(out)
}

/// Savitzky-Golay smoothing: local least-squares polynomial regression
/// evaluated at the window center. Both half-windows at the edges are
/// pinned to the nearest fully-covered sample.
pub fn savgol(data: &[Real], window: usize, polyorder: usize) -> SignalResult<Vec<Real>> {
    let h = check_window(window, Some(polyorder), data.len())?;
    let n = data.len();

    // Smoothing kernel: row of the pseudo-inverse that evaluates the
    // fitted polynomial at offset zero.
    let a = DMatrix::from_fn(window, polyorder + 1, |i, j| {
        (i as Real - h as Real).powi(j as i32)
    });
    let pinv = a
        .pseudo_inverse(1e-12)
        .map_err(|_| SignalError::FitFailed)?;
    let kernel: Vec<Real> = (0..window).map(|j| pinv[(0, j)]).collect();

    let mut out = vec![0.0; n];
    for i in h..n - h {
        out[i] = kernel
            .iter()
            .zip(&data[i - h..i + h + 1])
            .map(|(k, v)| k * v)
            .sum();
    }
    let head = out[h];
    for v in out.iter_mut().take(h) {
        *v = head;
    }
    let tail = out[n - 1 - h];
    for v in out.iter_mut().skip(n - h) {
        *v = tail;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcm_core::{Tolerances, nearly_equal};

    #[test]
    fn rejects_even_window() {
        let data = vec![1.0; 16];
        assert!(matches!(
            moving_average(&data, 4),
            Err(SignalError::BadWindow { .. })
        ));
    }

    #[test]
    fn rejects_window_longer_than_data() {
        let data = vec![1.0; 4];
        assert!(matches!(
            moving_average(&data, 5),
            Err(SignalError::InputTooShort { .. })
        ));
    }

    #[test]
    fn preserves_constant_signal() {
        let data = vec![2.5; 64];
        let out = moving_average(&data, 21).unwrap();
        let tol = Tolerances::default();
        // interior values untouched by the zero padding
        assert!(out[10..44].iter().all(|&v| nearly_equal(v, 2.5, tol)));
    }

    #[test]
    fn leading_samples_pinned() {
        let data: Vec<Real> = (0..32).map(|i| i as Real).collect();
        let out = moving_average(&data, 5).unwrap();
        assert_eq!(out[0], out[2]);
        assert_eq!(out[1], out[2]);
    }

    #[test]
    fn interior_is_true_window_mean() {
        let data = [4.0, 3.0, 1.0, 5.0, 3.0, 2.0, 6.0];
        let out = moving_average(&data, 3).unwrap();
        let tol = Tolerances::default();
        assert!(nearly_equal(out[3], (1.0 + 5.0 + 3.0) / 3.0, tol));
    }

    #[test]
    fn savgol_reproduces_polynomial_exactly() {
        // A quadratic fit smooths a quadratic signal without bias.
        let data: Vec<Real> = (0..64)
            .map(|i| {
                let x = i as Real * 0.1;
                1.0 + 2.0 * x + 0.5 * x * x
            })
            .collect();
        let out = savgol(&data, 11, 2).unwrap();
        let tol = Tolerances {
            abs: 1e-8,
            rel: 1e-8,
        };
        for i in 5..59 {
            assert!(nearly_equal(out[i], data[i], tol));
        }
    }

    #[test]
    fn savgol_rejects_order_at_window() {
        let data = vec![1.0; 32];
        assert!(matches!(
            savgol(&data, 5, 4),
            Err(SignalError::BadWindow { .. })
        ));
    }
}
