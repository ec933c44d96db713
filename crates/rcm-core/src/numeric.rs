use crate::CoreError;

/// Floating point type used throughout the pipeline
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[Real]) -> Real {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<Real>() / values.len() as Real
}

/// Sample standard deviation (n - 1 denominator). Zero for fewer than two samples.
pub fn sample_std_dev(values: &[Real]) -> Real {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss = values.iter().map(|v| (v - m).powi(2)).sum::<Real>();
    (ss / (values.len() - 1) as Real).sqrt()
}

/// Index of the maximum value, first occurrence on ties. None for an empty slice.
pub fn argmax_first(values: &[Real]) -> Option<usize> {
    let mut best: Option<(usize, Real)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Root-mean-square of a slice. Zero for an empty slice.
pub fn rms(values: &[Real]) -> Real {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<Real>() / values.len() as Real).sqrt()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn mean_is_bounded_and_std_non_negative(
            values in prop::collection::vec(-1.0e6_f64..1.0e6_f64, 1..64)
        ) {
            let m = mean(&values);
            let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(m >= lo - 1e-9 && m <= hi + 1e-9);
            prop_assert!(sample_std_dev(&values) >= 0.0);
        }

        #[test]
        fn argmax_points_at_a_maximum(
            values in prop::collection::vec(-1.0e3_f64..1.0e3_f64, 1..64)
        ) {
            let index = argmax_first(&values).unwrap();
            prop_assert!(values.iter().all(|&v| v <= values[index]));
            // first occurrence wins
            prop_assert!(values[..index].iter().all(|&v| v < values[index]));
        }
    }
}
