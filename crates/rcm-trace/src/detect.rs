//! Derivative-peak bookkeeping for EOC and reactivity detection.

use crate::pressure::Reactivity;
use rcm_core::{Real, argmax_first};

/// Contiguous runs where the signal sits at or above the threshold,
/// returned as inclusive (start, end) index pairs in scan order.
pub(crate) fn regions_above(signal: &[Real], threshold: Real) -> Vec<(usize, usize)> {
    let mut regions = Vec::new();
    let mut start: Option<usize> = None;
    for (i, &v) in signal.iter().enumerate() {
        match (start, v >= threshold) {
            (None, true) => start = Some(i),
            (Some(s), false) => {
                regions.push((s, i - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        regions.push((s, signal.len() - 1));
    }
    regions
}

/// Locate the end of compression and classify reactivity.
///
/// The first above-threshold region of the smoothed derivative is the
/// compression stroke; EOC is the first occurrence of its maximum. Any
/// later region is a post-compression heat-release spike, which is what
/// makes the trace reactive. With no region at all the derivative never
/// cleared the noise floor and EOC falls back to the pressure maximum.
pub(crate) fn locate_eoc(
    smoothed_derivative: &[Real],
    pressure: &[Real],
    threshold: Real,
) -> (usize, Reactivity) {
    let regions = regions_above(smoothed_derivative, threshold);
    match regions.first() {
        None => (
            argmax_first(pressure).unwrap_or(0),
            Reactivity::NonReactive,
        ),
        Some(&(start, end)) => {
            let eoc = start + argmax_first(&smoothed_derivative[start..=end]).unwrap_or(0);
            let reactivity = if regions.len() > 1 {
                Reactivity::Reactive
            } else {
                Reactivity::NonReactive
            };
            (eoc, reactivity)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn regions_partition_the_above_threshold_samples(
            signal in prop::collection::vec(-10.0_f64..10.0_f64, 1..64),
            threshold in -5.0_f64..5.0_f64,
        ) {
            let regions = regions_above(&signal, threshold);
            // ordered, disjoint, non-touching
            for pair in regions.windows(2) {
                prop_assert!(pair[0].1 + 1 < pair[1].0);
            }
            // membership agrees with the predicate, sample by sample
            for (i, &v) in signal.iter().enumerate() {
                let covered = regions.iter().any(|&(s, e)| s <= i && i <= e);
                prop_assert_eq!(covered, v >= threshold);
            }
        }
    }
}
