//! Zero-phase Butterworth low-pass filtering.
//!
//! A second-order Butterworth biquad is applied forward and then backward
//! over the reversed output, which cancels the phase response of the two
//! passes. Edge transients are suppressed by odd-extending the signal by
//! `PAD_LEN` samples on each side before filtering, the same discipline
//! scipy's `filtfilt` uses.

use crate::error::{SignalError, SignalResult};
use crate::fit::polyfit;
use rcm_core::{Real, rms};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Default cutoff as a fraction of the Nyquist frequency.
pub const DEFAULT_CUTOFF_RATIO: Real = 0.1;

/// Odd-extension pad length for the forward/backward pass, 3 * (order + 1).
pub const PAD_LEN: usize = 9;

/// Second-order Butterworth low-pass biquad (bilinear transform).
///
/// Coefficients are normalized so a0 = 1; `b` holds the numerator and `a`
/// the remaining denominator taps [a1, a2].
#[derive(Debug, Clone, Copy)]
pub struct Butter2 {
    b: [Real; 3],
    a: [Real; 2],
}

impl Butter2 {
    /// Design for a cutoff expressed as a fraction of Nyquist, 0 < ratio < 1.
    pub fn lowpass(cutoff_ratio: Real) -> SignalResult<Self> {
        if !(cutoff_ratio.is_finite() && cutoff_ratio > 0.0 && cutoff_ratio < 1.0) {
            return Err(SignalError::BadCutoff {
                what: "cutoff ratio must lie in (0, 1) of Nyquist",
            });
        }
        let k = (PI * cutoff_ratio / 2.0).tan();
        let q = FRAC_1_SQRT_2;
        let norm = 1.0 / (1.0 + k / q + k * k);
        let b0 = k * k * norm;
        Ok(Self {
            b: [b0, 2.0 * b0, b0],
            a: [2.0 * (k * k - 1.0) * norm, (1.0 - k / q + k * k) * norm],
        })
    }

    /// Single causal pass, direct form II transposed.
    ///
    /// The state starts at the steady state a constant input equal to the
    /// first sample would produce (the filter has unity DC gain), so a
    /// quiescent head passes through transient-free.
    fn pass(&self, input: &[Real]) -> Vec<Real> {
        let [b0, b1, b2] = self.b;
        let [a1, a2] = self.a;
        let x0 = input.first().copied().unwrap_or(0.0);
        let mut z1 = x0 * (1.0 - b0);
        let mut z2 = x0 * (b2 - a2);
        let mut out = Vec::with_capacity(input.len());
        for &x in input {
            let y = b0 * x + z1;
            z1 = b1 * x - a1 * y + z2;
            z2 = b2 * x - a2 * y;
            out.push(y);
        }
        out
    }

    /// Zero-phase forward/backward application.
    ///
    /// Fails with `InputTooShort` when the signal cannot accommodate the
    /// edge padding.
    pub fn filtfilt(&self, input: &[Real]) -> SignalResult<Vec<Real>> {
        let n = input.len();
        if n <= PAD_LEN {
            return Err(SignalError::InputTooShort {
                required: PAD_LEN + 1,
                actual: n,
            });
        }

        // Odd extension about both endpoints.
        let mut ext = Vec::with_capacity(n + 2 * PAD_LEN);
        for i in (1..=PAD_LEN).rev() {
            ext.push(2.0 * input[0] - input[i]);
        }
        ext.extend_from_slice(input);
        let last = input[n - 1];
        for i in 1..=PAD_LEN {
            ext.push(2.0 * last - input[n - 1 - i]);
        }

        let mut forward = self.pass(&ext);
        forward.reverse();
        let mut backward = self.pass(&forward);
        backward.reverse();

        Ok(backward[PAD_LEN..PAD_LEN + n].to_vec())
    }
}

/// Pick a cutoff ratio by residual analysis (Yu et al. style).
///
/// Sweeps candidate cutoffs across the usable band, fits a line to the
/// flat portion of the RMS-residual curve (0.1 to 0.75 of Nyquist, scaled
/// for the two filter passes), and returns the lowest cutoff whose
/// residual falls to the line's intercept. Falls back to
/// `DEFAULT_CUTOFF_RATIO` when the sweep never crosses the intercept.
pub fn optimal_cutoff(input: &[Real]) -> SignalResult<Real> {
    const N_FREQS: usize = 101;
    // Two passes shift the effective -3 dB point; this corrects for it.
    let c = (2.0_f64.powf(0.5) - 1.0).powf(0.25);

    let ratios: Vec<Real> = (1..=N_FREQS)
        .map(|i| i as Real / N_FREQS as Real * c)
        .collect();

    let mut resid = Vec::with_capacity(N_FREQS);
    for &r in &ratios {
        let design = (r / c).min(0.999);
        let filtered = Butter2::lowpass(design)?.filtfilt(input)?;
        let err: Vec<Real> = filtered.iter().zip(input).map(|(f, x)| f - x).collect();
        resid.push(rms(&err));
    }

    let lo = ratios.iter().position(|&r| r >= 0.1).unwrap_or(0);
    let hi = ratios
        .iter()
        .position(|&r| r >= 0.75 * c)
        .unwrap_or(N_FREQS - 1);
    if hi <= lo + 1 {
        return Err(SignalError::InvalidArg {
            what: "residual sweep band is degenerate",
        });
    }
    let line = polyfit(&ratios[lo..=hi], &resid[lo..=hi], 1)?;
    let intercept = line[0];

    for i in 0..N_FREQS {
        if resid[i] <= intercept {
            if i == 0 {
                return Ok((ratios[0] / c).min(0.999));
            }
            // Interpolate the crossing between the bracketing candidates.
            let span = resid[i - 1] - resid[i];
            let t = if span > 0.0 {
                (resid[i - 1] - intercept) / span
            } else {
                1.0
            };
            let r = ratios[i - 1] + t * (ratios[i] - ratios[i - 1]);
            return Ok((r / c).min(0.999));
        }
    }
    Ok(DEFAULT_CUTOFF_RATIO)
}
