//! Validated sampled time series.

use crate::error::{CoreError, CoreResult};
use crate::numeric::Real;

/// An ordered sequence of (time, value) samples with a uniform sampling
/// interval described by a scalar frequency.
///
/// Invariants checked at construction: matching column lengths, at least
/// two samples, strictly increasing time, finite values for both columns.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSeries {
    time: Vec<Real>,
    values: Vec<Real>,
    frequency: Real,
}

impl TimeSeries {
    /// Build a series from parallel time/value columns, inferring the
    /// sampling frequency as the reciprocal of the mean time step.
    pub fn from_columns(time: Vec<Real>, values: Vec<Real>) -> CoreResult<Self> {
        if time.len() != values.len() {
            return Err(CoreError::LengthMismatch {
                time: time.len(),
                values: values.len(),
            });
        }
        if time.len() < 2 {
            return Err(CoreError::SeriesTooShort {
                what: "time series",
                required: 2,
                actual: time.len(),
            });
        }
        for (i, w) in time.windows(2).enumerate() {
            if !(w[1] > w[0]) {
                return Err(CoreError::NonMonotonicTime { index: i + 1 });
            }
        }
        for &v in time.iter().chain(values.iter()) {
            if !v.is_finite() {
                return Err(CoreError::NonFinite {
                    what: "series sample",
                    value: v,
                });
            }
        }
        let span = time[time.len() - 1] - time[0];
        let frequency = (time.len() - 1) as Real / span;
        Ok(Self {
            time,
            values,
            frequency,
        })
    }

    /// Build a series with an externally supplied sampling frequency
    /// (metadata wins over inference when both are available).
    pub fn with_frequency(time: Vec<Real>, values: Vec<Real>, frequency: Real) -> CoreResult<Self> {
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(CoreError::InvalidArg {
                what: "sampling frequency must be positive and finite",
            });
        }
        let mut series = Self::from_columns(time, values)?;
        series.frequency = frequency;
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn time(&self) -> &[Real] {
        &self.time
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// Sampling frequency [Hz].
    pub fn frequency(&self) -> Real {
        self.frequency
    }

    /// Sampling interval [s].
    pub fn dt(&self) -> Real {
        1.0 / self.frequency
    }

    /// Same time base, new values column.
    pub fn map_values(&self, values: Vec<Real>) -> CoreResult<Self> {
        if values.len() != self.time.len() {
            return Err(CoreError::LengthMismatch {
                time: self.time.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            time: self.time.clone(),
            values,
            frequency: self.frequency,
        })
    }

    /// Drop the first `count` samples, keeping frequency. Used to apply an
    /// offset-point shift before analysis.
    pub fn skip_head(&self, count: usize) -> CoreResult<Self> {
        if self.len().saturating_sub(count) < 2 {
            return Err(CoreError::SeriesTooShort {
                what: "series after offset shift",
                required: count + 2,
                actual: self.len(),
            });
        }
        Ok(Self {
            time: self.time[count..].to_vec(),
            values: self.values[count..].to_vec(),
            frequency: self.frequency,
        })
    }
}
