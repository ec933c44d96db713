//! Raw voltage trace: filtering, smoothing, calibration.

use crate::error::TraceResult;
use crate::pressure::{DetectionOptions, PressureTrace};
use rcm_core::{Pressure, Real, TimeSeries, to_bar};
use rcm_signal::{Butter2, moving_average, optimal_cutoff};

/// Moving-average span for the filtered signal.
pub const SMOOTHING_SPAN: usize = 21;

/// Low-pass cutoff selection for the raw signal.
#[derive(Debug, Clone, Copy, Default)]
pub enum FilterCutoff {
    /// Pick the cutoff by residual analysis of the signal itself.
    #[default]
    Auto,
    /// Fixed cutoff as a fraction of Nyquist.
    Ratio(Real),
}

impl FilterCutoff {
    pub(crate) fn resolve(&self, data: &[Real]) -> TraceResult<Real> {
        match self {
            FilterCutoff::Auto => Ok(optimal_cutoff(data)?),
            FilterCutoff::Ratio(r) => Ok(*r),
        }
    }
}

/// Voltage signal from a single experiment.
///
/// The filtered and smoothed signals are derived once at construction;
/// the type is immutable afterwards.
#[derive(Debug, Clone)]
pub struct VoltageTrace {
    series: TimeSeries,
    filtered: Vec<Real>,
    smoothed: Vec<Real>,
    scale_factor: Real,
    initial_pressure: Pressure,
    cutoff_ratio: Real,
}

impl VoltageTrace {
    /// Build from a raw voltage record.
    ///
    /// `scale_factor` is the charge-amplifier setting [bar/V];
    /// `initial_pressure` is the absolute fill pressure the quiescent
    /// signal corresponds to.
    pub fn new(
        series: TimeSeries,
        scale_factor: Real,
        initial_pressure: Pressure,
        cutoff: FilterCutoff,
    ) -> TraceResult<Self> {
        let cutoff_ratio = cutoff.resolve(series.values())?;
        let filtered = Butter2::lowpass(cutoff_ratio)?.filtfilt(series.values())?;
        let smoothed = moving_average(&filtered, SMOOTHING_SPAN)?;

        tracing::debug!(cutoff_ratio, samples = series.len(), "voltage trace filtered");

        Ok(Self {
            series,
            filtered,
            smoothed,
            scale_factor,
            initial_pressure,
            cutoff_ratio,
        })
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Low-pass filtered signal.
    pub fn filtered(&self) -> &[Real] {
        &self.filtered
    }

    /// Filtered then smoothed signal; the calibration input.
    pub fn smoothed(&self) -> &[Real] {
        &self.smoothed
    }

    /// The cutoff ratio actually applied (resolved when `Auto`).
    pub fn cutoff_ratio(&self) -> Real {
        self.cutoff_ratio
    }

    pub fn frequency(&self) -> Real {
        self.series.frequency()
    }

    /// Write (time, smoothed voltage) as delimited text.
    pub fn write_delimited(&self, path: &std::path::Path) -> TraceResult<()> {
        crate::io::write_columns(path, &[self.series.time(), &self.smoothed])
    }

    /// Calibrate into a pressure trace:
    /// `p = p_initial + scale * (smoothed - smoothed[0])` [bar].
    pub fn to_pressure(&self, options: DetectionOptions) -> TraceResult<PressureTrace> {
        let p0 = to_bar(self.initial_pressure);
        let reference = self.smoothed[0];
        let pressure: Vec<Real> = self
            .smoothed
            .iter()
            .map(|v| p0 + self.scale_factor * (v - reference))
            .collect();
        let series = self.series.map_values(pressure)?;
        PressureTrace::new(series, self.initial_pressure, options)
    }
}
