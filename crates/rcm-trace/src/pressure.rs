//! Calibrated pressure trace and the quantities derived from it.

use crate::detect::locate_eoc;
use crate::error::{TraceError, TraceResult};
use crate::voltage::FilterCutoff;
use rcm_core::{Pressure, Real, TimeSeries, argmax_first, to_bar};
use rcm_signal::{Butter2, SignalError};

/// Knobs for derivative smoothing and event detection.
#[derive(Debug, Clone)]
pub struct DetectionOptions {
    /// Noise floor for the smoothed derivative [bar/s]; peaks below it do
    /// not count as events.
    pub noise_threshold: Real,
    /// Moving-average span applied to the raw derivative. Odd.
    pub derivative_span: usize,
    /// Samples dropped from the head of the record before analysis.
    pub offset_points: usize,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            noise_threshold: 100.0,
            derivative_span: 151,
            offset_points: 0,
        }
    }
}

/// Outcome of the derivative scan. Gates the ignition-delay operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reactivity {
    Reactive,
    NonReactive,
}

/// Ignition delays measured from the EOC [s].
///
/// `first_stage` is `None` when no intermediate heat-release peak exists;
/// that is a physical observation, not an error, and is distinct from a
/// measured zero delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IgnitionDelays {
    pub overall: Real,
    pub first_stage: Option<Real>,
}

/// A calibrated pressure/time series and everything derived from it.
///
/// All derived fields are computed once at construction; the type is
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct PressureTrace {
    series: TimeSeries,
    initial_pressure: Pressure,
    derivative: Vec<Real>,
    smoothed_derivative: Vec<Real>,
    eoc_index: usize,
    reactivity: Reactivity,
    zeroed_time: Vec<Real>,
    options: DetectionOptions,
}

impl PressureTrace {
    /// Build from an already calibrated pressure series [bar].
    pub fn new(
        series: TimeSeries,
        initial_pressure: Pressure,
        options: DetectionOptions,
    ) -> TraceResult<Self> {
        let series = if options.offset_points > 0 {
            series.skip_head(options.offset_points)?
        } else {
            series
        };

        let derivative = rcm_signal::derivative(series.values(), series.frequency())?;
        let smoothed_derivative =
            rcm_signal::moving_average(&derivative, options.derivative_span)?;
        let (eoc_index, reactivity) = locate_eoc(
            &smoothed_derivative,
            series.values(),
            options.noise_threshold,
        );
        let eoc_time = series.time()[eoc_index];
        let zeroed_time = series.time().iter().map(|t| t - eoc_time).collect();

        tracing::debug!(
            eoc_index,
            eoc_pressure = series.values()[eoc_index],
            ?reactivity,
            "pressure trace derived"
        );

        Ok(Self {
            series,
            initial_pressure,
            derivative,
            smoothed_derivative,
            eoc_index,
            reactivity,
            zeroed_time,
            options,
        })
    }

    /// Build from a raw, uncalibrated pressure record (a transducer that
    /// logs pressure directly, with no companion voltage trace). The
    /// record is filtered and smoothed like a voltage signal, then
    /// re-referenced so its quiescent head matches the recorded initial
    /// pressure.
    pub fn from_raw_pressure(
        series: TimeSeries,
        initial_pressure: Pressure,
        cutoff: FilterCutoff,
        options: DetectionOptions,
    ) -> TraceResult<Self> {
        // The quiescent window skips the first samples (trigger
        // transients) and must be fully populated.
        const QUIET_LO: usize = 20;
        const QUIET_HI: usize = 500;
        if series.len() < QUIET_HI + QUIET_LO {
            return Err(TraceError::Signal(SignalError::InputTooShort {
                required: QUIET_HI + QUIET_LO,
                actual: series.len(),
            }));
        }

        let ratio = cutoff.resolve(series.values())?;
        let filtered = Butter2::lowpass(ratio)?.filtfilt(series.values())?;
        let smoothed = rcm_signal::moving_average(&filtered, crate::voltage::SMOOTHING_SPAN)?;

        let quiescent = rcm_core::mean(&smoothed[QUIET_LO..QUIET_HI]);
        let p0 = to_bar(initial_pressure);
        let pressure: Vec<Real> = smoothed.iter().map(|v| v - quiescent + p0).collect();
        let series = series.map_values(pressure)?;
        Self::new(series, initial_pressure, options)
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Calibrated pressure [bar].
    pub fn pressure(&self) -> &[Real] {
        self.series.values()
    }

    pub fn time(&self) -> &[Real] {
        self.series.time()
    }

    /// Time rebased so the EOC sits at t = 0.
    pub fn zeroed_time(&self) -> &[Real] {
        &self.zeroed_time
    }

    pub fn frequency(&self) -> Real {
        self.series.frequency()
    }

    pub fn initial_pressure(&self) -> Pressure {
        self.initial_pressure
    }

    /// Raw derivative [bar/s].
    pub fn derivative(&self) -> &[Real] {
        &self.derivative
    }

    /// Smoothed derivative [bar/s]; the signal all detection runs on.
    pub fn smoothed_derivative(&self) -> &[Real] {
        &self.smoothed_derivative
    }

    pub fn eoc_index(&self) -> usize {
        self.eoc_index
    }

    /// Pressure at the end of compression [bar].
    pub fn eoc_pressure(&self) -> Real {
        self.series.values()[self.eoc_index]
    }

    /// Absolute time of the end of compression [s].
    pub fn eoc_time(&self) -> Real {
        self.series.time()[self.eoc_index]
    }

    pub fn reactivity(&self) -> Reactivity {
        self.reactivity
    }

    pub fn is_reactive(&self) -> bool {
        self.reactivity == Reactivity::Reactive
    }

    /// Extract ignition delays from the smoothed derivative.
    ///
    /// Overall delay: time from EOC to the global derivative maximum
    /// after the EOC. First-stage delay: time from EOC to the highest
    /// local maximum strictly between EOC and the overall peak that sits
    /// strictly below the overall peak and at or above the noise
    /// threshold; equal-height candidates resolve to the earlier peak.
    pub fn ignition_delays(&self) -> TraceResult<IgnitionDelays> {
        if self.reactivity == Reactivity::NonReactive {
            return Err(TraceError::NonReactive);
        }
        let d = &self.smoothed_derivative;
        let time = self.series.time();
        let eoc = self.eoc_index;

        let overall_index = eoc
            + 1
            + argmax_first(&d[eoc + 1..]).ok_or(TraceError::NonReactive)?;
        let overall = time[overall_index] - time[eoc];

        let mut best: Option<(usize, Real)> = None;
        for i in eoc + 1..overall_index {
            if i == 0 || i + 1 >= d.len() {
                continue;
            }
            let is_local_max = d[i] > d[i - 1] && d[i] >= d[i + 1];
            if !is_local_max || d[i] >= d[overall_index] || d[i] < self.options.noise_threshold {
                continue;
            }
            match best {
                Some((_, b)) if d[i] <= b => {}
                _ => best = Some((i, d[i])),
            }
        }
        let first_stage = best.map(|(i, _)| time[i] - time[eoc]);

        Ok(IgnitionDelays {
            overall,
            first_stage,
        })
    }

    /// Least-squares polynomial fit to the quiescent pressure before
    /// compression starts, for drift/offset correction. `comptime_s` is
    /// the compression duration counted back from the EOC; the fit
    /// window is everything before it. Coefficients ascend in degree.
    pub fn pressure_fit(&self, comptime_s: Real, degree: usize) -> TraceResult<Vec<Real>> {
        const LEAD: usize = 10;
        let frequency = self.series.frequency();
        let beg = (self.eoc_index as Real - comptime_s * frequency).floor();
        if beg < (LEAD + degree + 2) as Real {
            return Err(TraceError::Signal(SignalError::InputTooShort {
                required: LEAD + degree + 2,
                actual: beg.max(0.0) as usize,
            }));
        }
        let beg = beg as usize;

        let time: Vec<Real> = (0..beg).map(|i| i as Real / frequency).collect();
        let mut window = self.series.values()[..beg].to_vec();
        // trigger transient at the head of the record
        let pin = window[LEAD];
        for v in window.iter_mut().take(LEAD - 1) {
            *v = pin;
        }
        Ok(rcm_signal::polyfit(&time, &window, degree)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcm_core::{Tolerances, bar, nearly_equal};

    /// Build a pressure series whose computed derivative carries spikes
    /// of the given heights at the given indices: the trace is the
    /// running integral of the spike train.
    fn synthetic_trace(n: usize, frequency: Real, spikes: &[(usize, Real)]) -> TimeSeries {
        let mut rate = vec![0.0; n];
        for &(index, height) in spikes {
            rate[index] = height;
        }
        let mut pressure = Vec::with_capacity(n);
        let mut p = 1.0;
        for r in &rate {
            pressure.push(p);
            p += r / frequency;
        }
        let time: Vec<Real> = (0..n).map(|i| i as Real / frequency).collect();
        TimeSeries::with_frequency(time, pressure, frequency).unwrap()
    }

    fn options(threshold: Real) -> DetectionOptions {
        DetectionOptions {
            noise_threshold: threshold,
            derivative_span: 1,
            offset_points: 0,
        }
    }

    #[test]
    fn eoc_lands_on_the_single_spike() {
        let series = synthetic_trace(200, 10_000.0, &[(100, 50.0)]);
        let trace = PressureTrace::new(series, bar(1.0), options(10.0)).unwrap();
        assert_eq!(trace.eoc_index(), 100);
        // one spike only: inert compression
        assert_eq!(trace.reactivity(), Reactivity::NonReactive);
    }

    #[test]
    fn zeroed_time_puts_eoc_at_origin() {
        let series = synthetic_trace(200, 10_000.0, &[(100, 50.0)]);
        let trace = PressureTrace::new(series, bar(1.0), options(10.0)).unwrap();
        let tol = Tolerances::default();
        assert!(nearly_equal(trace.zeroed_time()[100], 0.0, tol));
        assert!(trace.zeroed_time()[0] < 0.0);
    }

    #[test]
    fn overall_and_first_stage_delays() {
        // EOC spike at sample 100, first-stage bump at 120 (2 ms later),
        // main heat release at 150 (5 ms later). 10 kHz sampling.
        let series =
            synthetic_trace(260, 10_000.0, &[(100, 50.0), (120, 30.0), (150, 80.0)]);
        let trace = PressureTrace::new(series, bar(1.0), options(10.0)).unwrap();
        assert!(trace.is_reactive());

        let delays = trace.ignition_delays().unwrap();
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(delays.overall, 5.0e-3, tol));
        assert!(nearly_equal(delays.first_stage.unwrap(), 2.0e-3, tol));
    }

    #[test]
    fn no_secondary_peak_means_undefined_first_stage() {
        let series = synthetic_trace(260, 10_000.0, &[(100, 50.0), (150, 80.0)]);
        let trace = PressureTrace::new(series, bar(1.0), options(10.0)).unwrap();
        let delays = trace.ignition_delays().unwrap();
        assert!(delays.first_stage.is_none());
        assert!(delays.overall > 0.0);
    }

    #[test]
    fn equal_first_stage_candidates_resolve_to_the_earlier() {
        let series = synthetic_trace(
            260,
            10_000.0,
            &[(100, 50.0), (120, 30.0), (135, 30.0), (150, 80.0)],
        );
        let trace = PressureTrace::new(series, bar(1.0), options(10.0)).unwrap();
        let delays = trace.ignition_delays().unwrap();
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(delays.first_stage.unwrap(), 2.0e-3, tol));
    }

    #[test]
    fn quiet_trace_is_non_reactive_and_rejects_delays() {
        let series = synthetic_trace(200, 10_000.0, &[(100, 5.0)]);
        let trace = PressureTrace::new(series, bar(1.0), options(10.0)).unwrap();
        assert_eq!(trace.reactivity(), Reactivity::NonReactive);
        assert!(matches!(
            trace.ignition_delays(),
            Err(TraceError::NonReactive)
        ));
    }

    #[test]
    fn offset_points_shift_the_record() {
        let series = synthetic_trace(260, 10_000.0, &[(100, 50.0), (150, 80.0)]);
        let opts = DetectionOptions {
            offset_points: 40,
            ..options(10.0)
        };
        let trace = PressureTrace::new(series, bar(1.0), opts).unwrap();
        assert_eq!(trace.eoc_index(), 60);
    }

    #[test]
    fn pressure_fit_recovers_quiescent_baseline() {
        // Flat 1.0 bar baseline before a late compression spike.
        let series = synthetic_trace(4000, 10_000.0, &[(3500, 400.0)]);
        let trace = PressureTrace::new(series, bar(1.0), options(10.0)).unwrap();
        let fit = trace.pressure_fit(0.01, 1).unwrap();
        let tol = Tolerances {
            abs: 1e-6,
            rel: 1e-6,
        };
        assert!(nearly_equal(fit[0], 1.0, tol));
        assert!(nearly_equal(fit[1], 0.0, tol));
    }
}
