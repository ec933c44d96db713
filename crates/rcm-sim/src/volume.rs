//! Prescribed volume history for the reactor.

use crate::error::{SimError, SimResult};
use rcm_core::Real;
use rcm_signal::derivative;

/// A (time, volume) table plus its precomputed time derivative, the
/// per-step wall-velocity input the reactor integration needs.
#[derive(Debug, Clone)]
pub struct VolumeProfile {
    time: Vec<Real>,
    volume: Vec<Real>,
    dvdt: Vec<Real>,
}

impl VolumeProfile {
    pub fn new(time: &[Real], volume: &[Real]) -> SimResult<Self> {
        if time.len() != volume.len() {
            return Err(SimError::InvalidArg {
                what: "time and volume columns must have equal length",
            });
        }
        if time.len() < 3 {
            return Err(SimError::InvalidArg {
                what: "volume profile needs at least three samples",
            });
        }
        if time.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(SimError::InvalidArg {
                what: "volume profile time must be strictly increasing",
            });
        }
        if volume.iter().any(|&v| !(v.is_finite() && v > 0.0)) {
            return Err(SimError::NonPhysical {
                what: "volume samples must be positive and finite",
            });
        }

        let frequency = (time.len() - 1) as Real / (time[time.len() - 1] - time[0]);
        let dvdt = derivative(volume, frequency)?;
        Ok(Self {
            time: time.to_vec(),
            volume: volume.to_vec(),
            dvdt,
        })
    }

    pub fn start_time(&self) -> Real {
        self.time[0]
    }

    pub fn end_time(&self) -> Real {
        self.time[self.time.len() - 1]
    }

    /// The table's sampling interval; the reactor caps its step at this.
    pub fn step(&self) -> Real {
        self.time[1] - self.time[0]
    }

    fn interpolate(column: &[Real], time: &[Real], t: Real) -> Real {
        let hi = time.partition_point(|&v| v < t).min(time.len() - 1).max(1);
        let lo = hi - 1;
        let span = time[hi] - time[lo];
        let frac = ((t - time[lo]) / span).clamp(0.0, 1.0);
        column[lo] + frac * (column[hi] - column[lo])
    }

    /// Volume at an arbitrary time, clamped to the table's endpoints.
    pub fn volume_at(&self, t: Real) -> Real {
        if t <= self.start_time() {
            return self.volume[0];
        }
        if t >= self.end_time() {
            return self.volume[self.volume.len() - 1];
        }
        Self::interpolate(&self.volume, &self.time, t)
    }

    /// Wall velocity dV/dt at an arbitrary time. Zero past the end of the
    /// table (the piston has stopped); the first table value before it.
    pub fn velocity_at(&self, t: Real) -> Real {
        if t <= self.start_time() {
            return self.dvdt[0];
        }
        if t >= self.end_time() {
            return 0.0;
        }
        Self::interpolate(&self.dvdt, &self.time, t)
    }
}
