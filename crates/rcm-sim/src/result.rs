//! Simulation output series.

use rcm_core::Real;
use serde::Serialize;

/// Read-only record of a reactor run: parallel time, pressure,
/// temperature, and volume columns.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// Time [s], starting at the volume profile's start.
    pub time: Vec<Real>,
    /// Pressure [bar].
    pub pressure: Vec<Real>,
    /// Temperature [K].
    pub temperature: Vec<Real>,
    /// Reactor volume, in the units of the input profile.
    pub volume: Vec<Real>,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// End-of-compression temperature estimate: the peak simulated
    /// temperature.
    pub fn eoc_temperature(&self) -> Option<Real> {
        self.temperature
            .iter()
            .copied()
            .fold(None, |acc: Option<Real>, v| {
                Some(acc.map_or(v, |a| a.max(v)))
            })
    }

    /// Peak simulated pressure [bar].
    pub fn eoc_pressure(&self) -> Option<Real> {
        self.pressure
            .iter()
            .copied()
            .fold(None, |acc: Option<Real>, v| {
                Some(acc.map_or(v, |a| a.max(v)))
            })
    }
}
