//! Stepwise isentropic relation integrators.
//!
//! All three transforms share one numerical discipline: march along the
//! input series, evaluate gamma at the running temperature estimate (a
//! simple predictor, no corrector), update via the local isentropic
//! exponent, and pin the first sample to the initial condition.

use crate::error::{ThermoError, ThermoResult};
use crate::gamma::{GammaFn, validate_gamma};
use rcm_core::{Pressure, Real, Temperature, to_bar, to_kelvin};

fn check_positive_series(series: &[Real], what: &'static str) -> ThermoResult<()> {
    if series.is_empty() {
        return Err(ThermoError::EmptyInput);
    }
    if series.iter().any(|&v| !(v.is_finite() && v > 0.0)) {
        return Err(ThermoError::NonPhysical { what });
    }
    Ok(())
}

fn check_initial(t_initial: Temperature) -> ThermoResult<Real> {
    let t0 = to_kelvin(t_initial);
    if !(t0.is_finite() && t0 > 0.0) {
        return Err(ThermoError::InvalidArg {
            what: "initial temperature must be positive and finite",
        });
    }
    Ok(t0)
}

/// Reconstruct a pressure history [bar] from a volume history,
/// `d(ln P) = -gamma(T) d(ln V)`.
///
/// Only volume ratios matter, so the series may be absolute or
/// normalized. Used to validate a volume trace against measured pressure.
pub fn pressure_from_volume(
    volume: &[Real],
    p_initial: Pressure,
    t_initial: Temperature,
    gamma: &dyn GammaFn,
) -> ThermoResult<Vec<Real>> {
    check_positive_series(volume, "volume samples must be positive and finite")?;
    let p0 = to_bar(p_initial);
    if !(p0.is_finite() && p0 > 0.0) {
        return Err(ThermoError::InvalidArg {
            what: "initial pressure must be positive and finite",
        });
    }
    let mut temperature = check_initial(t_initial)?;

    let mut pressure = Vec::with_capacity(volume.len());
    pressure.push(p0);
    for i in 1..volume.len() {
        let g = validate_gamma(gamma.gamma(temperature)?)?;
        let ratio = volume[i] / volume[i - 1];
        pressure.push(pressure[i - 1] * ratio.powf(-g));
        temperature *= ratio.powf(-(g - 1.0));
    }
    Ok(pressure)
}

/// Derive a volume history from a pressure history [bar],
/// `d(ln V) = -d(ln P) / gamma(T)`.
///
/// This builds the prescribed-volume input a reactor simulation needs
/// from a measured non-reactive pressure trace. `v_initial` sets the
/// scale of the output.
pub fn volume_from_pressure(
    pressure: &[Real],
    v_initial: Real,
    t_initial: Temperature,
    gamma: &dyn GammaFn,
) -> ThermoResult<Vec<Real>> {
    check_positive_series(pressure, "pressure samples must be positive and finite")?;
    if !(v_initial.is_finite() && v_initial > 0.0) {
        return Err(ThermoError::InvalidArg {
            what: "initial volume must be positive and finite",
        });
    }
    let mut temperature = check_initial(t_initial)?;

    let mut volume = Vec::with_capacity(pressure.len());
    volume.push(v_initial);
    for i in 1..pressure.len() {
        let g = validate_gamma(gamma.gamma(temperature)?)?;
        let ratio = pressure[i] / pressure[i - 1];
        volume.push(volume[i - 1] * ratio.powf(-1.0 / g));
        temperature *= ratio.powf((g - 1.0) / g);
    }
    Ok(volume)
}

/// Integrate a temperature history [K] from a pressure history [bar],
/// `d(ln T) = (gamma(T) - 1)/gamma(T) d(ln P)`.
///
/// The last sample of a compression-stroke input is the end-of-compression
/// temperature estimate.
pub fn temperature_from_pressure(
    pressure: &[Real],
    t_initial: Temperature,
    gamma: &dyn GammaFn,
) -> ThermoResult<Vec<Real>> {
    check_positive_series(pressure, "pressure samples must be positive and finite")?;
    let t0 = check_initial(t_initial)?;

    let mut temperature = Vec::with_capacity(pressure.len());
    temperature.push(t0);
    for i in 1..pressure.len() {
        let g = validate_gamma(gamma.gamma(temperature[i - 1])?)?;
        let ratio = pressure[i] / pressure[i - 1];
        temperature.push(temperature[i - 1] * ratio.powf((g - 1.0) / g));
    }
    Ok(temperature)
}
