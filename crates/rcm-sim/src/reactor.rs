//! Prescribed-volume reactor integration.

use crate::error::{SimError, SimResult};
use crate::gas::GasMixture;
use crate::result::SimulationResult;
use crate::volume::VolumeProfile;
use rcm_core::{Pressure, Real, Temperature, to_bar, to_kelvin};
use rcm_thermo::GammaFn;

/// Initial thermodynamic state of the reactor charge.
#[derive(Debug, Clone, Copy)]
pub struct ReactorConditions {
    pub pressure: Pressure,
    pub temperature: Temperature,
}

/// Options for reactor runs.
#[derive(Debug, Clone)]
pub struct ReactorOptions {
    /// Stop time [s]; the run also stops at the end of the volume profile.
    pub t_end: Real,
    /// Stop temperature [K], the end of useful comparison data.
    pub t_max_kelvin: Real,
    /// Safety limit on step count.
    pub max_steps: usize,
}

impl Default for ReactorOptions {
    fn default() -> Self {
        Self {
            t_end: 0.2,
            t_max_kelvin: 2000.0,
            max_steps: 10_000_000,
        }
    }
}

/// Boundary to the external zero-dimensional kinetics engine.
///
/// The adapter passes the gas model (mechanism + composition), the
/// initial state, and the prescribed volume history; the solver returns
/// its time/pressure/temperature/volume output. Failures are fatal to
/// that one run and are never retried here.
pub trait ReactorSolver {
    fn run(
        &self,
        gas: &GasMixture,
        initial: ReactorConditions,
        profile: &VolumeProfile,
        options: &ReactorOptions,
    ) -> SimResult<SimulationResult>;
}

/// Built-in frozen-chemistry solver.
///
/// Integrates the adiabatic energy balance of an inert ideal-gas charge
/// under the prescribed volume history,
/// `dT/dt = -(gamma(T) - 1) T (dV/dt) / V`,
/// with classical fixed-step RK4; pressure follows from the ideal-gas
/// law. Heat release is deliberately absent: reacting chemistry lives
/// behind the [`ReactorSolver`] boundary.
#[derive(Debug, Clone, Default)]
pub struct FrozenChemistryReactor;

impl FrozenChemistryReactor {
    fn rhs(gas: &GasMixture, profile: &VolumeProfile, t: Real, temp: Real) -> SimResult<Real> {
        let volume = profile.volume_at(t);
        let gamma = gas.gamma(temp)?;
        Ok(-(gamma - 1.0) * temp * profile.velocity_at(t) / volume)
    }
}

impl ReactorSolver for FrozenChemistryReactor {
    fn run(
        &self,
        gas: &GasMixture,
        initial: ReactorConditions,
        profile: &VolumeProfile,
        options: &ReactorOptions,
    ) -> SimResult<SimulationResult> {
        let p0 = to_bar(initial.pressure);
        let t0 = to_kelvin(initial.temperature);
        if !(p0.is_finite() && p0 > 0.0 && t0.is_finite() && t0 > 0.0) {
            return Err(SimError::NonPhysical {
                what: "initial pressure and temperature must be positive and finite",
            });
        }
        if options.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }

        // Step capped by the profile's own sampling interval.
        let dt = profile.step();
        let t_stop = options.t_end.min(profile.end_time());
        let v0 = profile.volume_at(profile.start_time());

        let mut time = profile.start_time();
        let mut temp = t0;

        let mut record = SimulationResult {
            time: vec![time],
            pressure: vec![p0],
            temperature: vec![t0],
            volume: vec![v0],
        };

        let mut step = 0;
        while time < t_stop && temp < options.t_max_kelvin && step < options.max_steps {
            let k1 = Self::rhs(gas, profile, time, temp)?;
            let k2 = Self::rhs(gas, profile, time + 0.5 * dt, temp + 0.5 * dt * k1)?;
            let k3 = Self::rhs(gas, profile, time + 0.5 * dt, temp + 0.5 * dt * k2)?;
            let k4 = Self::rhs(gas, profile, time + dt, temp + dt * k3)?;
            temp += dt / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
            time += dt;
            step += 1;

            if !temp.is_finite() {
                return Err(SimError::Diverged { step, time });
            }

            let volume = profile.volume_at(time);
            // Ideal gas at fixed composition: P V / T is conserved.
            let pressure = p0 * (v0 / volume) * (temp / t0);
            record.time.push(time);
            record.pressure.push(pressure);
            record.temperature.push(temp);
            record.volume.push(volume);
        }

        tracing::debug!(
            steps = step,
            t_final = temp,
            p_final = record.pressure.last().copied().unwrap_or(p0),
            "reactor run complete"
        );
        Ok(record)
    }
}
