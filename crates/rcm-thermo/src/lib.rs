//! rcm-thermo: isentropic pressure/volume/temperature transforms.
//!
//! The specific-heat-ratio data always arrives through the [`GammaFn`]
//! capability trait, so these transforms stay decoupled from whichever
//! gas model or simulation produced it.

pub mod error;
pub mod gamma;
pub mod isentropic;

pub use error::{ThermoError, ThermoResult};
pub use gamma::{ConstantGamma, GammaFn};
pub use isentropic::{pressure_from_volume, temperature_from_pressure, volume_from_pressure};
