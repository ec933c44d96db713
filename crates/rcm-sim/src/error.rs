//! Error types for simulation operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors encountered while preparing or running a reactor simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("failed to read mechanism {path}: {source}")]
    MechanismIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mechanism {path}: {source}")]
    MechanismParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("species {name:?} is not in the mechanism")]
    UnknownSpecies { name: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("integration diverged at step {step} (t = {time} s)")]
    Diverged { step: usize, time: f64 },

    #[error(transparent)]
    Thermo(#[from] rcm_thermo::ThermoError),

    #[error(transparent)]
    Signal(#[from] rcm_signal::SignalError),
}

pub type SimResult<T> = Result<T, SimError>;
