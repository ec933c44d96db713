//! Thermodynamic relation errors.

use thiserror::Error;

pub type ThermoResult<T> = Result<T, ThermoError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Non-physical values (gamma below one, negative pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Empty input series")]
    EmptyInput,
}
