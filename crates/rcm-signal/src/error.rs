//! Signal processing errors.

use thiserror::Error;

pub type SignalResult<T> = Result<T, SignalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    /// Series shorter than an operation's required minimum window.
    #[error("Input too short: need at least {required} samples, got {actual}")]
    InputTooShort { required: usize, actual: usize },

    #[error("Bad smoothing window: {what}")]
    BadWindow { what: &'static str },

    #[error("Bad filter cutoff: {what}")]
    BadCutoff { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Least-squares fit failed")]
    FitFailed,
}
