use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Series too short: {what} needs at least {required} samples, got {actual}")]
    SeriesTooShort {
        what: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Column length mismatch: time has {time} samples, values has {values}")]
    LengthMismatch { time: usize, values: usize },

    #[error("Time column must be strictly increasing (violated at sample {index})")]
    NonMonotonicTime { index: usize },
}
