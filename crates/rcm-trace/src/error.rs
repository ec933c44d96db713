//! Trace derivation errors.

use std::path::PathBuf;
use thiserror::Error;

pub type TraceResult<T> = Result<T, TraceError>;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("failed to read trace file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad numeric data in {path} at line {line}")]
    Parse { path: PathBuf, line: usize },

    /// Classification outcome, not a failure: ignition-delay operations
    /// are unavailable on a non-reactive trace. Callers are expected to
    /// check the reactivity flag first.
    #[error("trace is non-reactive; ignition delay is undefined")]
    NonReactive,

    #[error(transparent)]
    Core(#[from] rcm_core::CoreError),

    #[error(transparent)]
    Signal(#[from] rcm_signal::SignalError),
}
