//! Orchestration errors.

use std::path::PathBuf;
use thiserror::Error;

pub type ConditionResult<T> = Result<T, ConditionError>;

#[derive(Error, Debug)]
pub enum ConditionError {
    #[error("path {path} has no usable file name")]
    BadPath { path: PathBuf },

    #[error("condition has no non-reactive experiment to derive a volume trace from")]
    MissingNonReactive,

    #[error("I/O failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Project(#[from] rcm_project::ProjectError),

    #[error(transparent)]
    Trace(#[from] rcm_trace::TraceError),

    #[error(transparent)]
    Thermo(#[from] rcm_thermo::ThermoError),

    #[error(transparent)]
    Sim(#[from] rcm_sim::SimError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
