//! Metadata errors.

use std::path::PathBuf;
use thiserror::Error;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(Error, Debug)]
pub enum ProjectError {
    /// A file name that matches neither supported schema. The batch
    /// skips the file with a warning; this is never fatal to the run.
    #[error("file name {name:?} does not match an experiment schema: {reason}")]
    NameFormat { name: String, reason: &'static str },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid condition configuration: {what}")]
    Invalid { what: &'static str },
}
