//! Error types
//!
//! Tokenizing is infallible; everything that can fail here is around it: picking an
//! output format, reading files, and driving the external `agda` checker.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised while selecting or running an output format
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while processing a source file
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid stage: {0}")]
    InvalidStage(String),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Errors raised while type-checking and rendering a literate page
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{path} is not a literate Agda file")]
    NotLiterate { path: PathBuf },
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Agda rejected {path} ({status}): {stderr}")]
    CheckFailed {
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }
}
