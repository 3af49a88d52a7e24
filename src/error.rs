//! Error type shared by the loaders, renderers and branding collaborators
//!
//! Numeric edge cases never surface here: the projection itself always
//! produces a result. Only I/O and (de)serialization at the edges can fail.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectorError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("report rendering failed: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("profile lookup failed: {0}")]
    Profile(String),

    #[error("logo could not be loaded: {0}")]
    Logo(String),
}

pub type Result<T> = std::result::Result<T, ProjectorError>;
