// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! `SourceError` is the only variant that is fatal once the watcher is
//! running. `ReadError`, `StoreError` and `WriteError` are per-file and get
//! folded into a [`crate::engine::FileOutcome`] by the pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed cause carried by the per-file error variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum SumwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The notification subscription could not be established or was lost.
    #[error("Notification source error: {0}")]
    SourceError(String),

    #[error("Read error for {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("Store error ({context}): {source}")]
    StoreError {
        context: String,
        #[source]
        source: BoxError,
    },

    #[error("Sidecar write error for {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SumwatchError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        SumwatchError::ReadError {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn store(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        SumwatchError::StoreError {
            context: context.into(),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        SumwatchError::WriteError {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SumwatchError>;
