//! Merge error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, merging, or writing documents
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("File not found: {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Base document has no '{key}' key")]
    MissingKey { key: String },

    #[error("Expected '{key}' in {side} document to be a mapping, found {found}")]
    TypeMismatch {
        key: String,
        side: Side,
        found: &'static str,
    },

    #[error("Failed to render document: {0}")]
    RenderFailure(#[from] serde_yaml::Error),

    #[error("Failed to write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which input document an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Base,
    Child,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Base => write!(f, "base"),
            Side::Child => write!(f, "child"),
        }
    }
}

impl MergeError {
    /// Classify a read error, separating a missing file from other I/O failures
    pub fn from_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            MergeError::FileNotFound { path, source }
        } else {
            MergeError::ReadFailure { path, source }
        }
    }
}
