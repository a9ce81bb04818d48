//! Error types for the sync pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a sync run.
///
/// A platform without a matching asset is not an error; it is reported as a
/// warning and skipped.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("network error: {message}")]
    Network { url: String, message: String },

    #[error("invalid release response from {url}: {message}")]
    InvalidRelease { url: String, message: String },

    #[error("failed to hash {url}: {stderr}")]
    HashComputation { url: String, stderr: String },

    #[error("cannot read {}: {source}", path.display())]
    ReadOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub(crate) fn network(url: &str, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn hash(url: &str, stderr: impl Into<String>) -> Self {
        Self::HashComputation {
            url: url.to_string(),
            stderr: stderr.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
