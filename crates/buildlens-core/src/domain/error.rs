//! Error taxonomy for buildlens.
//!
//! Diagnostics are never errors here: a record that cannot be classified
//! degrades to generic display. These variants cover the plumbing around the
//! pipeline (configuration, host input decoding, output sink I/O).

use std::path::PathBuf;

/// buildlens errors.
#[derive(Debug, thiserror::Error)]
pub enum BuildlensError {
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid host input: {0}")]
    HostInput(#[from] serde_json::Error),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type for buildlens operations.
pub type Result<T> = std::result::Result<T, BuildlensError>;
