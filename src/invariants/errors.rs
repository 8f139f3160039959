use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the invariant config
#[derive(Debug, Error)]
pub enum InvariantConfigError {
    /// The config file could not be read
    #[error("Failed to read invariant config {path}: {source}")]
    Io {
        /// Path of the config
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The config is not valid JSON or has the wrong shape
    #[error("Invalid invariant config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The config declares a version this build does not understand
    #[error("Unsupported invariant config version {0}")]
    UnsupportedVersion(u32),

    /// A name appears more than once in the safe address set
    #[error("Duplicate safe address entry '{0}'")]
    DuplicateSafeAddress(String),
}
