use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading an address registry from a deployment record
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The deployment record could not be read from disk
    #[error("Failed to read deployment record {path}: {source}")]
    Io {
        /// Path of the record
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The deployment record is not valid JSON or has the wrong shape
    #[error("Invalid deployment record: {0}")]
    Parse(#[from] serde_json::Error),

    /// A symbolic name in the record is empty
    #[error("Deployment record contains an entry with an empty name")]
    EmptyName,

    /// A declared method is not a valid signature
    #[error("Invalid method '{signature}' declared for '{name}': {reason}")]
    InvalidMethod {
        /// Symbolic name of the entry
        name: String,
        /// Signature as written in the record
        signature: String,
        /// Why it does not parse
        reason: String,
    },
}
