use thiserror::Error;

/// Errors reported by a contract-calling interface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The call reverted
    #[error("Reverted: {0}")]
    Reverted(String),

    /// The transport (RPC, fork provider) failed or timed out
    #[error("Network failure: {0}")]
    Network(String),

    /// The interface does not support the requested operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Arguments or return data could not be decoded
    #[error("Decode failure: {0}")]
    Decode(String),
}
