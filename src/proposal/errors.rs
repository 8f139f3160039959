use crate::executor::CallError;
use thiserror::Error;

/// Errors that abort a proposal lifecycle phase.
///
/// Validation failures are not represented here: they are collected in a
/// [`ValidationReport`](crate::lifecycle::ValidationReport) instead.
#[derive(Debug, Error)]
pub enum ProposalError {
    /// The environment or a description is misconfigured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required symbolic address is absent from the registry
    #[error("Missing address for '{name}'")]
    MissingAddress {
        /// Symbolic name that was looked up
        name: String,
    },

    /// A placeholder inside a command's arguments could not be resolved
    #[error("Unresolved reference '{placeholder}' in command {command}")]
    UnresolvedReference {
        /// Placeholder name (without braces)
        placeholder: String,
        /// Command label (`target.method`)
        command: String,
    },

    /// The command targets a contract the registry does not know
    #[error("Unknown target '{target}'")]
    UnknownTarget {
        /// Symbolic target name
        target: String,
    },

    /// The target contract's interface does not expose the method
    #[error("Unknown method '{method}' on target '{target}'")]
    UnknownMethod {
        /// Symbolic target name
        target: String,
        /// Canonical method signature
        method: String,
    },

    /// The method signature is not in `name(type,...)` form
    #[error("Invalid method signature '{signature}': {reason}")]
    InvalidSignature {
        /// Signature as written
        signature: String,
        /// Parser message
        reason: String,
    },

    /// Resolved argument count does not match the method's parameter list
    #[error("Method {method} takes {expected} arguments, got {got}")]
    ArgumentCount {
        /// Canonical method signature
        method: String,
        /// Declared parameter count
        expected: usize,
        /// Resolved argument count
        got: usize,
    },

    /// A resolved literal cannot be coerced to the declared parameter type
    #[error("Argument {index} of {method} ('{value}') is not a valid {ty}: {reason}")]
    InvalidArgument {
        /// Canonical method signature
        method: String,
        /// Parameter position, or `value` for the payable amount
        index: String,
        /// Declared type
        ty: String,
        /// Literal after placeholder substitution
        value: String,
        /// Coercion message
        reason: String,
    },

    /// The underlying call reverted or the transport failed
    #[error("Execution of {command} failed: {source}")]
    Execution {
        /// Command label (`target.method`)
        command: String,
        /// Error reported by the contract-calling interface
        source: CallError,
    },
}

impl ProposalError {
    /// Short kind label used in operator-facing reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) | Self::MissingAddress { .. } => "ConfigurationError",
            Self::InvalidSignature { .. }
            | Self::ArgumentCount { .. }
            | Self::InvalidArgument { .. } => "ConfigurationError",
            Self::UnresolvedReference { .. } => "UnresolvedReference",
            Self::UnknownTarget { .. } => "UnknownTarget",
            Self::UnknownMethod { .. } => "UnknownMethod",
            Self::Execution { .. } => "ExecutionFailure",
        }
    }
}
