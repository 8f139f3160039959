use alloy_primitives::Address;
use std::fmt;
use std::sync::Arc;

use super::errors::ProposalError;
use crate::registry::AddressRegistry;

/// Closure form of command arguments, evaluated against the registry at
/// resolution time.
pub type ArgumentTemplate =
    Arc<dyn Fn(&TemplateScope<'_>) -> Result<Vec<String>, ProposalError> + Send + Sync>;

/// Arguments of a [`Command`].
#[derive(Clone)]
pub enum Arguments {
    /// Literal strings, possibly containing `{name}` / `{old.name}` placeholders
    Literal(Vec<String>),
    /// Deferred arguments produced once a registry is available
    Templated(ArgumentTemplate),
}

impl Arguments {
    /// Whether the arguments are produced by a closure
    pub fn is_templated(&self) -> bool {
        matches!(self, Self::Templated(_))
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(args) => f.debug_tuple("Literal").field(args).finish(),
            Self::Templated(_) => f.write_str("Templated(<fn>)"),
        }
    }
}

/// One governance call: `target.method(arguments)` with `values` attached.
#[derive(Debug, Clone)]
pub struct Command {
    /// Symbolic target name (`timelock`, `old.timelock`)
    pub target: String,
    /// Payable amount in wei, decimal or `0x` hex
    pub values: String,
    /// Method signature, `name(type1,type2)`
    pub method: String,
    /// Call arguments
    pub arguments: Arguments,
    /// Human audit trail
    pub description: String,
}

impl Command {
    /// A zero-value command with no arguments.
    pub fn new(target: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            values: "0".to_string(),
            method: method.into(),
            arguments: Arguments::Literal(Vec::new()),
            description: String::new(),
        }
    }

    /// Set the payable amount.
    pub fn value(mut self, values: impl Into<String>) -> Self {
        self.values = values.into();
        self
    }

    /// Set literal arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = Arguments::Literal(args.into_iter().map(Into::into).collect());
        self
    }

    /// Set templated arguments.
    pub fn templated<F>(mut self, template: F) -> Self
    where
        F: Fn(&TemplateScope<'_>) -> Result<Vec<String>, ProposalError> + Send + Sync + 'static,
    {
        self.arguments = Arguments::Templated(Arc::new(template));
        self
    }

    /// Set the audit-trail description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// `target.method` label used in errors and logs
    pub fn label(&self) -> String {
        format!("{}.{}", self.target, self.method)
    }
}

/// Read-only registry view handed to templated argument closures.
#[derive(Debug, Clone, Copy)]
pub struct TemplateScope<'a> {
    registry: &'a AddressRegistry,
    command: &'a Command,
}

impl<'a> TemplateScope<'a> {
    pub(crate) fn new(registry: &'a AddressRegistry, command: &'a Command) -> Self {
        Self { registry, command }
    }

    /// Current-generation address of `name`.
    pub fn address(&self, name: &str) -> Result<Address, ProposalError> {
        self.registry.address(name).ok_or_else(|| self.unresolved(name.to_string()))
    }

    /// Old-generation address of `name`.
    pub fn old_address(&self, name: &str) -> Result<Address, ProposalError> {
        self.registry
            .old_address(name)
            .ok_or_else(|| self.unresolved(format!("old.{name}")))
    }

    /// Current-generation address of `name` as a call-ready literal.
    pub fn address_arg(&self, name: &str) -> Result<String, ProposalError> {
        self.address(name).map(|a| format!("{a:#x}"))
    }

    fn unresolved(&self, placeholder: String) -> ProposalError {
        ProposalError::UnresolvedReference {
            placeholder,
            command: self.command.label(),
        }
    }
}
