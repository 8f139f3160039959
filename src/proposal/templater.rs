//! Argument Templater
//!
//! Turns a [`Command`] into a [`ResolvedCommand`]: placeholders are replaced
//! with registry addresses, templated closures are evaluated, and every
//! literal is coerced to the parameter type declared by the method signature.
//!
//! Resolution is pure. Resolving the same command twice against an unchanged
//! registry yields identical results, so a dry run and a real run always see
//! the same arguments.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, U256};
use tracing::debug;

use super::command::{Arguments, Command, TemplateScope};
use super::description::ProposalDescription;
use super::errors::ProposalError;
use super::signature::MethodSignature;
use crate::executor::ContractCall;
use crate::registry::{AddressRegistry, OLD_PREFIX};

/// A command with a concrete target, value and typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCommand {
    /// Symbolic target as written in the command
    pub target_name: String,
    /// Target address
    pub target: Address,
    /// Payable amount
    pub value: U256,
    /// Parsed method signature
    pub method: MethodSignature,
    /// Arguments coerced to the declared parameter types
    pub args: Vec<DynSolValue>,
    /// Audit trail copied from the command
    pub description: String,
}

impl ResolvedCommand {
    /// `target.method` label
    pub fn label(&self) -> String {
        format!("{}.{}", self.target_name, self.method)
    }

    /// The call this command dispatches when sent from `from`.
    pub fn to_call(&self, from: Address) -> ContractCall {
        ContractCall {
            from,
            to: self.target,
            method: self.method.clone(),
            args: self.args.clone(),
            value: self.value,
        }
    }
}

/// `selector ‖ abi.encode(args)` for an arbitrary signature.
pub fn encode_calldata(method: &MethodSignature, args: &[DynSolValue]) -> Bytes {
    let mut data = method.selector().to_vec();
    if !args.is_empty() {
        data.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
    }
    Bytes::from(data)
}

/// Resolve one command against `registry`.
pub fn resolve(
    command: &Command,
    registry: &AddressRegistry,
) -> Result<ResolvedCommand, ProposalError> {
    if command.target.is_empty() {
        return Err(ProposalError::Configuration(format!(
            "command {} has an empty target",
            command.label()
        )));
    }
    let handle = registry
        .lookup(&command.target)
        .ok_or_else(|| ProposalError::UnknownTarget {
            target: command.target.clone(),
        })?;

    let method = MethodSignature::parse(&command.method)?;
    let value = parse_value(&command.values, &method)?;

    let literals = literal_arguments(command, registry)?
        .iter()
        .map(|arg| substitute_placeholders(arg, registry, command))
        .collect::<Result<Vec<_>, _>>()?;

    if literals.len() != method.params().len() {
        return Err(ProposalError::ArgumentCount {
            method: method.canonical().to_string(),
            expected: method.params().len(),
            got: literals.len(),
        });
    }

    let args = method
        .params()
        .iter()
        .zip(&literals)
        .enumerate()
        .map(|(i, (ty, literal))| {
            ty.coerce_str(literal).map_err(|e| ProposalError::InvalidArgument {
                method: method.canonical().to_string(),
                index: i.to_string(),
                ty: ty.sol_type_name().into_owned(),
                value: literal.clone(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        target: "proposal_sim::templater",
        command = %command.label(),
        address = %handle.address,
        args = args.len(),
        "resolved command"
    );

    Ok(ResolvedCommand {
        target_name: command.target.clone(),
        target: handle.address,
        value,
        method,
        args,
        description: command.description.clone(),
    })
}

/// Resolve every command of a description, failing on the first error.
///
/// Nothing is dispatched here; callers resolve the whole sequence before
/// sending any call so a bad reference anywhere performs zero calls.
pub fn resolve_all(
    description: &ProposalDescription,
    registry: &AddressRegistry,
) -> Result<Vec<ResolvedCommand>, ProposalError> {
    description.commands().iter().map(|c| resolve(c, registry)).collect()
}

/// Evaluate a command's arguments to raw literal strings (placeholders intact).
pub(crate) fn literal_arguments(
    command: &Command,
    registry: &AddressRegistry,
) -> Result<Vec<String>, ProposalError> {
    match &command.arguments {
        Arguments::Literal(args) => Ok(args.clone()),
        Arguments::Templated(template) => template(&TemplateScope::new(registry, command)),
    }
}

/// Replace every `{name}` / `{old.name}` in `literal` with the registered address.
///
/// An opening brace without a closing one is an unresolved reference.
pub(crate) fn substitute_placeholders(
    literal: &str,
    registry: &AddressRegistry,
    command: &Command,
) -> Result<String, ProposalError> {
    let mut out = String::with_capacity(literal.len());
    let mut rest = literal;

    while let Some(open) = rest.find('{') {
        let Some(len) = rest[open + 1..].find('}') else {
            return Err(ProposalError::UnresolvedReference {
                placeholder: rest[open + 1..].to_string(),
                command: command.label(),
            });
        };
        let key = &rest[open + 1..open + 1 + len];
        let address = match key.strip_prefix(OLD_PREFIX) {
            Some(name) => registry.old_address(name),
            None => registry.address(key),
        }
        .ok_or_else(|| ProposalError::UnresolvedReference {
            placeholder: key.to_string(),
            command: command.label(),
        })?;

        out.push_str(&rest[..open]);
        out.push_str(&format!("{address:#x}"));
        rest = &rest[open + 1 + len + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn parse_value(values: &str, method: &MethodSignature) -> Result<U256, ProposalError> {
    let trimmed = values.trim();
    if trimmed.is_empty() {
        return Ok(U256::ZERO);
    }
    trimmed.parse::<U256>().map_err(|e| ProposalError::InvalidArgument {
        method: method.canonical().to_string(),
        index: "value".to_string(),
        ty: "uint256".to_string(),
        value: values.to_string(),
        reason: e.to_string(),
    })
}
